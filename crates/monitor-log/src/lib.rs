// Thread-safety monitor log analysis: violation records and location resolution.

pub mod error;
pub mod parser;
pub mod resolve;

pub use error::{MonitorLogError, MonitorLogResult};
pub use parser::{parse_log, read_log, MonitorLog};
pub use resolve::{resolve, ResolvedSide, ResolvedViolation, ViolationSummary};
