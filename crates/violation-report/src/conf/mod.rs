pub mod load;
pub mod model;

pub use model::{ConfigOverrides, LogFormat, LogOutput, LoggingConfig, ReportConfig};
