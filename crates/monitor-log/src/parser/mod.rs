//! Monitor log parsing
//!
//! Recovers violation records (violation -> thread -> stack frame) from the
//! line-oriented output of the thread-safety monitor.
//!
//! # Architecture
//!
//! - `section.rs`: line classification into marker categories
//! - `frame.rs`: stack-frame extraction and monitor-frame filtering
//! - `assembler.rs`: the scan state machine building violation records
//! - `model.rs`: record types handed to callers
//! - `stats.rs`: per-scan counters
//!
//! # Tolerance
//!
//! Nothing in a log line can fail the scan:
//! - unrecognised lines are dropped
//! - malformed frame lines are skipped without touching neighbouring frames
//! - oversized lines are skipped
//! - ANSI color codes are stripped before matching

pub mod assembler;
pub mod frame;
pub mod model;
pub mod section;
pub mod stats;
mod ansi;

// Re-export commonly used types
pub use assembler::{parse_log, read_log, StackMode, ViolationAssembler};
pub use frame::{extract_frame, is_monitor_internal};
pub use model::{
    ExclusionSet, FieldRef, MethodRef, MonitorLog, StackFrame, ThreadSide, ThreadTrace, Violation,
};
pub use section::{classify, LineKind};
pub use stats::ScanStats;
pub use ansi::strip_ansi_codes;

// Constants
pub const MAX_LINE_SIZE: usize = 1_048_576; // 1MB
/// Qualified-name fragment of the monitor's own access-check frame.
pub const MONITOR_INTERNAL_FRAME: &str = "AccessMonitor.checkAccess";
