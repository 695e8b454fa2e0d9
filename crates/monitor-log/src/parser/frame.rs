//! Frame extraction: one `at class.method(file:line)` line to a [`StackFrame`].

use regex::Regex;
use std::sync::LazyLock;

use super::model::StackFrame;
use super::MONITOR_INTERNAL_FRAME;

/// `at <class path>.<method>(<file>:<line>)`, class path greedy so the last
/// dot before the parenthesis separates the method.
static FRAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*at ([\w.]+)\.([\w<>]+)\((.*?):(\d+)\)")
        .expect("frame regex is a compile-time constant and must be valid")
});

/// Why a frame line yielded no frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRejection {
    /// Pattern mismatch (`Native Method`, `Unknown Source`, module prefixes, ...)
    Malformed,
    /// The monitor's own instrumentation call
    MonitorInternal,
}

/// Parse a frame line, reporting why it was rejected.
pub fn parse_frame(line: &str) -> Result<StackFrame, FrameRejection> {
    let caps = FRAME_PATTERN.captures(line).ok_or(FrameRejection::Malformed)?;

    let line_number = caps[4]
        .parse::<u32>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or(FrameRejection::Malformed)?;

    let frame = StackFrame {
        class: caps[1].to_string(),
        method: caps[2].to_string(),
        file: caps[3].to_string(),
        line: line_number,
    };

    if is_monitor_internal(&frame) {
        return Err(FrameRejection::MonitorInternal);
    }

    Ok(frame)
}

/// Parse a frame line; malformed and monitor-internal frames yield `None`.
pub fn extract_frame(line: &str) -> Option<StackFrame> {
    parse_frame(line).ok()
}

/// True for the monitor's own access-check frame.
///
/// Only [`MONITOR_INTERNAL_FRAME`] is filtered; other instrumentation frames
/// are kept.
pub fn is_monitor_internal(frame: &StackFrame) -> bool {
    frame.qualified_method().contains(MONITOR_INTERNAL_FRAME)
}
