use monitor_log::{MonitorLog, ResolvedViolation};

/// Path A output: resolved locations in summary order, 2-space indentation.
pub fn render_locations(resolved: &[ResolvedViolation]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(resolved)
}

/// Every parsed record, including exclusions and scan counters.
pub fn render_monitor_log(log: &MonitorLog) -> serde_json::Result<String> {
    serde_json::to_string_pretty(log)
}
