use serde::Serialize;

/// Why a line was dropped by the scan.
///
/// Typed so callers count drops without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Line exceeded MAX_LINE_SIZE
    TooLarge,
    /// Looked like a frame but did not match `class.method(file:line)`
    MalformedFrame,
    /// Well-formed frame from the monitor's own instrumentation
    MonitorInternal,
    /// Frame or truncation marker seen with no stack section active
    Orphaned,
}

/// Counters collected during a single scan of a monitor log.
///
/// The scan is single-threaded so these are plain integers, owned by the
/// assembler and moved to the caller together with the records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub lines_scanned: u64,
    pub violations: u64,
    pub frames_recorded: u64,
    pub malformed_frames: u64,
    pub monitor_frames_filtered: u64,
    pub orphaned_lines: u64,
    pub oversized_lines: u64,
    /// Exclusion / ignore annotations that repeated an earlier one
    pub duplicate_annotations: u64,
}

impl ScanStats {
    pub fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::TooLarge => self.oversized_lines += 1,
            DropReason::MalformedFrame => self.malformed_frames += 1,
            DropReason::MonitorInternal => self.monitor_frames_filtered += 1,
            DropReason::Orphaned => self.orphaned_lines += 1,
        }
    }

    pub fn dropped_lines(&self) -> u64 {
        self.malformed_frames + self.monitor_frames_filtered + self.orphaned_lines + self.oversized_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_drop_routes_to_counter() {
        let mut stats = ScanStats::default();
        stats.record_drop(DropReason::TooLarge);
        stats.record_drop(DropReason::MalformedFrame);
        stats.record_drop(DropReason::MalformedFrame);
        stats.record_drop(DropReason::MonitorInternal);
        stats.record_drop(DropReason::Orphaned);

        assert_eq!(stats.oversized_lines, 1);
        assert_eq!(stats.malformed_frames, 2);
        assert_eq!(stats.monitor_frames_filtered, 1);
        assert_eq!(stats.orphaned_lines, 1);
        assert_eq!(stats.dropped_lines(), 5);
    }

    #[test]
    fn test_default_is_zeroed() {
        let stats = ScanStats::default();
        assert_eq!(stats.lines_scanned, 0);
        assert_eq!(stats.dropped_lines(), 0);
    }
}
