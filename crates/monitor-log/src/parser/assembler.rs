use std::fs;
use std::mem;
use std::path::Path;

use super::ansi::strip_ansi_codes;
use super::frame::{parse_frame, FrameRejection};
use super::model::{insert_unique, ExclusionSet, FieldRef, MethodRef, MonitorLog, ThreadSide, ThreadTrace, Violation};
use super::section::{classify, LineKind};
use super::stats::{DropReason, ScanStats};
use super::MAX_LINE_SIZE;
use crate::error::MonitorLogError;

/// Which stack of the open violation frame lines go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackMode {
    None,
    Core,
    NonCore,
}

impl StackMode {
    fn side(self) -> Option<ThreadSide> {
        match self {
            StackMode::None => None,
            StackMode::Core => Some(ThreadSide::Core),
            StackMode::NonCore => Some(ThreadSide::NonCore),
        }
    }
}

#[derive(Debug)]
enum AssemblerState {
    Idle,
    InViolation { open: Violation, mode: StackMode },
}

/// Violation assembler for monitor logs.
///
/// Single-pass state machine over log lines:
/// - a `StartViolation` line closes the open violation (if any) and opens a new one
/// - stack markers select which trace of the open violation receives frames
/// - exclusion and static-init annotations are process-wide, collected in any state
/// - end of input closes the open violation
///
/// Closed violations are appended to the output and never touched again.
pub struct ViolationAssembler {
    state: AssemblerState,
    violations: Vec<Violation>,
    exclusions: ExclusionSet,
    ignored_static_inits: Vec<FieldRef>,
    stats: ScanStats,
}

impl Default for ViolationAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ViolationAssembler {
    pub fn new() -> Self {
        Self {
            state: AssemblerState::Idle,
            violations: Vec::new(),
            exclusions: ExclusionSet::default(),
            ignored_static_inits: Vec::new(),
            stats: ScanStats::default(),
        }
    }

    /// True while a violation is open.
    pub fn in_violation(&self) -> bool {
        matches!(self.state, AssemblerState::InViolation { .. })
    }

    /// Stack section currently collecting frames.
    pub fn stack_mode(&self) -> StackMode {
        match &self.state {
            AssemblerState::Idle => StackMode::None,
            AssemblerState::InViolation { mode, .. } => *mode,
        }
    }

    /// Number of violations closed so far.
    pub fn closed_count(&self) -> usize {
        self.violations.len()
    }

    /// Consume one log line.
    pub fn feed(&mut self, raw: &str) {
        self.stats.lines_scanned += 1;

        if raw.len() > MAX_LINE_SIZE {
            tracing::trace!(len = raw.len(), "scan: oversized line skipped");
            self.stats.record_drop(DropReason::TooLarge);
            return;
        }

        let line = strip_ansi_codes(raw);
        let kind = classify(&line);

        match kind {
            LineKind::StartViolation { core_thread, variable, non_core_thread } => {
                self.close_open();
                tracing::trace!(variable, core_thread, non_core_thread, "scan: violation opened");
                self.state = AssemblerState::InViolation {
                    open: Violation::new(variable, core_thread, non_core_thread),
                    mode: StackMode::None,
                };
            }
            LineKind::EnterCoreStack => self.set_mode(StackMode::Core),
            LineKind::EnterNonCoreStack => self.set_mode(StackMode::NonCore),
            LineKind::FrameLine => self.push_frame(&line),
            LineKind::OmittedFrames { count } => self.add_omitted(count),
            LineKind::ExcludedClass { class } => {
                let added = self.exclusions.add_class(class.to_string());
                self.note_annotation(added);
            }
            LineKind::ExcludedMethod { method, class } => {
                let added = self.exclusions.add_method(MethodRef {
                    method: method.to_string(),
                    class: class.to_string(),
                });
                self.note_annotation(added);
            }
            LineKind::ExcludedField { field, class } => {
                let added = self.exclusions.add_field(FieldRef {
                    field: field.to_string(),
                    class: class.to_string(),
                });
                self.note_annotation(added);
            }
            LineKind::IgnoredStaticInit { field, class } => {
                let added = insert_unique(
                    &mut self.ignored_static_inits,
                    FieldRef {
                        field: field.to_string(),
                        class: class.to_string(),
                    },
                );
                self.note_annotation(added);
            }
            LineKind::None => {}
        }
    }

    /// Close the open violation (end of input) and hand all records to the caller.
    pub fn finish(mut self) -> MonitorLog {
        self.close_open();

        tracing::debug!(
            lines = self.stats.lines_scanned,
            violations = self.stats.violations,
            frames = self.stats.frames_recorded,
            dropped = self.stats.dropped_lines(),
            exclusions = self.exclusions.len(),
            ignored_static_inits = self.ignored_static_inits.len(),
            "scan: complete"
        );

        MonitorLog {
            violations: self.violations,
            exclusions: self.exclusions,
            ignored_static_inits: self.ignored_static_inits,
            stats: self.stats,
        }
    }

    fn close_open(&mut self) {
        if let AssemblerState::InViolation { open, .. } = mem::replace(&mut self.state, AssemblerState::Idle) {
            tracing::debug!(
                variable = %open.variable,
                core_frames = open.core_thread.frames.len(),
                non_core_frames = open.non_core_thread.frames.len(),
                "scan: violation closed"
            );
            self.stats.violations += 1;
            self.violations.push(open);
        }
    }

    fn set_mode(&mut self, next: StackMode) {
        match &mut self.state {
            AssemblerState::InViolation { mode, .. } => *mode = next,
            AssemblerState::Idle => {
                tracing::trace!(?next, "scan: stack marker with no open violation ignored");
            }
        }
    }

    fn push_frame(&mut self, line: &str) {
        let Some(trace) = active_trace(&mut self.state) else {
            self.stats.record_drop(DropReason::Orphaned);
            return;
        };

        match parse_frame(line) {
            Ok(frame) => {
                trace.frames.push(frame);
                self.stats.frames_recorded += 1;
            }
            Err(FrameRejection::Malformed) => {
                tracing::trace!(line, "scan: malformed frame skipped");
                self.stats.record_drop(DropReason::MalformedFrame);
            }
            Err(FrameRejection::MonitorInternal) => {
                self.stats.record_drop(DropReason::MonitorInternal);
            }
        }
    }

    fn add_omitted(&mut self, count: usize) {
        match active_trace(&mut self.state) {
            Some(trace) => trace.omitted_frames = trace.omitted_frames.saturating_add(count),
            None => self.stats.record_drop(DropReason::Orphaned),
        }
    }

    fn note_annotation(&mut self, added: bool) {
        if !added {
            self.stats.duplicate_annotations += 1;
        }
    }
}

/// Trace of the open violation that frame lines currently go to.
fn active_trace(state: &mut AssemblerState) -> Option<&mut ThreadTrace> {
    match state {
        AssemblerState::InViolation { open, mode } => mode.side().map(|side| open.trace_mut(side)),
        AssemblerState::Idle => None,
    }
}

/// Parse a complete monitor log held in memory.
pub fn parse_log(text: &str) -> MonitorLog {
    let mut assembler = ViolationAssembler::new();
    for line in text.lines() {
        assembler.feed(line);
    }
    assembler.finish()
}

/// Read a monitor log from disk and parse it.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, so a damaged log
/// still yields every record that can be recovered.
pub fn read_log(path: impl AsRef<Path>) -> Result<MonitorLog, MonitorLogError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| MonitorLogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "scan: log loaded");
    Ok(parse_log(&text))
}
