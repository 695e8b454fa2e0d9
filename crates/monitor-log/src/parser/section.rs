//! Section tracking: classify one monitor log line.
//!
//! Each line maps to exactly one [`LineKind`]. Checks run in a fixed order and
//! the first hit wins, so categories are mutually exclusive. Classification
//! looks at the current line only; nothing is carried between lines.

use regex::Regex;
use std::sync::LazyLock;

/// Marker phrases emitted by the monitor.
pub struct Markers;

impl Markers {
    pub const INVALID_READ: &'static str = "Invalid read:";
    pub const CORE_STACK: &'static str = "Current thread stack trace:";
    pub const NON_CORE_STACK: &'static str = "Previous NON_CORE thread write stack trace:";
    pub const IGNORE_STATIC_INIT: &'static str = "will ignore static initialization writes";
    pub const EXCLUDED: &'static str = "excluded from thread safety check due to @RsmThreadSafe";
}

static INVALID_READ_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"CORE thread '(.*?)' attempting to read variable (.*?) that was written by NON_CORE thread '(.*?)'",
    )
    .expect("invalid-read regex is a compile-time constant and must be valid")
});

static IGNORE_STATIC_INIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Field (.*?) in class (.*?) will ignore static initialization writes")
        .expect("ignore-static-init regex is a compile-time constant and must be valid")
});

static EXCLUDED_METHOD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bMethod (.*?) in class (.*?) is excluded")
        .expect("excluded-method regex is a compile-time constant and must be valid")
});

static EXCLUDED_FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bField (.*?) in class (.*?) is excluded")
        .expect("excluded-field regex is a compile-time constant and must be valid")
});

static EXCLUDED_CLASS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bClass (.*?) is excluded")
        .expect("excluded-class regex is a compile-time constant and must be valid")
});

static OMITTED_FRAMES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\.\.\. (\d+) more\s*$")
        .expect("omitted-frames regex is a compile-time constant and must be valid")
});

/// What a single log line means to the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    StartViolation {
        core_thread: &'a str,
        variable: &'a str,
        non_core_thread: &'a str,
    },
    EnterCoreStack,
    EnterNonCoreStack,
    ExcludedClass {
        class: &'a str,
    },
    ExcludedMethod {
        method: &'a str,
        class: &'a str,
    },
    ExcludedField {
        field: &'a str,
        class: &'a str,
    },
    IgnoredStaticInit {
        field: &'a str,
        class: &'a str,
    },
    /// Candidate `at ...` line; extraction happens later
    FrameLine,
    /// `... N more` depth-limit marker closing a stack
    OmittedFrames {
        count: usize,
    },
    None,
}

impl LineKind<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            LineKind::StartViolation { .. } => "start_violation",
            LineKind::EnterCoreStack => "enter_core_stack",
            LineKind::EnterNonCoreStack => "enter_non_core_stack",
            LineKind::ExcludedClass { .. } => "excluded_class",
            LineKind::ExcludedMethod { .. } => "excluded_method",
            LineKind::ExcludedField { .. } => "excluded_field",
            LineKind::IgnoredStaticInit { .. } => "ignored_static_init",
            LineKind::FrameLine => "frame_line",
            LineKind::OmittedFrames { .. } => "omitted_frames",
            LineKind::None => "none",
        }
    }
}

/// Classify one line of monitor output.
pub fn classify(line: &str) -> LineKind<'_> {
    if line.contains(Markers::INVALID_READ) {
        return match INVALID_READ_PATTERN.captures(line) {
            Some(caps) => LineKind::StartViolation {
                core_thread: group(&caps, 1),
                variable: group(&caps, 2),
                non_core_thread: group(&caps, 3),
            },
            None => LineKind::None,
        };
    }

    if line.contains(Markers::CORE_STACK) {
        return LineKind::EnterCoreStack;
    }

    if line.contains(Markers::NON_CORE_STACK) {
        return LineKind::EnterNonCoreStack;
    }

    if line.trim_start().starts_with("at ") {
        return LineKind::FrameLine;
    }

    if let Some(caps) = OMITTED_FRAMES_PATTERN.captures(line) {
        return match caps[1].parse::<usize>() {
            Ok(count) => LineKind::OmittedFrames { count },
            Err(_) => LineKind::None,
        };
    }

    if line.contains(Markers::IGNORE_STATIC_INIT) {
        return match IGNORE_STATIC_INIT_PATTERN.captures(line) {
            Some(caps) => LineKind::IgnoredStaticInit {
                field: group(&caps, 1),
                class: group(&caps, 2),
            },
            None => LineKind::None,
        };
    }

    if line.contains(Markers::EXCLUDED) {
        return classify_exclusion(line);
    }

    LineKind::None
}

fn classify_exclusion(line: &str) -> LineKind<'_> {
    if let Some(caps) = EXCLUDED_METHOD_PATTERN.captures(line) {
        return LineKind::ExcludedMethod {
            method: group(&caps, 1),
            class: group(&caps, 2),
        };
    }
    if let Some(caps) = EXCLUDED_FIELD_PATTERN.captures(line) {
        return LineKind::ExcludedField {
            field: group(&caps, 1),
            class: group(&caps, 2),
        };
    }
    if let Some(caps) = EXCLUDED_CLASS_PATTERN.captures(line) {
        return LineKind::ExcludedClass {
            class: group(&caps, 1),
        };
    }
    LineKind::None
}

fn group<'a>(caps: &regex::Captures<'a>, index: usize) -> &'a str {
    caps.get(index).map_or("", |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVALID_READ_LINE: &str = "2024-03-01 10:00:00 FATAL AccessMonitor - Invalid read: CORE thread 'T1' attempting to read variable counter that was written by NON_CORE thread 'T2'";

    // ── Violation markers ───────────────────────────────────────

    #[test]
    fn test_classify_start_violation() {
        assert_eq!(
            classify(INVALID_READ_LINE),
            LineKind::StartViolation {
                core_thread: "T1",
                variable: "counter",
                non_core_thread: "T2",
            }
        );
    }

    #[test]
    fn test_classify_start_violation_with_instance_key() {
        let line = "Invalid read: CORE thread 'CONTRACT_WORKER' attempting to read variable 12345.com.x.Model.value that was written by NON_CORE thread 'pool-1-thread-1'";
        match classify(line) {
            LineKind::StartViolation { core_thread, variable, non_core_thread } => {
                assert_eq!(core_thread, "CONTRACT_WORKER");
                assert_eq!(variable, "12345.com.x.Model.value");
                assert_eq!(non_core_thread, "pool-1-thread-1");
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_read_without_payload_is_none() {
        assert_eq!(classify("Invalid read: something unexpected"), LineKind::None);
    }

    #[test]
    fn test_classify_stack_markers() {
        assert_eq!(classify("FATAL Current thread stack trace: "), LineKind::EnterCoreStack);
        assert_eq!(
            classify("FATAL Previous NON_CORE thread write stack trace: "),
            LineKind::EnterNonCoreStack
        );
    }

    // ── Frames ──────────────────────────────────────────────────

    #[test]
    fn test_classify_frame_line() {
        assert_eq!(classify("    at com.x.Foo.bar(Foo.java:42)"), LineKind::FrameLine);
        assert_eq!(classify("\tat java.lang.Object.wait(Native Method)"), LineKind::FrameLine);
    }

    #[test]
    fn test_word_containing_at_is_not_frame() {
        assert_eq!(classify("attempting nothing"), LineKind::None);
        assert_eq!(classify("    atomic counter"), LineKind::None);
    }

    #[test]
    fn test_classify_omitted_frames() {
        assert_eq!(classify("    ... 12 more"), LineKind::OmittedFrames { count: 12 });
        assert_eq!(classify("... 3 more"), LineKind::OmittedFrames { count: 3 });
    }

    #[test]
    fn test_omitted_frames_requires_exact_shape() {
        assert_eq!(classify("    ... and 12 more things"), LineKind::None);
    }

    // ── Annotations ─────────────────────────────────────────────

    #[test]
    fn test_classify_ignored_static_init() {
        let line = "INFO Field INSTANCE in class com.x.Registry will ignore static initialization writes";
        assert_eq!(
            classify(line),
            LineKind::IgnoredStaticInit { field: "INSTANCE", class: "com.x.Registry" }
        );
    }

    #[test]
    fn test_classify_excluded_class() {
        let line = "INFO Class com.x.SafeCache is excluded from thread safety check due to @RsmThreadSafe";
        assert_eq!(classify(line), LineKind::ExcludedClass { class: "com.x.SafeCache" });
    }

    #[test]
    fn test_classify_excluded_method() {
        let line = "INFO Method refresh in class com.x.Cache is excluded from thread safety check due to @RsmThreadSafe";
        assert_eq!(
            classify(line),
            LineKind::ExcludedMethod { method: "refresh", class: "com.x.Cache" }
        );
    }

    #[test]
    fn test_excluded_method_in_class_named_like_class() {
        let line = "Method run in class com.x.MyClass is excluded from thread safety check due to @RsmThreadSafe";
        assert_eq!(
            classify(line),
            LineKind::ExcludedMethod { method: "run", class: "com.x.MyClass" }
        );
    }

    #[test]
    fn test_classify_excluded_field() {
        let line = "Field size in class com.x.Cache is excluded from thread safety check due to @RsmThreadSafe";
        assert_eq!(
            classify(line),
            LineKind::ExcludedField { field: "size", class: "com.x.Cache" }
        );
    }

    #[test]
    fn test_exclusion_marker_without_subject_is_none() {
        assert_eq!(
            classify("Everything is excluded from thread safety check due to @RsmThreadSafe"),
            LineKind::None
        );
    }

    #[test]
    fn test_unrelated_lines_are_none() {
        for line in [
            "",
            "Thread Monitor Agent started successfully",
            "Checking access for com.x.Foo.bar by thread main",
            "Visiting method: run",
        ] {
            assert_eq!(classify(line), LineKind::None, "line: {:?}", line);
        }
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(classify(INVALID_READ_LINE).name(), "start_violation");
        assert_eq!(LineKind::None.name(), "none");
    }
}
