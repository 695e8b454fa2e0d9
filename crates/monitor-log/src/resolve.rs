//! Location resolution: attach source locations to an external violation summary.
//!
//! The summary lists violations by variable and thread names only. Each entry
//! is matched to parsed stack data by variable name and attributed to the
//! first recorded frame of each side.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MonitorLogError;
use crate::parser::{MonitorLog, ThreadSide, Violation};

/// External violation summary: `{"violations": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViolationSummary {
    pub violations: Vec<SummaryEntry>,
}

/// One summary entry. Extra keys in the document are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummaryEntry {
    pub variable: String,
    pub core_thread: String,
    pub non_core_thread: String,
}

impl ViolationSummary {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the summary document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MonitorLogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| MonitorLogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents).map_err(|source| MonitorLogError::InvalidSummary {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Attributed location for one side of a summary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSide {
    pub thread_name: String,
    /// `Class.method:line N`, or null when no frame was recorded
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedViolation {
    pub variable: String,
    pub core_thread: ResolvedSide,
    pub non_core_thread: ResolvedSide,
}

/// Parsed violations keyed by variable name.
///
/// Only one violation is kept per name: when several share a variable, the
/// one parsed last wins.
pub struct LocationIndex<'a> {
    by_variable: HashMap<&'a str, &'a Violation>,
}

impl<'a> LocationIndex<'a> {
    pub fn from_violations(violations: &'a [Violation]) -> Self {
        let mut by_variable = HashMap::with_capacity(violations.len());
        for violation in violations {
            if by_variable.insert(violation.variable.as_str(), violation).is_some() {
                tracing::debug!(
                    variable = %violation.variable,
                    "resolve: repeated variable, keeping the later trace"
                );
            }
        }
        Self { by_variable }
    }

    pub fn get(&self, variable: &str) -> Option<&'a Violation> {
        self.by_variable.get(variable).copied()
    }

    /// First frame of the given side for `variable`, rendered as a location.
    pub fn location(&self, variable: &str, side: ThreadSide) -> Option<String> {
        self.get(variable)
            .and_then(|violation| violation.trace(side).first_frame())
            .map(|frame| frame.location())
    }

    pub fn len(&self) -> usize {
        self.by_variable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_variable.is_empty()
    }
}

/// Resolve every summary entry against the parsed log, in summary order.
pub fn resolve(summary: &ViolationSummary, log: &MonitorLog) -> Vec<ResolvedViolation> {
    let index = LocationIndex::from_violations(&log.violations);

    let resolved: Vec<ResolvedViolation> = summary
        .violations
        .iter()
        .map(|entry| {
            if index.get(&entry.variable).is_none() {
                tracing::debug!(variable = %entry.variable, "resolve: no parsed trace for variable");
            }
            ResolvedViolation {
                variable: entry.variable.clone(),
                core_thread: ResolvedSide {
                    thread_name: entry.core_thread.clone(),
                    location: index.location(&entry.variable, ThreadSide::Core),
                },
                non_core_thread: ResolvedSide {
                    thread_name: entry.non_core_thread.clone(),
                    location: index.location(&entry.variable, ThreadSide::NonCore),
                },
            }
        })
        .collect();

    let unresolved = resolved
        .iter()
        .filter(|r| r.core_thread.location.is_none() && r.non_core_thread.location.is_none())
        .count();
    tracing::info!(
        entries = resolved.len(),
        indexed_variables = index.len(),
        unresolved,
        "resolve: locations attributed"
    );

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_log;
    use serde_json::json;

    const SCENARIO_LOG: &str = "\
Invalid read: CORE thread 'T1' attempting to read variable counter that was written by NON_CORE thread 'T2'
Current thread stack trace:
    at com.x.Foo.bar(Foo.java:42)
Previous NON_CORE thread write stack trace:
    at com.x.Baz.<init>(Baz.java:7)
";

    fn summary(entries: &[(&str, &str, &str)]) -> ViolationSummary {
        ViolationSummary {
            violations: entries
                .iter()
                .map(|(variable, core, non_core)| SummaryEntry {
                    variable: variable.to_string(),
                    core_thread: core.to_string(),
                    non_core_thread: non_core.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_scenario_locations() {
        let log = parse_log(SCENARIO_LOG);
        let resolved = resolve(&summary(&[("counter", "T1", "T2")]), &log);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].core_thread.location.as_deref(), Some("com.x.Foo.bar:line 42"));
        assert_eq!(resolved[0].non_core_thread.location.as_deref(), Some("com.x.Baz.init:line 7"));
    }

    #[test]
    fn test_only_first_frame_used() {
        let log = parse_log(
            "Invalid read: CORE thread 'T1' attempting to read variable v that was written by NON_CORE thread 'T2'
Current thread stack trace:
    at A.foo(X.java:10)
    at B.bar(X.java:20)",
        );
        let resolved = resolve(&summary(&[("v", "T1", "T2")]), &log);
        assert_eq!(resolved[0].core_thread.location.as_deref(), Some("A.foo:line 10"));
        assert_eq!(resolved[0].non_core_thread.location, None);
    }

    #[test]
    fn test_missing_variable_serialises_null_locations() {
        let log = parse_log(SCENARIO_LOG);
        let resolved = resolve(&summary(&[("ghost", "T1", "T2")]), &log);

        let value = serde_json::to_value(&resolved).unwrap();
        assert_eq!(
            value,
            json!([{
                "variable": "ghost",
                "core_thread": {"thread_name": "T1", "location": null},
                "non_core_thread": {"thread_name": "T2", "location": null}
            }])
        );
    }

    #[test]
    fn test_thread_names_come_from_summary() {
        let log = parse_log(SCENARIO_LOG);
        let resolved = resolve(&summary(&[("counter", "CORE-A", "WORKER-B")]), &log);
        assert_eq!(resolved[0].core_thread.thread_name, "CORE-A");
        assert_eq!(resolved[0].non_core_thread.thread_name, "WORKER-B");
    }

    #[test]
    fn test_repeated_variable_last_parsed_wins() {
        let log = parse_log(
            "Invalid read: CORE thread 'T1' attempting to read variable v that was written by NON_CORE thread 'T2'
Current thread stack trace:
    at com.x.First.read(First.java:1)
Invalid read: CORE thread 'T1' attempting to read variable v that was written by NON_CORE thread 'T3'
Current thread stack trace:
    at com.x.Second.read(Second.java:2)",
        );
        let resolved = resolve(&summary(&[("v", "T1", "T2"), ("v", "T1", "T3")]), &log);

        assert_eq!(resolved.len(), 2);
        for entry in &resolved {
            assert_eq!(entry.core_thread.location.as_deref(), Some("com.x.Second.read:line 2"));
        }
    }

    #[test]
    fn test_index_tracks_unique_variables() {
        let log = parse_log(
            "Invalid read: CORE thread 'a' attempting to read variable x that was written by NON_CORE thread 'b'
Invalid read: CORE thread 'a' attempting to read variable x that was written by NON_CORE thread 'c'
Invalid read: CORE thread 'a' attempting to read variable y that was written by NON_CORE thread 'b'",
        );
        let index = LocationIndex::from_violations(&log.violations);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("x").unwrap().non_core_thread.thread_name, "c");
        assert!(index.location("x", ThreadSide::Core).is_none());
    }

    #[test]
    fn test_summary_ignores_extra_fields() {
        let summary = ViolationSummary::from_json_str(
            r#"{"violations": [{"variable": "v", "core_thread": "T1", "non_core_thread": "T2", "count": 3}], "generated": "now"}"#,
        )
        .unwrap();
        assert_eq!(summary.violations.len(), 1);
        assert_eq!(summary.violations[0].variable, "v");
    }

    #[test]
    fn test_summary_missing_key_is_error() {
        assert!(ViolationSummary::from_json_str(r#"{"items": []}"#).is_err());
    }

    #[test]
    fn test_summary_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = ViolationSummary::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, MonitorLogError::Io { .. }));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "not json").unwrap();
        let invalid = ViolationSummary::load(&bad).unwrap_err();
        assert!(matches!(invalid, MonitorLogError::InvalidSummary { .. }));
    }
}
