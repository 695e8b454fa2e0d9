//! Load: config loading from file and environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use super::model::{LogFormat, ReportConfig};
use crate::error::ReportError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "violation-report.toml";

impl ReportConfig {
    /// Load configuration from file and environment variables
    /// Priority: Environment Variables > Config File > Defaults
    ///
    /// An explicitly requested file must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ReportError> {
        let mut config = match explicit {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                Self::from_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                tracing::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                tracing::debug!("Config file {} not found, using defaults", DEFAULT_CONFIG_FILE);
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ReportError> {
        let contents = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| ReportError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Environment variables override file config.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("REPORT_ROOT_DIR") {
            self.root_dir = PathBuf::from(root);
        }
        if let Some(log) = lookup("REPORT_LOG_FILE") {
            self.log_file = PathBuf::from(log);
        }
        if let Some(violations) = lookup("REPORT_VIOLATIONS_FILE") {
            self.violations_file = PathBuf::from(violations);
        }
        if let Some(output) = lookup("REPORT_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(output);
        }
        if let Some(level) = lookup("REPORT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("REPORT_LOG_FORMAT") {
            match format.to_ascii_lowercase().as_str() {
                "json" => self.logging.format = LogFormat::Json,
                "pretty" => self.logging.format = LogFormat::Pretty,
                other => tracing::warn!("Ignoring unknown REPORT_LOG_FORMAT value: {}", other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::model::LogOutput;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_toml_partial_uses_defaults() {
        let cfg = ReportConfig::from_toml_str(
            r#"
root_dir = "/opt/monitor"
report_title = "Nightly run"

[logging]
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(cfg.root_dir, PathBuf::from("/opt/monitor"));
        assert_eq!(cfg.report_title, "Nightly run");
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.html_file_name, "violations_report.html");
    }

    #[test]
    fn test_from_toml_file_output() {
        let cfg = ReportConfig::from_toml_str(
            r#"
[logging.output.file]
path = "/tmp/report.log"
"#,
        )
        .unwrap();
        assert_eq!(cfg.logging.output, LogOutput::File { path: "/tmp/report.log".to_string() });
    }

    #[test]
    fn test_from_toml_invalid() {
        assert!(ReportConfig::from_toml_str("root_dir = [1, 2").is_err());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut cfg = ReportConfig::from_toml_str(r#"log_file = "from-file.log""#).unwrap();
        cfg.apply_env(env(&[
            ("REPORT_LOG_FILE", "from-env.log"),
            ("REPORT_LOG_LEVEL", "debug"),
            ("REPORT_LOG_FORMAT", "JSON"),
        ]));

        assert_eq!(cfg.log_file, PathBuf::from("from-env.log"));
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_env_log_format_ignored() {
        let mut cfg = ReportConfig::default();
        cfg.apply_env(env(&[("REPORT_LOG_FORMAT", "xml")]));
        assert_eq!(cfg.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_from_file_roundtrip_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.toml");
        fs::write(&path, "output_dir = \"out\"\n").unwrap();

        let cfg = ReportConfig::from_file(&path).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("out"));

        let missing = ReportConfig::from_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ReportError::Io { .. }));

        fs::write(&path, "output_dir = ").unwrap();
        let broken = ReportConfig::from_file(&path).unwrap_err();
        assert!(matches!(broken, ReportError::ConfigParse { .. }));
    }

    #[test]
    fn test_load_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReportConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }
}
