//! Model: ReportConfig and related structs.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Base directory for every relative path below
    pub root_dir: PathBuf,
    pub log_file: PathBuf,
    pub violations_file: PathBuf,
    pub output_dir: PathBuf,
    pub locations_file_name: String,
    pub html_file_name: String,
    pub dump_file_name: String,
    pub report_title: String,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stderr,
    File { path: String },
}

/// Values given on the command line; `None` leaves the config untouched.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub violations_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            log_file: PathBuf::from("logs/thread-monitor.log"),
            violations_file: PathBuf::from("thread_violations.json"),
            output_dir: PathBuf::from("output"),
            locations_file_name: "violations_simple.json".to_string(),
            html_file_name: "violations_report.html".to_string(),
            dump_file_name: "violations_full.json".to_string(),
            report_title: "Thread Safety Violations Report".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            output: LogOutput::Stderr,
        }
    }
}

impl ReportConfig {
    /// Resolve `path` against `root_dir` unless it is already absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.resolve(&self.log_file)
    }

    pub fn violations_path(&self) -> PathBuf {
        self.resolve(&self.violations_file)
    }

    pub fn output_dir_path(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir_path().join(file_name)
    }

    /// Apply command-line values (highest priority).
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(root) = &overrides.root_dir {
            self.root_dir = root.clone();
        }
        if let Some(log) = &overrides.log_file {
            self.log_file = log.clone();
        }
        if let Some(violations) = &overrides.violations_file {
            self.violations_file = violations.clone();
        }
        if let Some(output) = &overrides.output_dir {
            self.output_dir = output.clone();
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("locations_file_name", &self.locations_file_name),
            ("html_file_name", &self.html_file_name),
            ("dump_file_name", &self.dump_file_name),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} must not be empty", name));
            }
            if value.contains('/') || value.contains('\\') {
                return Err(format!("{} must be a file name, not a path: {}", name, value));
            }
        }
        if self.report_title.trim().is_empty() {
            return Err("report_title must not be empty".to_string());
        }
        if self.log_file.as_os_str().is_empty() {
            return Err("log_file must not be empty".to_string());
        }
        self.logging.validate()?;
        Ok(())
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("logging.level must not be empty".to_string());
        }
        if let LogOutput::File { path } = &self.output {
            if path.trim().is_empty() {
                return Err("logging.output file path must not be empty".to_string());
            }
        }
        Ok(())
    }
}
