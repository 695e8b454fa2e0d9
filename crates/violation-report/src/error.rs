use std::path::PathBuf;

use monitor_log::MonitorLogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialise report: {0}")]
    Render(#[from] serde_json::Error),

    #[error(transparent)]
    Scan(#[from] MonitorLogError),
}

// Convenience type alias
pub type ReportResult<T> = Result<T, ReportError>;
