use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorLogError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid violation summary {}: {source}", path.display())]
    InvalidSummary {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type MonitorLogResult<T> = Result<T, MonitorLogError>;
