//! Error types for the history store.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for history store operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors surfaced by history writes. Reads never fail.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to create history directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write history to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cannot determine home directory for the default history path")]
    NoHomeDir,
}

impl HistoryError {
    /// Stable machine-readable code for JSON error output.
    pub fn code(&self) -> &'static str {
        match self {
            HistoryError::CreateDir { .. } | HistoryError::Write { .. } | HistoryError::Serialize(_) => {
                "HISTORY_WRITE_ERROR"
            }
            HistoryError::NoHomeDir => "HISTORY_PATH_ERROR",
        }
    }
}
