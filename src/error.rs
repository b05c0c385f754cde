use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the reclaim-rs application
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to delete {path}: {source}")]
    DeleteFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Cannot list {path}: {source}")]
    ListFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid tree handle '{handle}': {reason}")]
    InvalidHandle { handle: String, reason: String },

    #[error("Invalid settings file {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Platform not supported: {0}")]
    NotSupported(String),
}

impl CleanError {
    pub(crate) fn invalid_handle(handle: &str, reason: impl Into<String>) -> Self {
        Self::InvalidHandle {
            handle: handle.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for cleaner error handling
pub type Result<T> = std::result::Result<T, CleanError>;
