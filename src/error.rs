//! Error types for the serverfs library.

use thiserror::Error;

/// Main error type for serverfs operations.
///
/// The `Display` text of every variant is the message shown to the user, so
/// remote failures are classified into readable text before they get here
/// (see [`crate::api::error::classify`]).
#[derive(Error, Debug)]
pub enum Error {
    /// The target path already exists on the server.
    #[error("{0}")]
    Conflict(String),

    /// A name was rejected locally, before any remote call.
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// A permission mode string was rejected locally.
    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    /// The daemon rejected the operation.
    #[error("{0}")]
    OperationFailed(String),

    /// A bulk operation where only some items succeeded.
    #[error("{succeeded} of {total} items succeeded")]
    PartialFailure { succeeded: usize, total: usize },

    /// An upload batch stopped at the first failed file.
    #[error("Upload stopped after {uploaded} of {total} files: {source}")]
    UploadAborted {
        uploaded: usize,
        total: usize,
        #[source]
        source: Box<Error>,
    },

    /// HTTP request failed with status code and no usable body.
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// Network request error.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Local I/O error while reading upload content or config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed configuration.
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures that the user can fix by choosing another name.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    /// Collapse transport-level failures into `OperationFailed`, keeping the
    /// classified variants as they are.
    pub fn into_operation_failure(self) -> Self {
        match self {
            Error::Conflict(_)
            | Error::InvalidName(_)
            | Error::InvalidMode(_)
            | Error::OperationFailed(_)
            | Error::PartialFailure { .. }
            | Error::UploadAborted { .. } => self,
            other => Error::OperationFailed(other.to_string()),
        }
    }
}

/// Result type alias for serverfs operations.
pub type Result<T> = std::result::Result<T, Error>;
