use std::io;
use thiserror::Error;

/// Error type for score source operations.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source could not be opened, read, or indexed.
    #[error("Can't open score source {path}: {reason}")]
    SourceOpenError { path: String, reason: String },

    /// A query window could not be expressed in the source's coordinates.
    #[error("Invalid query window: {0}")]
    InvalidRegion(String),

    /// IO error occurred while reading records.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for score source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
