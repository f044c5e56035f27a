use thiserror::Error;

use gscore_overlaprs::LookupError;
use gscore_sources::SourceError;

#[derive(Error, Debug)]
pub enum EngineError {
    /// An invalid parameter or parameter combination, raised before any source is queried.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A parallel counting worker failed; the whole count is abandoned.
    #[error("Counting worker {worker} failed: {source}")]
    WorkerFailure {
        worker: usize,
        #[source]
        source: Box<EngineError>,
    },

    #[error("Could not build worker pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

pub(crate) fn config_error(message: impl Into<String>) -> EngineError {
    EngineError::ConfigurationError(message.into())
}
