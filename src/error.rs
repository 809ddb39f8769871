//! Error types for the mazerl crate

use thiserror::Error;

/// Main error type for the mazerl crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid maze dimensions {height}x{width} (both must be at least {minimum})")]
    InvalidDimensions {
        height: usize,
        width: usize,
        minimum: usize,
    },

    #[error("invalid maze size {size} (expected one of: {expected})")]
    InvalidMazeSize { size: usize, expected: String },

    #[error("invalid training mode '{input}'. Expected one of: {expected}")]
    ParseTrainingMode { input: String, expected: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("value table shape {found:?} does not match expected {expected:?}")]
    TableShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    /// Whether this error means the requested item simply does not exist.
    ///
    /// Storage callers treat a missing value table as a cold start and every
    /// other failure as a corrupt or unreadable one.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
