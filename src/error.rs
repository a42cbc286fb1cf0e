//! Error types for the walk renderer

use thiserror::Error;

/// Result type alias for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering a walk or answering a host call
#[derive(Error, Debug)]
pub enum Error {
    /// The host supplied the wrong number of arguments
    #[error("Expected {expected} arguments: stepLength, numSteps, width, height")]
    Arity { expected: usize, got: usize },

    /// Parameters were rejected before any canvas was allocated
    #[error("Invalid parameters: {0}")]
    Validation(String),

    /// The canvas could not be serialized to PNG
    #[error("PNG encoding failed: {0}")]
    Encoding(String),

    /// The host called a name that was never registered
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Transport failure in the native serve loop
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed request line in the native serve loop
    #[error("Malformed request: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        Error::Encoding(err.to_string())
    }
}
