//! Error types for the claimx-core library.

use thiserror::Error;

/// Main error type for the claimx library.
#[derive(Error, Debug)]
pub enum ClaimsError {
    /// The model response could not be read as a claim record.
    #[error("malformed model output: {0}")]
    MalformedModelOutput(String),

    /// The hosted model call failed or timed out.
    #[error("upstream model error: {0}")]
    Upstream(#[from] claimx_inference::InferenceError),

    /// The document contained no text after cleaning.
    #[error("no text could be extracted from the document")]
    EmptyDocument,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failed to serialize a record.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the claimx library.
pub type Result<T> = std::result::Result<T, ClaimsError>;
