//! Error types for the inference layer.

use thiserror::Error;

/// Errors that can occur while calling a hosted model.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// No API key was configured for the backend.
    #[error("model API key is not configured")]
    MissingApiKey,

    /// The request did not complete within the configured timeout.
    #[error("model request timed out after {0}s")]
    Timeout(u64),

    /// The service answered with a non-success status.
    #[error("model API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered but the payload was not a chat completion.
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}
