//! Chat-completion abstraction layer for claimx.
//!
//! This crate provides a unified interface for calling hosted language
//! models:
//! - `ChatBackend` trait used by the extraction pipeline
//! - `TogetherBackend` speaking the OpenAI-compatible chat completions API

mod backend;
mod error;
mod message;

pub use backend::ChatBackend;
pub use backend::together::{TogetherBackend, DEFAULT_API_URL};
pub use error::InferenceError;
pub use message::{ChatMessage, ChatRequest, Role};

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
