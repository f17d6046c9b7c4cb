//! Chat backend implementations.

pub mod together;

use async_trait::async_trait;

use crate::{ChatRequest, Result};

/// Trait for chat-completion backends.
///
/// Implementations perform exactly one outbound call per `complete` and
/// never retry; a timeout or error status is returned to the caller as-is.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Run a chat completion and return the assistant message text.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;

    /// Short backend name used in logs.
    fn name(&self) -> &str;
}
