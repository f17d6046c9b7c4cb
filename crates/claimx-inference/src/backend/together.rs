//! Hosted backend for OpenAI-compatible chat completion endpoints (Together AI).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::InferenceError;
use crate::{ChatBackend, ChatRequest, Result};

/// Default Together AI chat completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.together.xyz/v1/chat/completions";

/// Backend calling a hosted chat completions API with bearer auth.
pub struct TogetherBackend {
    http: Client,
    api_url: String,
    api_key: String,
}

impl TogetherBackend {
    /// Create a backend for the given endpoint and key.
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(InferenceError::MissingApiKey)?;

        let http = Client::builder()
            .user_agent(concat!("claimx/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InferenceError::Http(e.to_string()))?;

        Ok(Self {
            http,
            api_url: api_url.into(),
            api_key,
        })
    }

    /// Endpoint this backend posts to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

#[async_trait]
impl ChatBackend for TogetherBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        debug!(
            "Posting {} messages to {} (model {}, timeout {}s)",
            request.messages.len(),
            self.api_url,
            request.model,
            request.timeout_secs
        );

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(request.timeout_secs))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout(request.timeout_secs)
                } else {
                    InferenceError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Model API returned {}", status);
            return Err(InferenceError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                InferenceError::Timeout(request.timeout_secs)
            } else {
                InferenceError::InvalidResponse(e.to_string())
            }
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| InferenceError::InvalidResponse("response has no choices".into()))
    }

    fn name(&self) -> &str {
        "together"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatMessage;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn request() -> ChatRequest {
        let mut request = ChatRequest::new("llama", vec![ChatMessage::user("Extract")]);
        request.timeout_secs = 5;
        request
    }

    #[test]
    fn test_missing_api_key_rejected() {
        assert!(matches!(
            TogetherBackend::new(DEFAULT_API_URL, None),
            Err(InferenceError::MissingApiKey)
        ));
        assert!(matches!(
            TogetherBackend::new(DEFAULT_API_URL, Some("  ".into())),
            Err(InferenceError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn test_returns_trimmed_first_choice() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer secret");
                then.status(200).json_body(json!({
                    "choices": [{"message": {"role": "assistant", "content": "  {\"a\": 1}\n"}}]
                }));
            })
            .await;

        let backend =
            TogetherBackend::new(server.url("/v1/chat/completions"), Some("secret".into()))
                .unwrap();
        let text = backend.complete(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_error_status_preserves_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(429).body("rate limited");
            })
            .await;

        let backend =
            TogetherBackend::new(server.url("/v1/chat/completions"), Some("secret".into()))
                .unwrap();
        let err = backend.complete(&request()).await.unwrap_err();

        match err {
            InferenceError::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({"choices": []}));
            })
            .await;

        let backend =
            TogetherBackend::new(server.url("/v1/chat/completions"), Some("secret".into()))
                .unwrap();
        let err = backend.complete(&request()).await.unwrap_err();

        assert!(matches!(err, InferenceError::InvalidResponse(_)));
    }
}
