//! Configuration structures for the extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ClaimsError, Result};

/// Main configuration for the claimx pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimsConfig {
    /// Hosted model used for structured extraction.
    pub model: ModelConfig,

    /// Question answering settings.
    pub qa: QaConfig,

    /// Post-merge extraction settings.
    pub extraction: ExtractionConfig,
}

/// Hosted model configuration for structured extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Chat completions endpoint.
    pub api_url: String,

    /// API key. Only ever taken from `TOGETHER_API_KEY` (or `.env`); config
    /// files neither supply nor store it.
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Model identifier.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum tokens in the completion.
    pub max_tokens: u32,

    pub top_p: f32,

    pub top_k: Option<u32>,

    pub repetition_penalty: Option<f32>,

    /// Stop sequences.
    pub stop: Vec<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_url: claimx_inference::DEFAULT_API_URL.to_string(),
            api_key: None,
            model: "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo".to_string(),
            temperature: 0.0,
            max_tokens: 1500,
            top_p: 0.9,
            top_k: Some(50),
            repetition_penalty: Some(1.0),
            stop: vec!["<|eot_id|>".to_string(), "<|eom_id|>".to_string()],
            timeout_secs: 60,
        }
    }
}

/// Question answering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    pub temperature: f32,

    pub max_tokens: u32,

    pub top_p: f32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum characters of raw document text sent as context.
    pub max_context_chars: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 300,
            top_p: 0.9,
            timeout_secs: 30,
            max_context_chars: 2000,
        }
    }
}

/// Extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Currency applied to `totals.currency` when neither source found one.
    pub default_currency: Option<String>,
}

impl ClaimsConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ClaimsError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply overrides from process environment variables.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Recognized keys: `TOGETHER_API_KEY`, `LLM_API_URL`, `LLM_MODEL`,
    /// `LLM_TEMPERATURE`, `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("TOGETHER_API_KEY") {
            self.model.api_key = Some(key);
        }
        if let Some(url) = lookup("LLM_API_URL") {
            self.model.api_url = url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.model.model = model;
        }
        if let Some(value) = lookup("LLM_TEMPERATURE") {
            self.model.temperature = parse_var("LLM_TEMPERATURE", &value)?;
        }
        if let Some(value) = lookup("LLM_MAX_TOKENS") {
            self.model.max_tokens = parse_var("LLM_MAX_TOKENS", &value)?;
        }
        if let Some(value) = lookup("LLM_TIMEOUT_SECS") {
            self.model.timeout_secs = parse_var("LLM_TIMEOUT_SECS", &value)?;
        }
        Ok(self)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ClaimsError::Config(format!("invalid value for {}: {}", key, value)))
}
