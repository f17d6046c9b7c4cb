//! Subcommands and the helpers they share.

pub mod ask;
pub mod batch;
pub mod config;
pub mod extract;
pub mod output;
pub mod preparse;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use claimx_core::{ClaimPipeline, ClaimsConfig, TogetherBackend};

/// `<config dir>/claimx/config.json`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("claimx")
        .join("config.json")
}

/// Config file in use: the `--config` path, else the default location.
pub fn resolve_config_path(config_path: Option<&Path>) -> PathBuf {
    config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path)
}

/// Load the config file (defaults when the default file is absent), then
/// apply environment overrides.
pub fn load_config(config_path: Option<&Path>) -> anyhow::Result<ClaimsConfig> {
    let path = resolve_config_path(config_path);

    let config = if config_path.is_some() || path.exists() {
        debug!("Loading config from {}", path.display());
        ClaimsConfig::from_file(&path)?
    } else {
        ClaimsConfig::default()
    };

    Ok(config.with_env_overrides()?)
}

/// Pipeline over the hosted backend described by `config`.
pub fn build_pipeline(config: ClaimsConfig) -> anyhow::Result<ClaimPipeline<TogetherBackend>> {
    let backend = TogetherBackend::new(config.model.api_url.clone(), config.model.api_key.clone())
        .map_err(|e| anyhow::anyhow!("{}. Set TOGETHER_API_KEY or add it to .env.", e))?;
    Ok(ClaimPipeline::new(config, backend))
}

/// Read an OCR text file.
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    Ok(fs::read_to_string(path)?)
}

/// File name recorded as `document.source_filename`.
pub fn source_filename(path: &Path, filename: Option<&str>) -> String {
    filename.map(str::to_string).unwrap_or_else(|| {
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("document")
            .to_string()
    })
}
