//! Adapter configuration: remote address, timeout, and per-space defaults.
//!
//! Configuration is resolved once at process start (see [`AdapterConfig::from_env`]) and
//! passed by value into the client builder. Nothing here is read lazily or cached globally.

use crate::error::{Error, ErrorContext};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding the remote base address.
pub const BASE_URL_ENV: &str = "GRADIO_SPACE_URL";

/// Publicly hosted instance used when no address is configured.
pub const DEFAULT_BASE_URL: &str =
    "https://jaysadatay-llama-3-1-8b-instruct-and-codestral-22b-v0-1.hf.space";

/// Path of the prediction endpoint, appended to the base address.
pub const PREDICT_PATH: &str = "/api/predict";

/// Connect timeout and the longest the remote may stay silent. Not a total deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful assistant.";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_TOP_P: f64 = 0.95;
pub const DEFAULT_TOP_K: u32 = 40;
pub const DEFAULT_REPEAT_PENALTY: f64 = 1.0;

/// Defaults that differ between deployed spaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPreset {
    /// Model name reported back to the caller in completions.
    pub name: String,
    /// Model identifier sent in slot 2 when the caller gives none.
    pub default_model: String,
    pub default_ctx_size: u32,
    pub default_temperature: f64,
    /// Routing index of the chat function on the remote app.
    pub fn_index: u32,
}

impl ChatPreset {
    /// Llama 3.1 8B / Codestral space.
    pub fn llama_codestral() -> Self {
        Self {
            name: "gradio-llama".to_string(),
            default_model: "Meta-Llama-3.1-8B-Instruct.Q6_K.gguf".to_string(),
            default_ctx_size: 8192,
            default_temperature: 0.1,
            fn_index: 0,
        }
    }

    /// Qwen3 8B space.
    pub fn qwen3() -> Self {
        Self {
            name: "gradio-qwen".to_string(),
            default_model: "n8n_Qwen3-8B".to_string(),
            default_ctx_size: 32192,
            default_temperature: 0.4,
            fn_index: 0,
        }
    }
}

impl Default for ChatPreset {
    fn default() -> Self {
        Self::llama_codestral()
    }
}

/// Everything a client needs to reach one remote space.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    base_url: String,
    pub timeout: Duration,
    pub preset: ChatPreset,
}

impl AdapterConfig {
    /// Build a config for `base_url`. Trailing slashes are stripped.
    pub fn new(base_url: impl Into<String>, preset: ChatPreset) -> Result<Self> {
        let base_url = normalize_base_url(&base_url.into())?;
        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            preset,
        })
    }

    /// Resolve the base address from `GRADIO_SPACE_URL`, falling back to [`DEFAULT_BASE_URL`].
    pub fn from_env(preset: ChatPreset) -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, preset)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full address of the prediction endpoint.
    pub fn predict_url(&self) -> String {
        format!("{}{}", self.base_url, PREDICT_PATH)
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid base address '{}'", raw),
            ErrorContext::new()
                .with_field_path("config.base_url")
                .with_details(e.to_string())
                .with_source("adapter_config"),
        )
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::configuration_with_context(
            format!("unsupported scheme '{}'", parsed.scheme()),
            ErrorContext::new()
                .with_field_path("config.base_url")
                .with_source("adapter_config"),
        ));
    }
    Ok(trimmed.to_string())
}
