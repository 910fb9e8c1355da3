use crate::client::blocking::BlockingGradioClient;
use crate::client::core::GradioClient;
use crate::protocol::{AdapterConfig, ChatPreset};
use crate::Result;
use std::time::Duration;

/// Builder for creating clients with custom configuration.
///
/// Without an explicit base URL the address comes from `GRADIO_SPACE_URL` or the built-in
/// default, resolved once at build time.
#[derive(Debug, Clone, Default)]
pub struct GradioClientBuilder {
    base_url: Option<String>,
    preset: ChatPreset,
    timeout: Option<Duration>,
}

impl GradioClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-resolved configuration.
    pub fn from_config(config: AdapterConfig) -> Self {
        Self {
            base_url: Some(config.base_url().to_string()),
            preset: config.preset,
            timeout: Some(config.timeout),
        }
    }

    /// Override the remote base address (also used to point tests at mock servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Select the per-space defaults.
    pub fn preset(mut self, preset: ChatPreset) -> Self {
        self.preset = preset;
        self
    }

    /// Override the connect/idle-read timeout (default 120s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn resolve(self) -> Result<AdapterConfig> {
        let mut config = match self.base_url {
            Some(url) => AdapterConfig::new(url, self.preset)?,
            None => AdapterConfig::from_env(self.preset)?,
        };
        if let Some(t) = self.timeout {
            config.timeout = t;
        }
        Ok(config)
    }

    /// Build the async client.
    pub fn build(self) -> Result<GradioClient> {
        GradioClient::new(self.resolve()?)
    }

    /// Build the blocking client.
    pub fn build_blocking(self) -> Result<BlockingGradioClient> {
        BlockingGradioClient::new(self.resolve()?)
    }
}
