use crate::client::types::{make_cancellable, CancelHandle};
use crate::pipeline::chunk_stream;
use crate::protocol::{AdapterConfig, ChatParams, PredictPayload};
use crate::transport::HttpTransport;
use crate::types::events::StreamingChunk;
use crate::types::response::{decode_completion, ChatCompletion};
use crate::{BoxStream, Result};
use std::sync::Arc;
use tracing::debug;

/// Async adapter client: OpenAI-style calls in, positional predictions out.
///
/// Clones share one connection pool; overlapping calls are independent.
#[derive(Debug, Clone)]
pub struct GradioClient {
    pub(crate) config: AdapterConfig,
    pub(crate) transport: Arc<HttpTransport>,
}

/// Result of [`GradioClient::execute`].
pub enum ChatOutput {
    Completion(ChatCompletion),
    Stream(BoxStream<'static, StreamingChunk>),
}

impl GradioClient {
    /// Create a client for an explicit configuration.
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self { config, transport })
    }

    pub fn builder() -> crate::client::builder::GradioClientBuilder {
        crate::client::builder::GradioClientBuilder::new()
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Positional payload that a call with `params` would send.
    pub fn build_payload(&self, params: &ChatParams) -> PredictPayload {
        params.to_payload(&self.config.preset)
    }

    /// Non-streaming completion.
    pub async fn completion(&self, params: &ChatParams) -> Result<ChatCompletion> {
        let payload = self.build_payload(params);
        let body = self.transport.predict(&payload).await?;
        let completion = decode_completion(&body, &self.config.preset.name)?;
        debug!(
            model = completion.model.as_str(),
            content_len = completion.content().len(),
            "gradio-adapter completion decoded"
        );
        Ok(completion)
    }

    /// Streaming completion. The stream ends with one finished chunk unless a transport
    /// error cuts it short.
    pub async fn streaming(
        &self,
        params: &ChatParams,
    ) -> Result<BoxStream<'static, StreamingChunk>> {
        let payload = self.build_payload(params);
        let bytes = self.transport.predict_stream(&payload).await?;
        Ok(chunk_stream(bytes))
    }

    /// Streaming completion plus a handle that aborts it.
    pub async fn streaming_with_cancel(
        &self,
        params: &ChatParams,
    ) -> Result<(BoxStream<'static, StreamingChunk>, CancelHandle)> {
        let stream = self.streaming(params).await?;
        Ok(make_cancellable(stream))
    }

    /// Dispatch on the caller's streaming flag.
    pub async fn execute(&self, params: &ChatParams, streaming: bool) -> Result<ChatOutput> {
        if streaming {
            Ok(ChatOutput::Stream(self.streaming(params).await?))
        } else {
            Ok(ChatOutput::Completion(self.completion(params).await?))
        }
    }
}
