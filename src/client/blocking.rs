use crate::pipeline::ChunkIter;
use crate::protocol::{AdapterConfig, ChatParams, PredictPayload};
use crate::transport::BlockingTransport;
use crate::types::response::{decode_completion, ChatCompletion};
use crate::Result;
use std::io::BufReader;
use std::sync::Arc;
use tracing::debug;

/// Chunk iterator over a live blocking response. Dropping it closes the connection.
pub type BlockingChunkIter = ChunkIter<BufReader<reqwest::blocking::Response>>;

/// Blocking counterpart of [`super::GradioClient`], same semantics.
#[derive(Debug, Clone)]
pub struct BlockingGradioClient {
    pub(crate) config: AdapterConfig,
    pub(crate) transport: Arc<BlockingTransport>,
}

/// Result of [`BlockingGradioClient::execute`].
pub enum BlockingChatOutput {
    Completion(ChatCompletion),
    Stream(BlockingChunkIter),
}

impl BlockingGradioClient {
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let transport = Arc::new(BlockingTransport::new(&config)?);
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn build_payload(&self, params: &ChatParams) -> PredictPayload {
        params.to_payload(&self.config.preset)
    }

    pub fn completion(&self, params: &ChatParams) -> Result<ChatCompletion> {
        let payload = self.build_payload(params);
        let body = self.transport.predict(&payload)?;
        let completion = decode_completion(&body, &self.config.preset.name)?;
        debug!(
            model = completion.model.as_str(),
            content_len = completion.content().len(),
            "gradio-adapter completion decoded"
        );
        Ok(completion)
    }

    /// Streaming completion; each `next()` blocks until the next line arrives.
    pub fn streaming(&self, params: &ChatParams) -> Result<BlockingChunkIter> {
        let payload = self.build_payload(params);
        let reader = self.transport.predict_stream(&payload)?;
        Ok(ChunkIter::new(reader))
    }

    pub fn execute(&self, params: &ChatParams, streaming: bool) -> Result<BlockingChatOutput> {
        if streaming {
            Ok(BlockingChatOutput::Stream(self.streaming(params)?))
        } else {
            Ok(BlockingChatOutput::Completion(self.completion(params)?))
        }
    }
}
