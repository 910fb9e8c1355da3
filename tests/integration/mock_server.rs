//! Mock HTTP server setup for integration tests

use gradio_adapter::{BlockingGradioClient, ChatPreset, GradioClient, GradioClientBuilder};
use mockito::{Mock, Server, ServerGuard};

pub const PREDICT_PATH: &str = "/api/predict";

/// Test fixture that owns a mock prediction server
pub struct MockServerFixture {
    pub server: ServerGuard,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        Self {
            server: Server::new_async().await,
        }
    }

    /// For plain `#[test]` functions driving the blocking client.
    pub fn new_blocking() -> Self {
        Self {
            server: Server::new(),
        }
    }

    pub fn base_url(&self) -> String {
        self.server.url()
    }

    pub fn builder(&self) -> GradioClientBuilder {
        GradioClientBuilder::new().base_url(self.base_url())
    }

    pub fn client(&self) -> GradioClient {
        self.builder().build().expect("client")
    }

    pub fn client_with_preset(&self, preset: ChatPreset) -> GradioClient {
        self.builder().preset(preset).build().expect("client")
    }

    pub fn blocking_client(&self) -> BlockingGradioClient {
        self.builder().build_blocking().expect("blocking client")
    }

    /// Unregistered mock answering with a JSON body.
    pub fn json_mock(&mut self, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", PREDICT_PATH)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
    }

    /// Unregistered mock answering with an SSE body built from `lines`.
    pub fn sse_mock(&mut self, lines: &[&str]) -> Mock {
        self.server
            .mock("POST", PREDICT_PATH)
            .match_header("accept", "text/event-stream")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(sse_body(lines))
    }
}

/// Each line becomes one SSE event (line + blank separator).
pub fn sse_body(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("{}\n\n", l)).collect()
}
