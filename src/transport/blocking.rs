use crate::protocol::{AdapterConfig, PredictPayload};
use crate::transport::{TransportError, REQUEST_ID_HEADER, SSE_ACCEPT};
use crate::{Error, Result};
use std::io::BufReader;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// Blocking transport backed by `reqwest::blocking`.
///
/// Must not be driven from inside an async runtime; use [`super::HttpTransport`] there.
#[derive(Debug, Clone)]
pub struct BlockingTransport {
    client: reqwest::blocking::Client,
    url: String,
}

impl BlockingTransport {
    pub fn new(config: &AdapterConfig) -> Result<Self> {
        // The blocking client applies this per read of the body, not to the whole response.
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            url: config.predict_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn post_predict(
        &self,
        payload: &PredictPayload,
        streaming: bool,
    ) -> Result<reqwest::blocking::Response> {
        let client_request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let mut req = self
            .client
            .post(&self.url)
            .json(payload)
            .header(REQUEST_ID_HEADER, client_request_id.as_str());
        if streaming {
            req = req.header("accept", SSE_ACCEPT);
        }

        debug!(
            client_request_id = client_request_id.as_str(),
            endpoint = self.url.as_str(),
            streaming,
            "gradio-adapter sending blocking prediction request"
        );

        let resp = req
            .send()
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            info!(
                http_status = status.as_u16(),
                client_request_id = client_request_id.as_str(),
                endpoint = self.url.as_str(),
                duration_ms = start.elapsed().as_millis(),
                "gradio-adapter request failed"
            );
            return Err(Error::Remote {
                status: status.as_u16(),
                message: body,
            });
        }

        info!(
            http_status = status.as_u16(),
            client_request_id = client_request_id.as_str(),
            endpoint = self.url.as_str(),
            duration_ms = start.elapsed().as_millis(),
            streaming,
            "gradio-adapter request accepted"
        );
        Ok(resp)
    }

    pub fn predict(&self, payload: &PredictPayload) -> Result<Vec<u8>> {
        let resp = self.post_predict(payload, false)?;
        let body = resp
            .bytes()
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        Ok(body.to_vec())
    }

    /// Streaming call; the body is read line by line as it arrives.
    pub fn predict_stream(
        &self,
        payload: &PredictPayload,
    ) -> Result<BufReader<reqwest::blocking::Response>> {
        let resp = self.post_predict(payload, true)?;
        Ok(BufReader::new(resp))
    }
}
