use crate::protocol::{AdapterConfig, PredictPayload};
use crate::transport::{TransportError, REQUEST_ID_HEADER, SSE_ACCEPT};
use crate::{BoxStream, Error, Result};
use bytes::Bytes;
use futures::{stream, Future, StreamExt};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Async transport. Cheap to share: the inner `reqwest::Client` is reference counted and
/// safe for overlapping calls.
///
/// `reqwest`'s async client only offers a whole-request deadline, which would cut off long
/// generations. The client therefore gets a connect timeout, and every later wait (response
/// head, body, each stream read) is bounded separately by `read_timeout`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    read_timeout: Duration,
}

/// Bound a single wait on the remote.
async fn within<T>(
    limit: Duration,
    fut: impl Future<Output = std::result::Result<T, reqwest::Error>>,
) -> Result<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res.map_err(|e| Error::Transport(TransportError::Http(e))),
        Err(_) => Err(Error::Transport(TransportError::Timeout(limit))),
    }
}

impl HttpTransport {
    pub fn new(config: &AdapterConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            url: config.predict_url(),
            read_timeout: config.timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the payload and return the response once its status is known to be 2xx.
    pub async fn post_predict(
        &self,
        payload: &PredictPayload,
        streaming: bool,
    ) -> Result<reqwest::Response> {
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
            "gradio-adapter sending prediction request"
        );

        let resp = within(self.read_timeout, req.send()).await?;

        let status = resp.status();
        if !status.is_success() {
            let body = within(self.read_timeout, resp.text())
                .await
                .unwrap_or_default();
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

    /// Non-streaming call; returns the full response body.
    pub async fn predict(&self, payload: &PredictPayload) -> Result<Bytes> {
        let resp = self.post_predict(payload, false).await?;
        within(self.read_timeout, resp.bytes()).await
    }

    /// Streaming call; returns the raw body as a byte stream.
    ///
    /// The stream ends after the first error. A read that waits longer than the timeout
    /// yields [`TransportError::Timeout`]; total duration is unbounded.
    pub async fn predict_stream(&self, payload: &PredictPayload) -> Result<BoxStream<'static, Bytes>> {
        let resp = self.post_predict(payload, true).await?;
        let limit = self.read_timeout;
        let body = Box::pin(resp.bytes_stream());

        let byte_stream = stream::unfold(Some(body), move |body| async move {
            let mut body = body?;
            match tokio::time::timeout(limit, body.next()).await {
                Ok(Some(Ok(bytes))) => Some((Ok(bytes), Some(body))),
                Ok(Some(Err(e))) => Some((Err(Error::Transport(TransportError::Http(e))), None)),
                Ok(None) => None,
                Err(_) => {
                    warn!(timeout_ms = limit.as_millis(), "prediction stream went idle");
                    Some((Err(Error::Transport(TransportError::Timeout(limit))), None))
                }
            }
        });
        Ok(Box::pin(byte_stream))
    }
}
