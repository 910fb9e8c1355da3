//! HTTP transport to the prediction endpoint, in async and blocking flavors.
//!
//! Both transports own one reusable client and share the same status handling: any non-2xx
//! reply becomes [`crate::Error::Remote`]. The configured timeout bounds connecting and
//! each wait for bytes, never the whole exchange, so a stream that keeps producing output
//! may run for as long as the remote keeps talking.

pub mod blocking;
pub mod http;

pub use blocking::BlockingTransport;
pub use http::HttpTransport;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no data received for {0:?}")]
    Timeout(std::time::Duration),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Http(e) => e.is_timeout(),
            TransportError::Timeout(_) => true,
            TransportError::Other(_) => false,
        }
    }
}

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";
pub(crate) const SSE_ACCEPT: &str = "text/event-stream";
