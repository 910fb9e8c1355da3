//! # gradio-adapter
//!
//! OpenAI-style chat completions on top of a remote prediction endpoint that speaks a
//! positional-array contract (`POST /api/predict` with `{"data": [...], "fn_index": 0}`).
//!
//! ## Overview
//!
//! A call flows through four stages:
//!
//! ```text
//! ChatParams → PredictPayload → transport → decode_completion  → ChatCompletion
//!                                         ↘ chunk_stream/ChunkIter → StreamingChunk*
//! ```
//!
//! - **Payload building** ([`protocol`]): every missing parameter gets a documented default
//!   and the eleven arguments are serialized in a single fixed order.
//! - **Transport** ([`transport`]): async or blocking POST with a 120s timeout. Non-2xx
//!   replies fail with [`Error::Remote`]; nothing is retried.
//! - **Decoding** ([`types::response`]): `data[0]` becomes the single assistant choice.
//! - **Reassembly** ([`pipeline`]): SSE fragments are appended to a buffer and each chunk
//!   carries the text so far, closing with exactly one finished chunk.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gradio_adapter::{ChatParams, GradioClient, Message};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> gradio_adapter::Result<()> {
//!     let client = GradioClient::builder().build()?;
//!     let params = ChatParams::new().messages(vec![Message::user("Hello!")]);
//!
//!     let completion = client.completion(&params).await?;
//!     println!("{}", completion.content());
//!
//!     let mut stream = client.streaming(&params).await?;
//!     while let Some(chunk) = stream.next().await {
//!         let chunk = chunk?;
//!         println!("{} (finished: {})", chunk.text, chunk.is_finished);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Configuration, presets, and the positional payload |
//! | [`transport`] | Async and blocking HTTP transports |
//! | [`pipeline`] | SSE decoding and stream reassembly |
//! | [`types`] | Messages, completions, streaming chunks |
//! | [`client`] | Async and blocking clients, builder, cancellation |

pub mod client;
pub mod pipeline;
pub mod protocol;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{
    BlockingChatOutput, BlockingChunkIter, BlockingGradioClient, CancelHandle, ChatOutput,
    GradioClient, GradioClientBuilder,
};
pub use protocol::{AdapterConfig, ChatParams, ChatPreset, PredictArgs, PredictPayload};
pub use types::{
    events::StreamingChunk,
    message::{Message, MessageRole},
    response::{ChatCompletion, Usage},
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
