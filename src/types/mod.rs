//! Core data types exchanged with the caller.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Chat turn with role and content |
//! | [`ChatCompletion`] | Single-shot result of a non-streaming call |
//! | [`StreamingChunk`] | One unit of output during a streaming call |
//! | [`Usage`] | Token accounting (always zero for this endpoint) |

pub mod events;
pub mod message;
pub mod response;

pub use events::StreamingChunk;
pub use message::{Message, MessageContent, MessageRole};
pub use response::{ChatCompletion, Choice, ChoiceMessage, Usage};
