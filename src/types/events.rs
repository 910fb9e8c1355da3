//! Streaming chunks delivered to the caller

use super::response::Usage;
use serde::{Deserialize, Serialize};

/// One unit of incremental output in a streaming call.
///
/// `text` is the accumulated text so far, except for raw fallback frames (see
/// [`crate::pipeline::decode::FrameDecode::RawFallback`]), which carry the undecoded payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingChunk {
    pub text: String,
    pub is_finished: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    pub index: u32,
    #[serde(default)]
    pub tool_use: Option<serde_json::Value>,
    pub usage: Usage,
}

impl StreamingChunk {
    /// An in-progress chunk.
    pub fn partial(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_finished: false,
            finish_reason: None,
            index: 0,
            tool_use: None,
            usage: Usage::default(),
        }
    }

    /// The closing chunk of a stream (`finish_reason = "stop"`).
    pub fn finished(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_finished: true,
            finish_reason: Some("stop".to_string()),
            index: 0,
            tool_use: None,
            usage: Usage::default(),
        }
    }
}
