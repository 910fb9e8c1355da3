//! Non-streaming completion result and its decoder

use crate::error::{Error, ErrorContext};
use crate::types::message::MessageRole;
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// Token accounting. The remote endpoint reports none, so every field is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// OpenAI-style `chat.completion` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub id: String,
    pub object: String,
    pub created: u64,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: ChoiceMessage,
    pub finish_reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatCompletion {
    /// Wrap the assistant text in a single-choice completion.
    pub fn from_text(model: impl Into<String>, text: impl Into<String>) -> Self {
        let created = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            id: format!("chatcmpl-{}", uuid::Uuid::new_v4().simple()),
            object: "chat.completion".to_string(),
            created,
            model: model.into(),
            choices: vec![Choice {
                index: 0,
                message: ChoiceMessage {
                    role: MessageRole::Assistant,
                    content: text.into(),
                },
                finish_reason: "stop".to_string(),
            }],
            usage: Usage::default(),
        }
    }

    /// Text of the first choice.
    pub fn content(&self) -> &str {
        self.choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or("")
    }
}

fn malformed(msg: &str, field: &str) -> Error {
    Error::malformed_with_context(
        msg,
        ErrorContext::new()
            .with_field_path(field)
            .with_source("response_decoder"),
    )
}

/// Pull the assistant text out of a non-streaming `{"data": [text, ...]}` body.
///
/// Only `data[0]` is consulted.
pub fn extract_text(body: &[u8]) -> Result<String> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        Error::malformed_with_context(
            "response body is not valid JSON",
            ErrorContext::new()
                .with_details(e.to_string())
                .with_source("response_decoder"),
        )
    })?;

    let data = value
        .get("data")
        .ok_or_else(|| malformed("missing results array", "data"))?
        .as_array()
        .ok_or_else(|| malformed("results field is not an array", "data"))?;

    match data.first() {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(malformed("first result is not a string", "data[0]")),
        None => Err(malformed("results array is empty", "data[0]")),
    }
}

/// Decode a non-streaming response body into a [`ChatCompletion`] for `model`.
pub fn decode_completion(body: &[u8], model: &str) -> Result<ChatCompletion> {
    let text = extract_text(body)?;
    Ok(ChatCompletion::from_text(model, text))
}
