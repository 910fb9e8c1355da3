//! Chat parameters and the positional prediction payload.
//!
//! The remote chat function takes its arguments as an untyped 11-element array. The order
//! lives in exactly one place, [`PredictArgs`]'s `Serialize` impl; nothing else builds the
//! array by hand.

use crate::error::{Error, ErrorContext};
use crate::protocol::config::{
    ChatPreset, DEFAULT_MAX_TOKENS, DEFAULT_REPEAT_PENALTY, DEFAULT_SYSTEM_MESSAGE,
    DEFAULT_TOP_K, DEFAULT_TOP_P,
};
use crate::types::message::Message;
use crate::Result;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Caller-supplied parameter bag. Every field may be omitted.
///
/// Slot values are kept as raw JSON and forwarded verbatim: neither types nor ranges are
/// checked, so `history` may use any shape the remote app accepts (role/content objects or
/// `[user, assistant]` pairs). The typed setters are conveniences over the same storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatParams {
    pub message: Option<Value>,
    pub messages: Option<Value>,
    pub history: Option<Value>,
    pub model: Option<Value>,
    pub system_message: Option<Value>,
    pub max_tokens: Option<Value>,
    pub ctx_size: Option<Value>,
    pub temperature: Option<Value>,
    pub top_p: Option<Value>,
    pub top_k: Option<Value>,
    pub repeat_penalty: Option<Value>,
    pub long_duration: Option<Value>,
}

fn message_value(m: &Message) -> Value {
    serde_json::to_value(m).unwrap_or(Value::Null)
}

/// Falsy in the loose sense the remote apps use: null, false, 0, "", [] and {}.
fn is_falsy(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Content of a `messages` entry; text parts are joined when the entry parses as a message.
fn entry_content(entry: &Value) -> Value {
    match serde_json::from_value::<Message>(entry.clone()) {
        Ok(m) => Value::String(m.text()),
        Err(_) => entry
            .get("content")
            .cloned()
            .unwrap_or_else(|| Value::String(String::new())),
    }
}

impl ChatParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a parameter bag handed over as JSON by a host framework.
    ///
    /// Unknown keys are ignored and slot values are never type-checked; only a
    /// non-object bag is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            Error::validation_with_context(
                "parameter bag is not a JSON object",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("chat_params"),
            )
        })
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(Value::String(message.into()));
        self
    }

    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Some(Value::Array(messages.iter().map(message_value).collect()));
        self
    }

    /// Prior turns as role/content objects.
    pub fn history(mut self, history: Vec<Message>) -> Self {
        self.history = Some(Value::Array(history.iter().map(message_value).collect()));
        self
    }

    /// Prior turns in any shape, e.g. `[["hi", "hello"]]`.
    pub fn history_raw(mut self, history: Value) -> Self {
        self.history = Some(history);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(Value::String(model.into()));
        self
    }

    pub fn system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = Some(Value::String(system_message.into()));
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(Value::from(max));
        self
    }

    pub fn ctx_size(mut self, ctx_size: u32) -> Self {
        self.ctx_size = Some(Value::from(ctx_size));
        self
    }

    pub fn temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(Value::from(temp));
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(Value::from(top_p));
        self
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(Value::from(top_k));
        self
    }

    pub fn repeat_penalty(mut self, penalty: f64) -> Self {
        self.repeat_penalty = Some(Value::from(penalty));
        self
    }

    pub fn long_duration(mut self, enable: bool) -> Self {
        self.long_duration = Some(Value::Bool(enable));
        self
    }

    /// Resolve every slot against `preset`, producing the positional arguments.
    pub fn to_args(&self, preset: &ChatPreset) -> PredictArgs {
        // A falsy explicit message falls through to `messages`.
        let message = self
            .message
            .clone()
            .filter(|m| !is_falsy(m))
            .or_else(|| {
                self.messages
                    .as_ref()
                    .and_then(Value::as_array)
                    .and_then(|ms| ms.first())
                    .map(entry_content)
            })
            .unwrap_or_else(|| Value::String(String::new()));

        let or = |slot: &Option<Value>, default: Value| slot.clone().unwrap_or(default);

        PredictArgs {
            message,
            history: or(&self.history, Value::Array(Vec::new())),
            model: or(&self.model, Value::from(preset.default_model.as_str())),
            system_message: or(&self.system_message, Value::from(DEFAULT_SYSTEM_MESSAGE)),
            max_tokens: or(&self.max_tokens, Value::from(DEFAULT_MAX_TOKENS)),
            ctx_size: or(&self.ctx_size, Value::from(preset.default_ctx_size)),
            temperature: or(&self.temperature, Value::from(preset.default_temperature)),
            top_p: or(&self.top_p, Value::from(DEFAULT_TOP_P)),
            top_k: or(&self.top_k, Value::from(DEFAULT_TOP_K)),
            repeat_penalty: or(&self.repeat_penalty, Value::from(DEFAULT_REPEAT_PENALTY)),
            long_duration: or(&self.long_duration, Value::Bool(false)),
        }
    }

    /// Build the full request body for the prediction endpoint.
    pub fn to_payload(&self, preset: &ChatPreset) -> PredictPayload {
        PredictPayload {
            data: self.to_args(preset),
            fn_index: preset.fn_index,
        }
    }
}

/// The eleven resolved arguments of the remote chat function.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictArgs {
    pub message: Value,
    pub history: Value,
    pub model: Value,
    pub system_message: Value,
    pub max_tokens: Value,
    pub ctx_size: Value,
    pub temperature: Value,
    pub top_p: Value,
    pub top_k: Value,
    pub repeat_penalty: Value,
    pub long_duration: Value,
}

impl PredictArgs {
    pub const LEN: usize = 11;
}

impl Serialize for PredictArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut t = serializer.serialize_tuple(Self::LEN)?;
        t.serialize_element(&self.message)?; // 0
        t.serialize_element(&self.history)?; // 1
        t.serialize_element(&self.model)?; // 2
        t.serialize_element(&self.system_message)?; // 3
        t.serialize_element(&self.max_tokens)?; // 4
        t.serialize_element(&self.ctx_size)?; // 5
        t.serialize_element(&self.temperature)?; // 6
        t.serialize_element(&self.top_p)?; // 7
        t.serialize_element(&self.top_k)?; // 8
        t.serialize_element(&self.repeat_penalty)?; // 9
        t.serialize_element(&self.long_duration)?; // 10
        t.end()
    }
}

/// Request body of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictPayload {
    pub data: PredictArgs,
    pub fn_index: u32,
}
