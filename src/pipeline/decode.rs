//! Line-level SSE decoding for prediction streams.
//!
//! Classification is split from accumulation: this module only says what a line *is*;
//! [`super::accumulate::Reassembler`] decides what to do with it.

use serde_json::Value;

/// Prefix of an SSE data line. `data:` without the space is accepted too.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that ends the stream.
pub const DONE_SIGNAL: &str = "[DONE]";

/// What a single line of the event stream carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Empty line (event separator).
    Blank,
    /// Comment, `event:`, `id:`, or anything without a data prefix.
    Ignored,
    /// `data: [DONE]`
    Done,
    /// Payload of a data line, prefix stripped.
    Data(&'a str),
}

/// Result of decoding a data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameDecode {
    /// A JSON array whose first element is a text fragment to append.
    Fragment(String),
    /// Anything else; the payload is handed on untouched.
    RawFallback(String),
}

/// Classify one line. Trailing `\r` from CRLF streams is dropped.
pub fn classify_line(line: &str) -> SseLine<'_> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.trim().is_empty() {
        return SseLine::Blank;
    }

    let payload = match line.strip_prefix(DATA_PREFIX) {
        Some(p) => p,
        None => match line.strip_prefix("data:") {
            Some(p) => p,
            None => return SseLine::Ignored,
        },
    };

    if payload.trim() == DONE_SIGNAL {
        SseLine::Done
    } else {
        SseLine::Data(payload)
    }
}

/// Decode a data payload into a fragment, or fall back to the raw text.
pub fn decode_frame(payload: &str) -> FrameDecode {
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Array(items)) => match items.into_iter().next() {
            Some(Value::String(fragment)) => FrameDecode::Fragment(fragment),
            _ => FrameDecode::RawFallback(payload.to_string()),
        },
        _ => FrameDecode::RawFallback(payload.to_string()),
    }
}
