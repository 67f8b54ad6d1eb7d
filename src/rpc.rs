//! `Content-Length`-framed transport codec.
//!
//! One frame is `Content-Length: N\r\n\r\n` followed by exactly `N` bytes of UTF-8 JSON.
//! No other header is recognized. Encoding and decoding are free functions rather than a
//! `Read`/`Write` wrapper — the dispatcher owns buffering concerns (`crate::server`).

use std::fmt;

use serde::Serialize;
use serde_json::Value;

const HEADER_SEPARATOR: &str = "\r\n\r\n";
const CONTENT_LENGTH_PREFIX: &str = "Content-Length: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    MissingSeparator,
    MalformedContentLength,
    InvalidJson(String),
    Truncated { expected: usize, got: usize },
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::MissingSeparator => write!(f, "message is missing the header separator"),
            RpcError::MalformedContentLength => write!(f, "malformed Content-Length header"),
            RpcError::InvalidJson(msg) => write!(f, "could not decode JSON content: {msg}"),
            RpcError::Truncated { expected, got } => {
                write!(f, "expected {expected} bytes of content, got {got}")
            }
        }
    }
}

impl std::error::Error for RpcError {}

/// Serializes `message` to JSON and wraps it in a `Content-Length` header.
pub fn encode_message<T: Serialize>(message: &T) -> Result<Vec<u8>, RpcError> {
    let content =
        serde_json::to_vec(message).map_err(|e| RpcError::InvalidJson(e.to_string()))?;
    let mut framed = format!("{CONTENT_LENGTH_PREFIX}{}{HEADER_SEPARATOR}", content.len())
        .into_bytes();
    framed.extend_from_slice(&content);
    Ok(framed)
}

/// A single decoded frame: the dispatched method name and the raw JSON content bytes.
#[derive(Debug)]
pub struct DecodedMessage {
    pub method: String,
    pub content: Vec<u8>,
}

/// Splits one complete frame out of `message`, returning its `method` field and content
/// bytes. `message` must contain at least one full frame; trailing bytes beyond the frame
/// are ignored by this call (the reader is responsible for re-slicing on the next read).
pub fn decode_message(message: &[u8]) -> Result<DecodedMessage, RpcError> {
    let separator = b"\r\n\r\n";
    let split_at = find_subslice(message, separator).ok_or(RpcError::MissingSeparator)?;
    let header = &message[..split_at];
    let rest = &message[split_at + separator.len()..];

    let header_str = std::str::from_utf8(header).map_err(|_| RpcError::MalformedContentLength)?;
    let content_length: usize = header_str
        .strip_prefix(CONTENT_LENGTH_PREFIX)
        .and_then(|n| n.parse().ok())
        .ok_or(RpcError::MalformedContentLength)?;

    if rest.len() < content_length {
        return Err(RpcError::Truncated {
            expected: content_length,
            got: rest.len(),
        });
    }
    let content = &rest[..content_length];

    let value: Value =
        serde_json::from_slice(content).map_err(|e| RpcError::InvalidJson(e.to_string()))?;
    let method = value
        .get("method")
        .and_then(Value::as_str)
        .ok_or_else(|| RpcError::InvalidJson("missing \"method\" field".to_string()))?
        .to_string();

    Ok(DecodedMessage {
        method,
        content: content.to_vec(),
    })
}

/// How many bytes a complete frame starting at `data` would occupy, or `None` if `data`
/// does not yet contain a full header plus body — the read loop uses this to know when to
/// keep buffering from stdin before calling `decode_message`.
pub fn frame_length(data: &[u8]) -> Option<usize> {
    let separator = b"\r\n\r\n";
    let split_at = find_subslice(data, separator)?;
    let header = std::str::from_utf8(&data[..split_at]).ok()?;
    let content_length: usize = header.strip_prefix(CONTENT_LENGTH_PREFIX)?.parse().ok()?;
    let total = split_at + separator.len() + content_length;
    if data.len() < total {
        None
    } else {
        Some(total)
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
