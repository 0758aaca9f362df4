//! JSON hub protocol framing.
//!
//! Every message is a JSON object terminated by the ASCII record separator
//! (`0x1E`). One WebSocket text message may carry several frames, and a frame
//! may in principle be split across messages, so incoming text goes through a
//! [`FrameBuffer`].
//!
//! Message types understood here:
//! - `1` Invocation `{ "target": "...", "arguments": [...] }`
//! - `6` Ping
//! - `7` Close `{ "error"?: "...", "allowReconnect"?: bool }`
//!
//! Anything else (stream items, completions, acks) is reported as
//! [`HubMessage::Ignored`].

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const RECORD_SEPARATOR: char = '\u{1e}';

pub const PROTOCOL_NAME: &str = "json";
pub const PROTOCOL_VERSION: u32 = 1;

const TYPE_INVOCATION: u8 = 1;
const TYPE_PING: u8 = 6;
const TYPE_CLOSE: u8 = 7;

#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    #[error("Malformed hub frame: {0}")]
    Malformed(String),

    #[error("Hub frame has no message type")]
    MissingType,

    #[error("Hub refused the handshake: {0}")]
    HandshakeRejected(String),
}

#[derive(Deserialize)]
struct HandshakeResponse {
    #[serde(default)]
    error: Option<String>,
}

/// The first frame a client sends.
pub fn handshake_request() -> String {
    let body = serde_json::json!({
        "protocol": PROTOCOL_NAME,
        "version": PROTOCOL_VERSION,
    });
    frame(&body.to_string())
}

/// Check the server's handshake reply (`{}` on success).
pub fn parse_handshake_response(frame: &str) -> Result<(), ProtocolError> {
    let response: HandshakeResponse =
        serde_json::from_str(frame).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
    match response.error {
        Some(error) => Err(ProtocolError::HandshakeRejected(error)),
        None => Ok(()),
    }
}

/// A decoded hub message.
#[derive(Debug, Clone, PartialEq)]
pub enum HubMessage {
    Invocation {
        target: String,
        arguments: Vec<Value>,
    },
    Ping,
    Close {
        error: Option<String>,
        allow_reconnect: bool,
    },
    Ignored(u8),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    #[serde(rename = "type")]
    kind: Option<u8>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    arguments: Vec<Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    allow_reconnect: bool,
}

impl HubMessage {
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        let raw: RawMessage =
            serde_json::from_str(frame).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
        match raw.kind.ok_or(ProtocolError::MissingType)? {
            TYPE_INVOCATION => {
                let target = raw.target.ok_or_else(|| {
                    ProtocolError::Malformed("invocation without target".to_string())
                })?;
                Ok(HubMessage::Invocation {
                    target,
                    arguments: raw.arguments,
                })
            }
            TYPE_PING => Ok(HubMessage::Ping),
            TYPE_CLOSE => Ok(HubMessage::Close {
                error: raw.error,
                allow_reconnect: raw.allow_reconnect,
            }),
            other => Ok(HubMessage::Ignored(other)),
        }
    }

    /// Encode as a complete frame, separator included.
    pub fn encode(&self) -> String {
        let value = match self {
            HubMessage::Invocation { target, arguments } => serde_json::json!({
                "type": TYPE_INVOCATION,
                "target": target,
                "arguments": arguments,
            }),
            HubMessage::Ping => serde_json::json!({ "type": TYPE_PING }),
            HubMessage::Close {
                error,
                allow_reconnect,
            } => {
                let mut value = serde_json::json!({
                    "type": TYPE_CLOSE,
                    "allowReconnect": allow_reconnect,
                });
                if let Some(error) = error {
                    value["error"] = Value::String(error.clone());
                }
                value
            }
            HubMessage::Ignored(kind) => serde_json::json!({ "type": kind }),
        };
        frame(&value.to_string())
    }
}

fn frame(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 1);
    out.push_str(body);
    out.push(RECORD_SEPARATOR);
    out
}

/// Reassembles frames from incoming text.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    pending: String,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` and return every frame it completed.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.pending.push_str(text);
        let Some(last) = self.pending.rfind(RECORD_SEPARATOR) else {
            return Vec::new();
        };
        let rest = self.pending.split_off(last + RECORD_SEPARATOR.len_utf8());
        let complete = std::mem::replace(&mut self.pending, rest);
        complete
            .split(RECORD_SEPARATOR)
            .filter(|f| !f.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Bytes waiting for a separator.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
