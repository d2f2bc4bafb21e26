//! SignalR JSON hub protocol records.
//!
//! Every record is a JSON document terminated by the ASCII record separator
//! (`0x1E`). A single WebSocket frame may carry several records, and the very
//! first record the hub sends after the socket opens is the handshake response
//! rather than a [`HubMessage`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Terminator appended to every record on the wire.
pub const RECORD_SEPARATOR: char = '\u{1e}';

/// Message type discriminators used by the hub protocol.
pub mod message_type {
    pub const INVOCATION: u8 = 1;
    pub const STREAM_ITEM: u8 = 2;
    pub const COMPLETION: u8 = 3;
    pub const STREAM_INVOCATION: u8 = 4;
    pub const CANCEL_INVOCATION: u8 = 5;
    pub const PING: u8 = 6;
    pub const CLOSE: u8 = 7;
}

/// First record sent by the client after the socket opens.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HandshakeRequest {
    pub protocol: String,
    pub version: u32,
}

impl Default for HandshakeRequest {
    fn default() -> Self {
        Self {
            protocol: "json".to_string(),
            version: 1,
        }
    }
}

/// First record sent by the hub. An empty object means success.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct HandshakeResponse {
    #[serde(default)]
    pub error: Option<String>,
}

impl HandshakeResponse {
    pub fn parse(record: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(record)?)
    }

    /// Converts a rejection into an error.
    pub fn into_result(self) -> Result<(), ProtocolError> {
        match self.error {
            Some(error) => Err(ProtocolError::HandshakeRejected(error)),
            None => Ok(()),
        }
    }
}

/// A hub protocol message after the handshake.
#[derive(Debug, Clone, PartialEq)]
pub enum HubMessage {
    /// A method call. Sent by the client for commands and by the hub for
    /// pushed updates. Without an invocation id no completion is expected.
    Invocation {
        invocation_id: Option<String>,
        target: String,
        arguments: Vec<Value>,
    },
    Completion {
        invocation_id: String,
        result: Option<Value>,
        error: Option<String>,
    },
    Ping,
    Close {
        error: Option<String>,
        allow_reconnect: bool,
    },
    /// Streaming and cancellation messages, which this client never uses.
    Ignored(u8),
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    invocation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arguments: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    allow_reconnect: Option<bool>,
}

impl HubMessage {
    /// Non-blocking invocation: the hub sends no completion for it.
    pub fn invocation(target: impl Into<String>, arguments: Vec<Value>) -> Self {
        HubMessage::Invocation {
            invocation_id: None,
            target: target.into(),
            arguments,
        }
    }

    /// Parses a single record (without its separator).
    pub fn parse(record: &str) -> Result<Self, ProtocolError> {
        let wire: WireMessage = serde_json::from_str(record)?;
        Self::try_from(wire)
    }

    /// Serializes the message into one record, separator included.
    pub fn to_record(&self) -> Result<String, ProtocolError> {
        let mut record = serde_json::to_string(&WireMessage::from(self))?;
        record.push(RECORD_SEPARATOR);
        Ok(record)
    }
}

impl TryFrom<WireMessage> for HubMessage {
    type Error = ProtocolError;

    fn try_from(wire: WireMessage) -> Result<Self, Self::Error> {
        use message_type::*;

        match wire.kind {
            INVOCATION => Ok(HubMessage::Invocation {
                invocation_id: wire.invocation_id,
                target: wire.target.ok_or(ProtocolError::MissingField {
                    kind: INVOCATION,
                    field: "target",
                })?,
                arguments: wire.arguments.unwrap_or_default(),
            }),
            COMPLETION => Ok(HubMessage::Completion {
                invocation_id: wire.invocation_id.ok_or(ProtocolError::MissingField {
                    kind: COMPLETION,
                    field: "invocationId",
                })?,
                result: wire.result,
                error: wire.error,
            }),
            PING => Ok(HubMessage::Ping),
            CLOSE => Ok(HubMessage::Close {
                error: wire.error,
                allow_reconnect: wire.allow_reconnect.unwrap_or(false),
            }),
            STREAM_ITEM | STREAM_INVOCATION | CANCEL_INVOCATION => Ok(HubMessage::Ignored(wire.kind)),
            other => Err(ProtocolError::UnsupportedType(other)),
        }
    }
}

impl From<&HubMessage> for WireMessage {
    fn from(message: &HubMessage) -> Self {
        use message_type::*;

        match message {
            HubMessage::Invocation {
                invocation_id,
                target,
                arguments,
            } => WireMessage {
                kind: INVOCATION,
                invocation_id: invocation_id.clone(),
                target: Some(target.clone()),
                arguments: Some(arguments.clone()),
                ..Default::default()
            },
            HubMessage::Completion {
                invocation_id,
                result,
                error,
            } => WireMessage {
                kind: COMPLETION,
                invocation_id: Some(invocation_id.clone()),
                result: result.clone(),
                error: error.clone(),
                ..Default::default()
            },
            HubMessage::Ping => WireMessage {
                kind: PING,
                ..Default::default()
            },
            HubMessage::Close {
                error,
                allow_reconnect,
            } => WireMessage {
                kind: CLOSE,
                error: error.clone(),
                allow_reconnect: Some(*allow_reconnect),
                ..Default::default()
            },
            HubMessage::Ignored(kind) => WireMessage {
                kind: *kind,
                ..Default::default()
            },
        }
    }
}

/// Everything the client may put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientFrame {
    Handshake(HandshakeRequest),
    Message(HubMessage),
}

impl ClientFrame {
    pub fn to_record(&self) -> Result<String, ProtocolError> {
        match self {
            ClientFrame::Handshake(request) => {
                let mut record = serde_json::to_string(request)?;
                record.push(RECORD_SEPARATOR);
                Ok(record)
            }
            ClientFrame::Message(message) => message.to_record(),
        }
    }
}

/// Splits a frame into its records, dropping the separators and any empty
/// trailing segment.
pub fn split_records(frame: &str) -> impl Iterator<Item = &str> {
    frame
        .split(RECORD_SEPARATOR)
        .filter(|record| !record.trim().is_empty())
}
