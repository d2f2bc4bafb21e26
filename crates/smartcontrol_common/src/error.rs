use thiserror::Error;

/// Errors raised while framing or parsing hub protocol records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    /// A record was not valid JSON or did not have the expected shape.
    #[error("malformed hub record: {0}")]
    Json(String),

    /// The record carried a message type this client does not understand.
    #[error("unsupported hub message type {0}")]
    UnsupportedType(u8),

    /// A required field was absent for the given message type.
    #[error("hub message type {kind} is missing field '{field}'")]
    MissingField { kind: u8, field: &'static str },

    /// The hub rejected the handshake.
    #[error("handshake rejected: {0}")]
    HandshakeRejected(String),

    /// A push arrived on a channel that is not part of the known set.
    #[error("unknown update channel '{0}'")]
    UnknownChannel(String),
}

impl From<serde_json::Error> for ProtocolError {
    fn from(error: serde_json::Error) -> Self {
        ProtocolError::Json(error.to_string())
    }
}

/// Errors raised when a command name or its arguments do not fit the catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("command '{name}' takes {min}..={max} arguments, got {given}")]
    Arity {
        name: &'static str,
        min: usize,
        max: usize,
        given: usize,
    },

    #[error("command '{0}' is defined more than once")]
    Duplicate(&'static str),

    /// An optional slot is followed by a required one, so positional
    /// arguments would be ambiguous.
    #[error("command '{0}' declares a required slot after an optional one")]
    SlotOrder(&'static str),
}

/// Shape problems found while extracting structured data from a pushed payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayloadError {
    #[error("payload is not a status record: {0}")]
    Malformed(String),

    #[error("payload has no tag")]
    MissingTag,

    #[error("tag has no osdInfo")]
    MissingOsdInfo,

    #[error("tag has no ddcHelInfo support list")]
    MissingSupportList,

    #[error("no attribute info for opcode {0}")]
    MissingAttribute(String),

    #[error("no support entry for opcode {0}")]
    MissingSupportEntry(String),
}
