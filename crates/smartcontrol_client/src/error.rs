use smartcontrol_common::{CatalogError, PayloadError, ProtocolError};
use thiserror::Error;

/// Outcome of a failed dispatch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// No live session; the command was not sent.
    #[error("cannot invoke '{target}': not connected to the hub")]
    NotConnected { target: String },

    /// The socket refused or could not encode the frame.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors that can occur when using the smartcontrol_client library.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HubError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A pushed payload did not have the expected shape.
    #[error("update on {channel}: {error}")]
    Payload { channel: String, error: PayloadError },

    #[error("WebSocket error: {message}")]
    WebSocket { message: String },
}
