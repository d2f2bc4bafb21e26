//! # SmartControl common
//!
//! Wire-level types shared by the SmartControl panel crates:
//!
//! - [`protocol`]: SignalR JSON hub records and their framing
//! - [`codec`]: the text codec plugged into the WebSocket layer
//! - [`channel`]: the closed set of pushed update channels
//! - [`payload`]: status payload records and the display-status tag shape
//! - [`catalog`]: the static command table and argument shaping
//!
//! Nothing here touches the DOM, so everything is testable natively.

pub mod catalog;
pub mod channel;
pub mod codec;
pub mod error;
pub mod opcode;
pub mod payload;
pub mod protocol;

pub use catalog::{Catalog, CatalogEntry, Invocation, Slot};
pub use channel::UpdateChannel;
pub use codec::{HubFrame, HubJsonCodec};
pub use error::{CatalogError, PayloadError, ProtocolError};
pub use payload::{DisplayTag, OsdInfo, StatusPayload, SupportChild};
pub use protocol::{ClientFrame, HandshakeRequest, HandshakeResponse, HubMessage};
