use codee::{Decoder, Encoder};

use crate::error::ProtocolError;
use crate::protocol::{split_records, ClientFrame};

/// Text codec for the hub WebSocket.
///
/// Outbound, a [`ClientFrame`] becomes a single separator-terminated JSON
/// record. Inbound, a frame is split into its raw records; the application
/// decides whether a record is the handshake response or a hub message,
/// because that depends on the session state.
///
/// ```rust,ignore
/// use smartcontrol_common::codec::HubJsonCodec;
/// use smartcontrol_common::{ClientFrame, HubFrame};
///
/// let ws = use_websocket_with_options::<ClientFrame, HubFrame, HubJsonCodec, (), DummyEncoder>(
///     "ws://localhost:10000/SmartControlHub",
///     options,
/// );
/// ```
pub struct HubJsonCodec;

/// The records contained in one inbound WebSocket frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HubFrame {
    pub records: Vec<String>,
}

impl HubFrame {
    pub fn parse(text: &str) -> Self {
        Self {
            records: split_records(text).map(str::to_string).collect(),
        }
    }
}

impl Encoder<ClientFrame> for HubJsonCodec {
    type Error = ProtocolError;
    type Encoded = String;

    fn encode(val: &ClientFrame) -> Result<Self::Encoded, Self::Error> {
        val.to_record()
    }
}

impl Decoder<HubFrame> for HubJsonCodec {
    type Error = ProtocolError;
    type Encoded = str;

    fn decode(val: &Self::Encoded) -> Result<HubFrame, Self::Error> {
        Ok(HubFrame::parse(val))
    }
}
