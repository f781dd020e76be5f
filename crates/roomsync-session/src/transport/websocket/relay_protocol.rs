//! Relay handshake frames. Everything after the handshake is a
//! [`RoomMessage`](crate::protocol::RoomMessage) forwarded verbatim.

use serde::{Deserialize, Serialize};

/// First frame a client sends.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub(crate) enum RoomHello {
    #[serde(rename = "hello")]
    Hello { room: String },
}

/// Frames the relay itself sends.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum RelayResponse {
    #[serde(rename = "room_ready")]
    RoomReady { room: String, peers: usize },

    #[serde(rename = "error")]
    Error { message: String },
}
