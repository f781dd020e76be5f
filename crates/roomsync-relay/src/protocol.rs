//! Relay-level wire protocol. Only the first frame is parsed; everything
//! after it is fanned out to the rest of the room as opaque text.

use serde::{Deserialize, Serialize};

/// First frame a client sends to pick its room.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum RoomHello {
    #[serde(rename = "hello")]
    Hello { room: String },
}

/// Frames the relay itself sends back.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum RelayResponse {
    /// `peers` counts the other connections already in the room.
    #[serde(rename = "room_ready")]
    RoomReady { room: String, peers: usize },

    #[serde(rename = "error")]
    Error { message: String },
}
