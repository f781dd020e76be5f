//! Room-scoped publish/subscribe transports.
//!
//! A transport is a dumb bus: it delivers messages to the other
//! subscribers of the same room, with no ordering guarantee across
//! publishers. Some transports echo a publisher's own messages back.

mod local;
mod websocket;

pub use local::LocalBus;
pub use websocket::{WsTransport, WsTransportConfig};

use roomsync_common::{RoomId, SyncError};
use tokio::sync::mpsc;

use crate::protocol::RoomMessage;

/// Outbound half of an open room.
pub trait RoomPublisher: Send + Sync {
    /// Fire-and-forget send. Never blocks.
    fn publish(&self, message: &RoomMessage) -> Result<(), SyncError>;
}

/// An open room: a publisher plus the inbound message stream.
pub struct RoomLink {
    pub publisher: Box<dyn RoomPublisher>,
    pub inbound: mpsc::Receiver<RoomMessage>,
}

impl std::fmt::Debug for RoomLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomLink").finish_non_exhaustive()
    }
}

pub trait RoomTransport {
    /// Subscribe to `room`. Failure is not fatal to the caller's session.
    fn open(&self, room: &RoomId) -> Result<RoomLink, SyncError>;
}
