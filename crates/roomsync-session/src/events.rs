//! Events the session raises for UI consumers.

use roomsync_common::{Position, ScreenPoint};
use tokio::sync::broadcast;

use crate::participant::Participant;

#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// A remote participant joined. Never raised for the local participant.
    ParticipantAdded(Participant),
    /// The buffer was replaced by a remote snapshot.
    ContentReplaced { author: String },
    /// A remote cursor moved. `anchor` is `None` until it first maps.
    CursorUpdated {
        identity: String,
        display_name: String,
        color_slot: u32,
        position: Position,
        anchor: Option<ScreenPoint>,
    },
}

pub struct EventBus {
    sender: broadcast::Sender<RoomEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of subscribers reached; 0 when nobody listens.
    pub fn publish(&self, event: RoomEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
