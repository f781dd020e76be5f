//! Room synchronization core.
//!
//! Keeps a shared text buffer, a participant roster and remote cursors
//! consistent across the replicas of one room. Content converges by full
//! snapshot replacement (last writer wins); presence and cursors are
//! broadcast as small tagged messages over a room-scoped transport.

pub mod cursor;
pub mod editor;
pub mod events;
pub mod participant;
pub mod presence;
pub mod protocol;
pub mod replicator;
pub mod session;
pub mod transport;

pub use cursor::{CursorState, CursorTracker};
pub use editor::{Editor, EditorEvent, MemoryEditor};
pub use events::{EventBus, RoomEvent};
pub use participant::Participant;
pub use presence::PresenceRegistry;
pub use protocol::{ContentPayload, CursorPayload, JoinPayload, RoomMessage};
pub use replicator::ContentReplicator;
pub use session::{run_session, RoomSession, SessionConfig};
pub use transport::{
    LocalBus, RoomLink, RoomPublisher, RoomTransport, WsTransport, WsTransportConfig,
};
