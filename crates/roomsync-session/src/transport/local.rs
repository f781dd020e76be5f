//! In-process room bus.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use roomsync_common::{RoomId, SyncError};
use tokio::sync::mpsc;
use tracing::warn;

use super::{RoomLink, RoomPublisher, RoomTransport};
use crate::protocol::RoomMessage;

type Rooms = Arc<Mutex<HashMap<RoomId, Vec<mpsc::Sender<RoomMessage>>>>>;

/// Delivers every published message to all subscribers of the same room,
/// the publisher included.
#[derive(Clone)]
pub struct LocalBus {
    rooms: Rooms,
    capacity: usize,
}

impl LocalBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            capacity,
        }
    }

    /// Live subscribers of `room`.
    pub fn subscriber_count(&self, room: &RoomId) -> usize {
        let rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
        rooms
            .get(room)
            .map(|subs| subs.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl RoomTransport for LocalBus {
    fn open(&self, room: &RoomId) -> Result<RoomLink, SyncError> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.rooms
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(room.clone())
            .or_default()
            .push(tx);

        Ok(RoomLink {
            publisher: Box::new(LocalPublisher {
                room: room.clone(),
                rooms: Arc::clone(&self.rooms),
            }),
            inbound: rx,
        })
    }
}

struct LocalPublisher {
    room: RoomId,
    rooms: Rooms,
}

impl RoomPublisher for LocalPublisher {
    fn publish(&self, message: &RoomMessage) -> Result<(), SyncError> {
        let mut rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
        let Some(subscribers) = rooms.get_mut(&self.room) else {
            return Ok(());
        };
        subscribers.retain(|tx| !tx.is_closed());
        for tx in subscribers.iter() {
            if tx.try_send(message.clone()).is_err() {
                warn!(room = %self.room, kind = message.kind(), "Subscriber queue full, dropping message");
            }
        }
        if subscribers.is_empty() {
            rooms.remove(&self.room);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ContentPayload;

    fn room(code: &str) -> RoomId {
        RoomId::parse(code, 4).unwrap()
    }

    fn content(identity: &str, text: &str) -> RoomMessage {
        RoomMessage::Content(ContentPayload {
            identity: identity.into(),
            content: text.into(),
        })
    }

    #[test]
    fn delivers_to_all_subscribers_including_publisher() {
        let bus = LocalBus::default();
        let mut a = bus.open(&room("abcd")).unwrap();
        let mut b = bus.open(&room("abcd")).unwrap();

        a.publisher.publish(&content("a", "hi")).unwrap();

        assert_eq!(a.inbound.try_recv().unwrap(), content("a", "hi"));
        assert_eq!(b.inbound.try_recv().unwrap(), content("a", "hi"));
    }

    #[test]
    fn never_crosses_rooms() {
        let bus = LocalBus::default();
        let a = bus.open(&room("room-one")).unwrap();
        let mut other = bus.open(&room("room-two")).unwrap();

        a.publisher.publish(&content("a", "hi")).unwrap();
        assert!(other.inbound.try_recv().is_err());
    }

    #[test]
    fn room_codes_are_case_insensitive() {
        let bus = LocalBus::default();
        let a = bus.open(&room("ABCD")).unwrap();
        let mut b = bus.open(&room("abcd")).unwrap();

        a.publisher.publish(&content("a", "hi")).unwrap();
        assert!(b.inbound.try_recv().is_ok());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = LocalBus::default();
        let r = room("abcd");
        let a = bus.open(&r).unwrap();
        let b = bus.open(&r).unwrap();
        assert_eq!(bus.subscriber_count(&r), 2);

        drop(b);
        a.publisher.publish(&content("a", "hi")).unwrap();
        assert_eq!(bus.subscriber_count(&r), 1);
    }

    #[test]
    fn full_queue_drops_without_error() {
        let bus = LocalBus::new(1);
        let a = bus.open(&room("abcd")).unwrap();
        a.publisher.publish(&content("a", "one")).unwrap();
        assert!(a.publisher.publish(&content("a", "two")).is_ok());
    }
}
