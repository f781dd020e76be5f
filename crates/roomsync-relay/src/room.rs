//! Room store: maps room codes to the connections currently in them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

/// Identifies one connection within the relay.
pub type ConnId = u64;

type Members = HashMap<ConnId, mpsc::Sender<String>>;

/// Thread-safe room store.
#[derive(Clone)]
pub struct RoomStore {
    rooms: Arc<RwLock<HashMap<String, Members>>>,
    next_id: Arc<AtomicU64>,
    max_room_size: usize,
}

impl RoomStore {
    pub fn new(max_room_size: usize) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            max_room_size,
        }
    }

    /// Add a connection to `room`, creating the room on first use.
    /// Returns the new connection id and how many others were already there.
    pub async fn register(
        &self,
        room: &str,
        tx: mpsc::Sender<String>,
    ) -> Result<(ConnId, usize), &'static str> {
        let mut map = self.rooms.write().await;
        let members = map.entry(room.to_string()).or_default();
        members.retain(|_, tx| !tx.is_closed());
        if members.len() >= self.max_room_size {
            if members.is_empty() {
                map.remove(room);
            }
            return Err("room full");
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let peers = members.len();
        members.insert(id, tx);
        Ok((id, peers))
    }

    /// Senders of everyone in `room` except `conn`.
    pub async fn others(&self, room: &str, conn: ConnId) -> Vec<mpsc::Sender<String>> {
        let map = self.rooms.read().await;
        map.get(room)
            .map(|members| {
                members
                    .iter()
                    .filter(|(id, _)| **id != conn)
                    .map(|(_, tx)| tx.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Remove a connection. Returns true if the room is now gone.
    pub async fn unregister(&self, room: &str, conn: ConnId) -> bool {
        let mut map = self.rooms.write().await;
        if let Some(members) = map.get_mut(room) {
            members.remove(&conn);
            if members.is_empty() {
                map.remove(room);
                return true;
            }
        }
        false
    }

    /// Connections in `room`.
    pub async fn members(&self, room: &str) -> usize {
        self.rooms.read().await.get(room).map_or(0, HashMap::len)
    }

    /// Number of live rooms.
    pub async fn count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (mpsc::Sender<String>, mpsc::Receiver<String>) {
        mpsc::channel(8)
    }

    #[tokio::test]
    async fn register_reports_existing_peers() {
        let store = RoomStore::new(4);
        let (a, _ra) = channel();
        let (b, _rb) = channel();

        let (_, peers) = store.register("abcd", a).await.unwrap();
        assert_eq!(peers, 0);
        let (_, peers) = store.register("abcd", b).await.unwrap();
        assert_eq!(peers, 1);
        assert_eq!(store.members("abcd").await, 2);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn others_excludes_sender() {
        let store = RoomStore::new(4);
        let (a, _ra) = channel();
        let (b, mut rb) = channel();

        let (id_a, _) = store.register("abcd", a).await.unwrap();
        store.register("abcd", b).await.unwrap();

        let others = store.others("abcd", id_a).await;
        assert_eq!(others.len(), 1);
        others[0].send("hi".into()).await.unwrap();
        assert_eq!(rb.recv().await.unwrap(), "hi");
    }

    #[tokio::test]
    async fn full_room_is_rejected() {
        let store = RoomStore::new(1);
        let (a, _ra) = channel();
        let (b, _rb) = channel();

        store.register("abcd", a).await.unwrap();
        assert_eq!(store.register("abcd", b).await, Err("room full"));
    }

    #[tokio::test]
    async fn closed_members_free_their_seat() {
        let store = RoomStore::new(1);
        let (a, ra) = channel();
        let (b, _rb) = channel();

        store.register("abcd", a).await.unwrap();
        drop(ra);
        assert!(store.register("abcd", b).await.is_ok());
    }

    #[tokio::test]
    async fn last_unregister_removes_room() {
        let store = RoomStore::new(4);
        let (a, _ra) = channel();
        let (b, _rb) = channel();

        let (id_a, _) = store.register("abcd", a).await.unwrap();
        let (id_b, _) = store.register("abcd", b).await.unwrap();

        assert!(!store.unregister("abcd", id_a).await);
        assert!(store.unregister("abcd", id_b).await);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let store = RoomStore::new(4);
        let (a, _ra) = channel();
        let (b, _rb) = channel();

        let (id_a, _) = store.register("room-one", a).await.unwrap();
        store.register("room-two", b).await.unwrap();
        assert!(store.others("room-one", id_a).await.is_empty());
        assert_eq!(store.count().await, 2);
    }
}
