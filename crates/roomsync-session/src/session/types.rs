//! Session configuration.

use std::time::Duration;

use roomsync_common::Palette;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Quiet period before a local edit is published.
    pub debounce: Duration,
    /// Shortest room code accepted by [`RoomSession::join`](super::RoomSession::join).
    pub min_room_code_len: usize,
    /// Greet newcomers with our own join and current snapshot.
    pub announce_on_join: bool,
    pub palette: Palette,
    /// Capacity of the UI event bus.
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(150),
            min_room_code_len: 4,
            announce_on_join: true,
            palette: Palette::default(),
            event_capacity: 256,
        }
    }
}
