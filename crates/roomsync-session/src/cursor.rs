//! Remote cursor tracking.
//!
//! One [`CursorState`] per remote participant, keyed by identity. The
//! rendered anchor is a projection of the logical position through the
//! editor and can be thrown away and rebuilt at any time.

use std::collections::HashMap;

use roomsync_common::{Position, ScreenPoint};
use tracing::debug;

use crate::editor::Editor;
use crate::participant::Participant;
use crate::protocol::{CursorPayload, RoomMessage};

/// Last known caret of a remote participant.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorState {
    pub owner: String,
    pub display_name: String,
    pub color_slot: u32,
    pub position: Position,
    /// `None` until the first successful mapping.
    pub anchor: Option<ScreenPoint>,
}

#[derive(Debug)]
pub struct CursorTracker {
    local_identity: String,
    cursors: HashMap<String, CursorState>,
}

impl CursorTracker {
    pub fn new(local_identity: &str) -> Self {
        Self {
            local_identity: local_identity.to_string(),
            cursors: HashMap::new(),
        }
    }

    /// Build the `cursor` message for a local caret move.
    pub fn on_local_cursor_move(&self, local: &Participant, position: Position) -> RoomMessage {
        RoomMessage::Cursor(CursorPayload {
            identity: local.identity.clone(),
            position,
            display_name: local.display_name.clone(),
            color_slot: local.color_slot,
        })
    }

    /// Apply a remote cursor move. Returns the updated state, or `None` when
    /// the message is our own echo.
    ///
    /// The cursor is created on first sight, with or without a prior join.
    /// A failed anchor mapping keeps whatever anchor was there before.
    pub fn on_remote_cursor<E: Editor + ?Sized>(
        &mut self,
        payload: CursorPayload,
        editor: &E,
    ) -> Option<&CursorState> {
        if payload.identity == self.local_identity {
            debug!("Discarding echoed cursor");
            return None;
        }

        let state = self
            .cursors
            .entry(payload.identity.clone())
            .or_insert_with(|| CursorState {
                owner: payload.identity.clone(),
                display_name: payload.display_name.clone(),
                color_slot: payload.color_slot,
                position: payload.position,
                anchor: None,
            });
        state.display_name = payload.display_name;
        state.color_slot = payload.color_slot;
        state.position = payload.position;

        match editor.logical_to_screen(payload.position) {
            Ok(point) => state.anchor = Some(point),
            Err(e) => {
                debug!(owner = %state.owner, error = %e, "Keeping previous cursor anchor");
            }
        }

        Some(state)
    }

    /// Recompute every anchor from its logical position.
    pub fn reproject<E: Editor + ?Sized>(&mut self, editor: &E) {
        for state in self.cursors.values_mut() {
            if let Ok(point) = editor.logical_to_screen(state.position) {
                state.anchor = Some(point);
            }
        }
    }

    pub fn get(&self, owner: &str) -> Option<&CursorState> {
        self.cursors.get(owner)
    }

    pub fn cursors(&self) -> impl Iterator<Item = &CursorState> {
        self.cursors.values()
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    pub fn clear(&mut self) {
        self.cursors.clear();
    }
}
