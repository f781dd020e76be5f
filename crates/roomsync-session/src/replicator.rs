//! Full-snapshot content replication.
//!
//! The replicator owns the authoritative snapshot of the shared buffer.
//! Local edits are published after a quiet period; remote snapshots replace
//! the buffer outright. There is no merge: whichever snapshot is processed
//! last wins.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::editor::Editor;
use crate::protocol::{ContentPayload, RoomMessage};

// ---------------------------------------------------------------------------
// Debounce
// ---------------------------------------------------------------------------

/// Cancel-and-reschedule deadline.
#[derive(Debug)]
struct Debounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Clears and reports a deadline that has passed.
    fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Replicator
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ContentReplicator {
    local_identity: String,
    snapshot: String,
    /// The snapshot came from this replica, not from a remote `content`.
    authored: bool,
    debounce: Debounce,
}

impl ContentReplicator {
    pub fn new(local_identity: &str, initial: String, debounce: Duration) -> Self {
        Self {
            local_identity: local_identity.to_string(),
            authored: !initial.is_empty(),
            snapshot: initial,
            debounce: Debounce::new(debounce),
        }
    }

    /// Accept a local edit and restart the quiet period.
    pub fn on_local_edit(&mut self, snapshot: String, now: Instant) {
        self.snapshot = snapshot;
        self.authored = true;
        self.debounce.schedule(now);
    }

    /// When the pending publish is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline
    }

    pub fn has_pending(&self) -> bool {
        self.debounce.deadline.is_some()
    }

    /// The `content` message to publish, if the quiet period has elapsed.
    pub fn poll_publish(&mut self, now: Instant) -> Option<RoomMessage> {
        if self.debounce.take_due(now) {
            Some(self.content_message())
        } else {
            None
        }
    }

    /// Publish a pending edit immediately, skipping the rest of the window.
    pub fn flush(&mut self) -> Option<RoomMessage> {
        if self.debounce.deadline.take().is_some() {
            Some(self.content_message())
        } else {
            None
        }
    }

    /// Apply a remote snapshot. Returns `false` for our own echo.
    ///
    /// The caret is saved before the buffer is replaced and restored after;
    /// clamping a caret that no longer fits is the editor's business. Any
    /// local edit still waiting to be published is dropped, since the buffer
    /// it described is gone.
    pub fn on_remote_content<E: Editor + ?Sized>(
        &mut self,
        author: &str,
        snapshot: String,
        editor: &mut E,
    ) -> bool {
        if author == self.local_identity {
            debug!("Discarding echoed content");
            return false;
        }

        let caret = editor.caret();
        editor.set_buffer(&snapshot);
        editor.set_caret(caret);

        if self.debounce.deadline.is_some() {
            debug!(author, "Remote content replaced an unpublished local edit");
            self.debounce.cancel();
        }
        self.snapshot = snapshot;
        self.authored = false;
        true
    }

    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    /// Whether the current snapshot was written here. Only the author of
    /// the latest snapshot re-sends it to newcomers.
    pub fn is_authored(&self) -> bool {
        self.authored
    }

    /// Current snapshot as a `content` message.
    pub fn content_message(&self) -> RoomMessage {
        RoomMessage::Content(ContentPayload {
            identity: self.local_identity.clone(),
            content: self.snapshot.clone(),
        })
    }
}
