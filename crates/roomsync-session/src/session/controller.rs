//! The session object: room lifecycle and inbound message routing.

use std::time::Instant;

use rand::Rng;
use roomsync_common::{Color, Position, RoomId, SyncError};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use super::types::SessionConfig;
use crate::cursor::{CursorState, CursorTracker};
use crate::editor::{Editor, EditorEvent};
use crate::events::{EventBus, RoomEvent};
use crate::participant::Participant;
use crate::presence::PresenceRegistry;
use crate::protocol::{ContentPayload, CursorPayload, JoinPayload, RoomMessage};
use crate::replicator::ContentReplicator;
use crate::transport::{RoomPublisher, RoomTransport};

/// One participant's view of one room.
pub struct RoomSession<E: Editor> {
    config: SessionConfig,
    room: RoomId,
    local: Participant,
    editor: E,
    presence: PresenceRegistry,
    cursors: CursorTracker,
    replicator: ContentReplicator,
    /// `None` when the transport failed to open or after `close`.
    publisher: Option<Box<dyn RoomPublisher>>,
    inbound: Option<mpsc::Receiver<RoomMessage>>,
    events: EventBus,
}

impl<E: Editor> RoomSession<E> {
    /// Create a fresh room. The creator always takes color slot 0.
    pub fn create(
        display_name: &str,
        editor: E,
        transport: &dyn RoomTransport,
        config: SessionConfig,
    ) -> Self {
        let room = RoomId::generate();
        let local = Participant::generate(display_name, 0);
        Self::start(room, local, editor, transport, config)
    }

    /// Join an existing room by code.
    ///
    /// The code is trimmed and lowercased; codes shorter than
    /// `config.min_room_code_len` are rejected before anything is opened.
    pub fn join(
        code: &str,
        display_name: &str,
        editor: E,
        transport: &dyn RoomTransport,
        config: SessionConfig,
    ) -> Result<Self, SyncError> {
        let room = RoomId::parse(code, config.min_room_code_len)?;
        let slot = rand::thread_rng().gen_range(0..config.palette.len() as u32);
        let local = Participant::generate(display_name, slot);
        Ok(Self::start(room, local, editor, transport, config))
    }

    fn start(
        room: RoomId,
        local: Participant,
        editor: E,
        transport: &dyn RoomTransport,
        config: SessionConfig,
    ) -> Self {
        let (publisher, inbound) = match transport.open(&room) {
            Ok(link) => (Some(link.publisher), Some(link.inbound)),
            Err(e) => {
                warn!(room = %room, error = %e, "Transport unavailable, editing locally only");
                (None, None)
            }
        };

        let mut presence = PresenceRegistry::new();
        presence.register_local(local.clone());

        let session = Self {
            cursors: CursorTracker::new(&local.identity),
            replicator: ContentReplicator::new(&local.identity, editor.buffer(), config.debounce),
            events: EventBus::new(config.event_capacity),
            config,
            room,
            local,
            editor,
            presence,
            publisher,
            inbound,
        };

        info!(
            room = %session.room,
            identity = %session.local.identity,
            color_slot = session.local.color_slot,
            "Entered room"
        );
        session.publish(&session.local.join_message());
        session
    }

    // -----------------------------------------------------------------------
    // Inbound
    // -----------------------------------------------------------------------

    /// Route one inbound message. Unknown messages are ignored.
    pub fn dispatch(&mut self, message: RoomMessage) {
        match message {
            RoomMessage::Join(payload) => self.on_join(payload),
            RoomMessage::Content(payload) => self.on_remote_content(payload),
            RoomMessage::Cursor(payload) => self.on_remote_cursor(payload),
            RoomMessage::Unknown => debug!("Ignoring unknown room message"),
        }
    }

    fn on_join(&mut self, payload: JoinPayload) {
        let participant = Participant::from(payload);
        if !self.presence.on_join(participant.clone()) {
            return;
        }
        info!(
            room = %self.room,
            identity = %participant.identity,
            display_name = %participant.display_name,
            "Participant joined"
        );
        self.events.publish(RoomEvent::ParticipantAdded(participant));

        if self.config.announce_on_join {
            self.publish(&self.local.join_message());
            // Replicas holding someone else's snapshot stay quiet; a stale
            // copy could land after the author's newer one.
            if self.replicator.is_authored() && !self.replicator.snapshot().is_empty() {
                let content = self
                    .replicator
                    .flush()
                    .unwrap_or_else(|| self.replicator.content_message());
                self.publish(&content);
            }
        }
    }

    fn on_remote_content(&mut self, payload: ContentPayload) {
        let ContentPayload { identity, content } = payload;
        if self
            .replicator
            .on_remote_content(&identity, content, &mut self.editor)
        {
            debug!(author = %identity, "Buffer replaced by remote snapshot");
            self.cursors.reproject(&self.editor);
            self.events
                .publish(RoomEvent::ContentReplaced { author: identity });
        }
    }

    fn on_remote_cursor(&mut self, payload: CursorPayload) {
        if let Some(state) = self.cursors.on_remote_cursor(payload, &self.editor) {
            self.events.publish(RoomEvent::CursorUpdated {
                identity: state.owner.clone(),
                display_name: state.display_name.clone(),
                color_slot: state.color_slot,
                position: state.position,
                anchor: state.anchor,
            });
        }
    }

    // -----------------------------------------------------------------------
    // Local
    // -----------------------------------------------------------------------

    /// Route an editor notification.
    pub fn handle_editor_event(&mut self, event: EditorEvent, now: Instant) {
        match event {
            EditorEvent::ContentChanged(text) => self.on_local_edit(text, now),
            EditorEvent::CaretMoved(position) => self.on_local_cursor_move(position),
        }
    }

    /// Accept a local edit; it is published once the debounce window passes.
    pub fn on_local_edit(&mut self, snapshot: String, now: Instant) {
        self.replicator.on_local_edit(snapshot, now);
    }

    /// Publish a local caret move immediately.
    pub fn on_local_cursor_move(&mut self, position: Position) {
        let message = self.cursors.on_local_cursor_move(&self.local, position);
        self.publish(&message);
    }

    /// When the pending content publish is due, if any.
    pub fn next_publish_deadline(&self) -> Option<Instant> {
        self.replicator.next_deadline()
    }

    /// Publish the pending edit if its window has elapsed.
    pub fn poll_publish(&mut self, now: Instant) {
        if let Some(message) = self.replicator.poll_publish(now) {
            self.publish(&message);
        }
    }

    /// Publish the pending edit right away.
    pub fn flush_pending(&mut self) {
        if let Some(message) = self.replicator.flush() {
            self.publish(&message);
        }
    }

    /// Silently dropped when the transport is unavailable.
    fn publish(&self, message: &RoomMessage) {
        let Some(publisher) = &self.publisher else {
            debug!(kind = message.kind(), "No transport, message not sent");
            return;
        };
        if let Err(e) = publisher.publish(message) {
            warn!(room = %self.room, kind = message.kind(), error = %e, "Publish failed");
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Hand the inbound stream to the event loop. Returns `None` when the
    /// transport is unavailable or the stream was already taken.
    pub fn take_inbound(&mut self) -> Option<mpsc::Receiver<RoomMessage>> {
        self.inbound.take()
    }

    /// Publish any pending edit, drop the transport, forget everyone.
    pub fn close(&mut self) {
        self.flush_pending();
        self.publisher = None;
        self.inbound = None;
        self.presence.clear();
        self.cursors.clear();
        info!(room = %self.room, "Left room");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.events.subscribe()
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    pub fn local(&self) -> &Participant {
        &self.local
    }

    pub fn is_connected(&self) -> bool {
        self.publisher.is_some()
    }

    pub fn roster(&self) -> Vec<Participant> {
        self.presence.participants()
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    pub fn cursor(&self, identity: &str) -> Option<&CursorState> {
        self.cursors.get(identity)
    }

    pub fn cursors(&self) -> &CursorTracker {
        &self.cursors
    }

    pub fn snapshot(&self) -> &str {
        self.replicator.snapshot()
    }

    pub fn color_for_slot(&self, slot: u32) -> Color {
        self.config.palette.color_for(slot)
    }

    /// Presentation color of a participant known by roster or cursor.
    pub fn color_of(&self, identity: &str) -> Option<Color> {
        let slot = self
            .presence
            .get(identity)
            .map(|p| p.color_slot)
            .or_else(|| self.cursors.get(identity).map(|c| c.color_slot))?;
        Some(self.color_for_slot(slot))
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Mutable access for hosts that apply user input to the editor
    /// themselves. Report the result through `on_local_edit`.
    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }
}
