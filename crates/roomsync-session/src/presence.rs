//! Roster of participants known to the local replica.

use std::collections::HashMap;

use tracing::debug;

use crate::participant::Participant;

/// Participants keyed by identity.
///
/// Entries are only ever added; removal happens on session teardown via
/// [`PresenceRegistry::clear`].
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    participants: HashMap<String, Participant>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the local participant. Emits nothing.
    pub fn register_local(&mut self, participant: Participant) {
        self.participants
            .insert(participant.identity.clone(), participant);
    }

    /// Handle a `join`. Returns `true` if the participant was new.
    ///
    /// A repeated join for a known identity is a no-op, even if the display
    /// name or color slot differ.
    pub fn on_join(&mut self, participant: Participant) -> bool {
        if self.participants.contains_key(&participant.identity) {
            debug!(identity = %participant.identity, "Duplicate join ignored");
            return false;
        }
        self.participants
            .insert(participant.identity.clone(), participant);
        true
    }

    pub fn get(&self, identity: &str) -> Option<&Participant> {
        self.participants.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.participants.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// All participants, sorted by display name then identity.
    pub fn participants(&self) -> Vec<Participant> {
        let mut all: Vec<Participant> = self.participants.values().cloned().collect();
        all.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.identity.cmp(&b.identity))
        });
        all
    }

    pub fn clear(&mut self) {
        self.participants.clear();
    }
}
