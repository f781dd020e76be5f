use roomsync_common::new_id;
use serde::{Deserialize, Serialize};

use crate::protocol::{JoinPayload, RoomMessage};

/// One user in a room. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub identity: String,
    pub display_name: String,
    pub color_slot: u32,
}

impl Participant {
    /// A participant with a freshly generated identity.
    pub fn generate(display_name: &str, color_slot: u32) -> Self {
        Self {
            identity: new_id(),
            display_name: display_name.to_string(),
            color_slot,
        }
    }

    /// The `join` announcement for this participant.
    pub fn join_message(&self) -> RoomMessage {
        RoomMessage::Join(JoinPayload {
            identity: self.identity.clone(),
            display_name: self.display_name.clone(),
            color_slot: self.color_slot,
        })
    }
}

impl From<JoinPayload> for Participant {
    fn from(p: JoinPayload) -> Self {
        Self {
            identity: p.identity,
            display_name: p.display_name,
            color_slot: p.color_slot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_identities_are_unique() {
        let a = Participant::generate("Ada", 0);
        let b = Participant::generate("Ada", 0);
        assert_ne!(a.identity, b.identity);
        assert_eq!(a.display_name, "Ada");
    }

    #[test]
    fn join_message_carries_participant() {
        let p = Participant::generate("Ada", 3);
        match p.join_message() {
            RoomMessage::Join(payload) => {
                assert_eq!(Participant::from(payload), p);
            }
            other => panic!("expected join, got {other:?}"),
        }
    }
}
