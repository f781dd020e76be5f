//! Wire messages exchanged between the replicas of a room.
//!
//! Every message is a JSON object tagged by `type`. The transport carries
//! them opaquely; only the session interprets them. Tags this version does
//! not know decode to [`RoomMessage::Unknown`] and are ignored on dispatch.

use roomsync_common::{Position, SyncError};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Presence announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    pub identity: String,
    pub display_name: String,
    pub color_slot: u32,
}

/// Full-buffer snapshot from one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPayload {
    pub identity: String,
    pub content: String,
}

/// Caret position of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPayload {
    pub identity: String,
    pub position: Position,
    pub display_name: String,
    pub color_slot: u32,
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomMessage {
    Join(JoinPayload),
    Content(ContentPayload),
    Cursor(CursorPayload),
    #[serde(other)]
    Unknown,
}

impl RoomMessage {
    pub fn to_json(&self) -> Result<String, SyncError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Identity of the participant that sent this message.
    pub fn author(&self) -> Option<&str> {
        match self {
            RoomMessage::Join(p) => Some(&p.identity),
            RoomMessage::Content(p) => Some(&p.identity),
            RoomMessage::Cursor(p) => Some(&p.identity),
            RoomMessage::Unknown => None,
        }
    }

    /// Tag name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RoomMessage::Join(_) => "join",
            RoomMessage::Content(_) => "content",
            RoomMessage::Cursor(_) => "cursor",
            RoomMessage::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_wire_shape() {
        let msg = RoomMessage::Join(JoinPayload {
            identity: "u1".into(),
            display_name: "Ada".into(),
            color_slot: 0,
        });
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({ "type": "join", "identity": "u1", "displayName": "Ada", "colorSlot": 0 })
        );
    }

    #[test]
    fn content_wire_shape() {
        let msg = RoomMessage::Content(ContentPayload {
            identity: "u1".into(),
            content: "fn main() {}".into(),
        });
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({ "type": "content", "identity": "u1", "content": "fn main() {}" })
        );
    }

    #[test]
    fn cursor_decodes_from_wire() {
        let text = r#"{"type":"cursor","identity":"u2","position":{"line":3,"column":5},"displayName":"Bob","colorSlot":1}"#;
        let msg = RoomMessage::from_json(text).unwrap();
        assert_eq!(
            msg,
            RoomMessage::Cursor(CursorPayload {
                identity: "u2".into(),
                position: Position::new(3, 5),
                display_name: "Bob".into(),
                color_slot: 1,
            })
        );
        assert_eq!(msg.author(), Some("u2"));
        assert_eq!(msg.kind(), "cursor");
    }

    #[test]
    fn unknown_tag_decodes_as_unknown() {
        let text = r#"{"type":"leave","identity":"u2","reason":"bye"}"#;
        let msg = RoomMessage::from_json(text).unwrap();
        assert_eq!(msg, RoomMessage::Unknown);
        assert_eq!(msg.author(), None);
    }

    #[test]
    fn missing_fields_are_codec_errors() {
        let err = RoomMessage::from_json(r#"{"type":"join","identity":"u1"}"#).unwrap_err();
        assert!(matches!(err, SyncError::Codec(_)));

        let err = RoomMessage::from_json("not json").unwrap_err();
        assert!(matches!(err, SyncError::Codec(_)));
    }
}
