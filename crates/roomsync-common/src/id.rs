use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SyncError;

/// A fresh participant identity.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A fresh room code: 8 lowercase hex characters.
pub fn new_room_code() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

/// A normalized room identifier (trimmed, lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Generate an identifier for a newly created room.
    pub fn generate() -> Self {
        Self(new_room_code())
    }

    /// Validate and normalize a user-supplied room code.
    ///
    /// Length is measured in characters after trimming.
    pub fn parse(code: &str, min_len: usize) -> Result<Self, SyncError> {
        let trimmed = code.trim();
        if trimmed.is_empty() || trimmed.chars().count() < min_len {
            return Err(SyncError::InvalidRoomCode {
                code: code.to_string(),
                min_len,
            });
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
