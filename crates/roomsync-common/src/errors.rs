use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures raised by the room synchronization core.
///
/// Only `InvalidRoomCode` ever reaches a caller; the session absorbs the
/// other variants where they are detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("invalid room code {code:?}: must be at least {min_len} characters")]
    InvalidRoomCode { code: String, min_len: usize },

    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),

    #[error("cannot map line {line}, column {column} to the screen")]
    AnchorMapping { line: u32, column: u32 },

    #[error("codec error: {0}")]
    Codec(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RoomsyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Codec(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("session.debounce_ms = 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: session.debounce_ms = 0"
        );
    }

    #[test]
    fn sync_error_display() {
        let err = SyncError::InvalidRoomCode {
            code: "abc".into(),
            min_len: 4,
        };
        assert_eq!(
            err.to_string(),
            "invalid room code \"abc\": must be at least 4 characters"
        );

        let err = SyncError::TransportUnavailable("no runtime".into());
        assert_eq!(err.to_string(), "transport unavailable: no runtime");

        let err = SyncError::AnchorMapping { line: 3, column: 9 };
        assert_eq!(err.to_string(), "cannot map line 3, column 9 to the screen");
    }

    #[test]
    fn sync_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: SyncError = json_err.into();
        assert!(matches!(err, SyncError::Codec(_)));
    }

    #[test]
    fn roomsync_error_from_sync() {
        let sync_err = SyncError::TransportUnavailable("closed".into());
        let err: RoomsyncError = sync_err.into();
        assert!(matches!(err, RoomsyncError::Sync(_)));
        assert!(err.to_string().contains("closed"));
    }

    #[test]
    fn roomsync_error_from_config() {
        let err: RoomsyncError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, RoomsyncError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }
}
