//! Configuration schema types for roomsync.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use roomsync_common::types::DEFAULT_PALETTE;
use roomsync_common::Palette;
use serde::{Deserialize, Serialize};

// =============================================================================
// Session Config
// =============================================================================

/// Room session behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Quiescence window before a local edit is published, in milliseconds.
    pub debounce_ms: u32,
    /// Shortest room code accepted by `join`.
    pub min_room_code_len: u32,
    /// Re-announce ourselves when a newcomer joins, with the buffer if we wrote it.
    pub announce_on_join: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            min_room_code_len: 4,
            announce_on_join: true,
        }
    }
}

// =============================================================================
// Palette Config
// =============================================================================

/// Participant colors, as `#rrggbb` strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub colors: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl PaletteConfig {
    /// Parsed palette, falling back to the built-in one when the configured
    /// list is empty or malformed.
    pub fn to_palette(&self) -> Palette {
        Palette::from_hex_list(&self.colors).unwrap_or_else(|| {
            tracing::warn!("invalid palette in config, using built-in colors");
            Palette::default()
        })
    }
}

// =============================================================================
// Relay Config
// =============================================================================

/// Connection settings for the room relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// WebSocket URL of the relay. Empty means local-only editing.
    pub url: String,
    pub connect_timeout_secs: u32,
    pub reconnect_delay_secs: u32,
    pub max_reconnect_delay_secs: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8080".into(),
            connect_timeout_secs: 15,
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
        }
    }
}

// =============================================================================
// Logging Config
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `tracing-subscriber` filter directive for the roomsync crates.
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "roomsync=trace",
            LogLevel::Debug => "roomsync=debug",
            LogLevel::Info => "roomsync=info",
            LogLevel::Warn => "roomsync=warn",
            LogLevel::Error => "roomsync=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

// =============================================================================
// Root Config
// =============================================================================

/// Root configuration for roomsync.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RoomsyncConfig {
    pub session: SessionConfig,
    pub palette: PaletteConfig,
    pub relay: RelayConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_correct_session() {
        let config = RoomsyncConfig::default();
        assert_eq!(config.session.debounce_ms, 150);
        assert_eq!(config.session.min_room_code_len, 4);
        assert!(config.session.announce_on_join);
    }

    #[test]
    fn default_config_has_correct_relay() {
        let config = RoomsyncConfig::default();
        assert_eq!(config.relay.url, "ws://127.0.0.1:8080");
        assert_eq!(config.relay.connect_timeout_secs, 15);
        assert_eq!(config.relay.reconnect_delay_secs, 1);
        assert_eq!(config.relay.max_reconnect_delay_secs, 30);
    }

    #[test]
    fn default_palette_matches_built_in() {
        let config = RoomsyncConfig::default();
        assert_eq!(config.palette.to_palette(), Palette::default());
    }

    #[test]
    fn malformed_palette_falls_back() {
        let palette = PaletteConfig {
            colors: vec!["#zzzzzz".into()],
        };
        assert_eq!(palette.to_palette(), Palette::default());
    }

    #[test]
    fn log_level_serializes_lowercase() {
        let json = serde_json::to_string(&LogLevel::Warn).unwrap();
        assert_eq!(json, "\"warn\"");
        assert_eq!(LogLevel::Debug.directive(), "roomsync=debug");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: RoomsyncConfig = toml::from_str("[session]\ndebounce_ms = 300\n").unwrap();
        assert_eq!(config.session.debounce_ms, 300);
        assert_eq!(config.session.min_room_code_len, 4);
        assert_eq!(config.logging.level, LogLevel::Info);
    }
}
