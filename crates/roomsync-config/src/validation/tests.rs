//! Tests for the full validation pipeline.

use super::*;
use crate::schema::RoomsyncConfig;

#[test]
fn default_config_validates() {
    let config = RoomsyncConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_debounce_out_of_range() {
    let mut config = RoomsyncConfig::default();
    config.session.debounce_ms = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("session.debounce_ms"));
}

#[test]
fn catches_zero_room_code_length() {
    let mut config = RoomsyncConfig::default();
    config.session.min_room_code_len = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("session.min_room_code_len"));
}

#[test]
fn catches_empty_palette() {
    let mut config = RoomsyncConfig::default();
    config.palette.colors.clear();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("palette.colors must not be empty"));
}

#[test]
fn catches_bad_palette_entry() {
    let mut config = RoomsyncConfig::default();
    config.palette.colors[2] = "red".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("palette.colors[2]"));
}

#[test]
fn empty_relay_url_is_allowed() {
    let mut config = RoomsyncConfig::default();
    config.relay.url.clear();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_non_websocket_relay_url() {
    let mut config = RoomsyncConfig::default();
    config.relay.url = "http://relay.example".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("relay.url"));
}

#[test]
fn catches_inverted_reconnect_delays() {
    let mut config = RoomsyncConfig::default();
    config.relay.reconnect_delay_secs = 20;
    config.relay.max_reconnect_delay_secs = 10;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("below relay.reconnect_delay_secs"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = RoomsyncConfig::default();
    config.session.debounce_ms = 0;
    config.relay.connect_timeout_secs = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("session.debounce_ms"));
    assert!(err.contains("relay.connect_timeout_secs"));
    assert!(err.contains("; "));
}
