//! Per-section validators: session, palette, relay.

use roomsync_common::Color;

use crate::schema::RoomsyncConfig;

use super::helpers::validate_range;

pub(crate) fn validate_session(errors: &mut Vec<String>, config: &RoomsyncConfig) {
    validate_range(
        errors,
        "session.debounce_ms",
        config.session.debounce_ms,
        10,
        5000,
    );
    validate_range(
        errors,
        "session.min_room_code_len",
        config.session.min_room_code_len,
        1,
        64,
    );
}

pub(crate) fn validate_palette(errors: &mut Vec<String>, config: &RoomsyncConfig) {
    if config.palette.colors.is_empty() {
        errors.push("palette.colors must not be empty".into());
    }
    for (i, hex) in config.palette.colors.iter().enumerate() {
        if Color::from_hex(hex).is_none() {
            errors.push(format!("palette.colors[{i}] = {hex:?} is not a #rrggbb color"));
        }
    }
}

pub(crate) fn validate_relay(errors: &mut Vec<String>, config: &RoomsyncConfig) {
    let relay = &config.relay;
    if !relay.url.is_empty() && !(relay.url.starts_with("ws://") || relay.url.starts_with("wss://"))
    {
        errors.push(format!(
            "relay.url = {:?} must start with ws:// or wss://",
            relay.url
        ));
    }
    validate_range(
        errors,
        "relay.connect_timeout_secs",
        relay.connect_timeout_secs,
        1,
        120,
    );
    validate_range(
        errors,
        "relay.reconnect_delay_secs",
        relay.reconnect_delay_secs,
        1,
        60,
    );
    validate_range(
        errors,
        "relay.max_reconnect_delay_secs",
        relay.max_reconnect_delay_secs,
        1,
        600,
    );
    if relay.max_reconnect_delay_secs < relay.reconnect_delay_secs {
        errors.push(format!(
            "relay.max_reconnect_delay_secs = {} is below relay.reconnect_delay_secs = {}",
            relay.max_reconnect_delay_secs, relay.reconnect_delay_secs
        ));
    }
}
