//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_parse_error() {
    let result = load_from_path(Path::new("/tmp/nonexistent_roomsync_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, roomsync_common::ConfigError::ParseError(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[session]
debounce_ms = 250

[relay]
url = "ws://relay.example:9000"
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.session.debounce_ms, 250);
    assert_eq!(config.relay.url, "ws://relay.example:9000");
    // Defaults preserved
    assert_eq!(config.session.min_room_code_len, 4);
    assert_eq!(config.relay.max_reconnect_delay_secs, 30);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, roomsync_common::ConfigError::ParseError(_)));
}

#[test]
fn load_keeps_out_of_range_values_for_the_validator() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[session]\ndebounce_ms = 99999\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.session.debounce_ms, 99999);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roomsync").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.session.debounce_ms, 150);
    assert_eq!(config.relay.url, "ws://127.0.0.1:8080");
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::RoomsyncConfig;

    let config: RoomsyncConfig = toml::from_str(&default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("roomsync"));
        assert!(path_str.ends_with("config.toml"));
    }
}

#[test]
fn env_override_wins_over_config_dir() {
    let resolved = super::paths::resolve_config_path(
        Some("/etc/roomsync.toml".into()),
        Some("/home/ada/.config".into()),
    );
    assert_eq!(resolved, Some("/etc/roomsync.toml".into()));
}

#[test]
fn empty_override_is_ignored() {
    let resolved = super::paths::resolve_config_path(Some("".into()), Some("/home/ada/.config".into()));
    assert_eq!(
        resolved,
        Some(Path::new("/home/ada/.config/roomsync/config.toml").to_path_buf())
    );
}

#[test]
fn no_config_dir_and_no_override_is_none() {
    assert_eq!(super::paths::resolve_config_path(None, None), None);
}

#[test]
fn empty_text_is_all_defaults() {
    let config = parse_config_str("").unwrap();
    assert_eq!(config.session.debounce_ms, 150);
    assert!(config.session.announce_on_join);
    assert_eq!(config.palette.colors.len(), 8);
}

#[test]
fn unknown_log_level_is_a_parse_error() {
    let err = parse_config_str("[logging]\nlevel = \"loud\"\n").unwrap_err();
    assert!(matches!(err, roomsync_common::ConfigError::ParseError(_)));
}
