//! Where the config file lives, and writing the commented default.

use roomsync_common::ConfigError;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_config_toml;

/// Environment variable that points at an explicit config file.
pub const CONFIG_PATH_ENV: &str = "ROOMSYNC_CONFIG";

/// `$ROOMSYNC_CONFIG` if set, else `<config_dir>/roomsync/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    resolve_config_path(std::env::var_os(CONFIG_PATH_ENV), dirs::config_dir())
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))
}

pub(super) fn resolve_config_path(
    env_override: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    match env_override.filter(|p| !p.is_empty()) {
        Some(path) => Some(PathBuf::from(path)),
        None => config_dir.map(|dir| dir.join("roomsync").join("config.toml")),
    }
}

/// Write the commented default config to `path`, creating parent dirs.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    parent
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| fs::write(path, default_config_toml()))
        .map_err(|e| {
            ConfigError::ParseError(format!("cannot write default config {}: {e}", path.display()))
        })?;

    info!(path = %path.display(), "created default config");
    Ok(())
}
