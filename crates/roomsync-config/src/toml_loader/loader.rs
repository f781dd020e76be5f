//! Reading a config file into [`RoomsyncConfig`].

use crate::schema::RoomsyncConfig;
use roomsync_common::ConfigError;
use std::path::Path;
use tracing::{debug, info};

use super::paths::{create_default_config, default_config_path};

/// Parse TOML text. Absent keys and sections take their defaults.
pub fn parse_config_str(text: &str) -> Result<RoomsyncConfig, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError(format!("invalid TOML: {e}")))
}

/// Read and parse `path`. Validation is left to the caller.
pub fn load_from_path(path: &Path) -> Result<RoomsyncConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("cannot read {}: {e}", path.display()))
    })?;
    let config = parse_config_str(&text)?;
    debug!(path = %path.display(), "config file parsed");
    Ok(config)
}

/// Load from [`default_config_path`], writing the commented template first
/// when nothing is there yet.
pub fn load_default() -> Result<RoomsyncConfig, ConfigError> {
    let path = default_config_path()?;
    if path.is_file() {
        return load_from_path(&path);
    }

    info!(path = %path.display(), "no config file yet, writing defaults");
    create_default_config(&path)?;
    Ok(RoomsyncConfig::default())
}
