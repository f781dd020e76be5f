//! roomsync configuration system.
//!
//! TOML-based configuration with validation. Every section uses serde
//! defaults so a partial (or missing) config file works out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use roomsync_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("debounce: {} ms", config.session.debounce_ms);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    LogLevel, LoggingConfig, PaletteConfig, RelayConfig, RoomsyncConfig, SessionConfig,
};

use roomsync_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path and validate it.
///
/// Creates a commented default file if none exists yet.
pub fn load_config() -> Result<RoomsyncConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
///
/// Unlike [`load_config`], a missing file is an error.
pub fn load_config_from(path: &Path) -> Result<RoomsyncConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}
