//! Full configuration validation.
//!
//! Each section has its own checks; this orchestrator calls them all and
//! collects the errors into a single `ConfigError`.

mod helpers;
mod sections;

#[cfg(test)]
mod tests;

use crate::schema::RoomsyncConfig;
use roomsync_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &RoomsyncConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_session(&mut errors, config);
    sections::validate_palette(&mut errors, config);
    sections::validate_relay(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
