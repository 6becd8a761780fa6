//! Configuration validation.
//!
//! Each check pushes a message into a shared list; the orchestrators
//! join them into a single `ConfigError`.

mod backend;
mod helpers;


use crate::schema::IdeasConfig;
use ideas_common::ConfigError;

/// Structural validation that applies whichever backend is used.
pub fn validate(config: &IdeasConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    backend::validate_endpoint(&mut errors, config);
    backend::validate_timeouts(&mut errors, config);

    finish(errors)
}

/// Additional checks needed before talking to the remote service:
/// every identifier must be present.
pub fn validate_remote(config: &IdeasConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    backend::validate_endpoint(&mut errors, config);
    backend::validate_timeouts(&mut errors, config);
    backend::validate_identifiers(&mut errors, config);

    finish(errors)
}

fn finish(errors: Vec<String>) -> Result<(), ConfigError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
