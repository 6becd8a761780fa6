//! Ideas client configuration.
//!
//! TOML-based configuration with environment overrides and validation.
//! All sections use defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ideas_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{BackendConfig, CollectionConfig, IdeasConfig, LogLevel, LoggingConfig};

use std::path::Path;

use ideas_common::ConfigError;

/// Load config from `path` (or the platform default path), apply
/// environment overrides, and validate the result.
///
/// An explicit path must exist. The default path is created with a
/// commented template on first use.
pub fn load_config(path: Option<&Path>) -> Result<IdeasConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    env::apply_process_env(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &IdeasConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
