//! Environment variable overrides.
//!
//! Deployments usually ship the project and collection ids through the
//! environment rather than a config file; any variable that is set and
//! non-empty wins over the file value.

use tracing::debug;

use crate::schema::IdeasConfig;

pub const ENDPOINT_VAR: &str = "IDEAS_ENDPOINT";
pub const PROJECT_ID_VAR: &str = "IDEAS_PROJECT_ID";
pub const DATABASE_ID_VAR: &str = "IDEAS_DATABASE_ID";
pub const COLLECTION_ID_VAR: &str = "IDEAS_COLLECTION_ID";

/// Apply overrides from the process environment.
pub fn apply_process_env(config: &mut IdeasConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Apply overrides using `lookup` to resolve variable names.
pub fn apply_overrides(config: &mut IdeasConfig, lookup: impl Fn(&str) -> Option<String>) {
    let targets: [(&str, &mut String); 4] = [
        (ENDPOINT_VAR, &mut config.backend.endpoint),
        (PROJECT_ID_VAR, &mut config.backend.project_id),
        (DATABASE_ID_VAR, &mut config.ideas.database_id),
        (COLLECTION_ID_VAR, &mut config.ideas.collection_id),
    ];

    for (key, slot) in targets {
        if let Some(value) = lookup(key).map(|v| v.trim().to_string()) {
            if !value.is_empty() {
                debug!(var = key, "config override from environment");
                *slot = value;
            }
        }
    }
}
