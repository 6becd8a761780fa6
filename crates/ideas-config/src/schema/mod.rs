//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod backend;
mod collection;
mod logging;

pub use backend::*;
pub use collection::*;
pub use logging::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdeasConfig {
    pub backend: BackendConfig,
    pub ideas: CollectionConfig,
    pub logging: LoggingConfig,
}
