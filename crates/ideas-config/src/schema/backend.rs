//! Remote service connection settings.

use serde::{Deserialize, Serialize};

/// Public cloud endpoint of the hosted backend.
pub const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

/// Where the client handle sends its requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// API root including the version segment (e.g. `.../v1`).
    pub endpoint: String,
    /// Project identifier sent with every request.
    pub project_id: String,
    /// TCP connect timeout in seconds (valid range: 1-60).
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds (valid range: 1-300).
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: String::new(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}
