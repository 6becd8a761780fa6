//! REST client for the hosted backend (Appwrite v1 API).
//!
//! Implements `AccountApi` and `DatabasesApi` with `reqwest`. The login
//! session is bound to the client handle: session cookies go into the
//! client's cookie jar, and the `X-Fallback-Cookies` header the service
//! returns to non-browser clients is remembered and replayed.

mod api;
mod client;
mod config;

pub use client::AppwriteClient;
pub use config::AppwriteConfig;
