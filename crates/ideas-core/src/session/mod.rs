//! User session state.
//!
//! Wraps the account endpoints (create account, create session, delete
//! session) and keeps the last session the server handed out. The cached
//! session is process-local: nothing is fetched from the server at
//! startup, so a fresh manager always starts logged out.

mod manager;


pub use manager::SessionManager;
