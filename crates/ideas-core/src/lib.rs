//! Client-side state for the ideas app.
//!
//! Two independent modules, each owning its reactive state and talking to
//! the backend through the client handle it was given:
//! - `SessionManager`: register, login, logout; current session and
//!   logged-in flag
//! - `IdeaStore`: load, add, remove; the ten most recent ideas

pub mod ideas;
pub mod navigation;
pub mod session;

pub use ideas::{IdeaDraft, IdeaStore, PAGE_SIZE};
pub use navigation::{Navigator, HOME_ROUTE};
pub use session::SessionManager;

#[cfg(test)]
pub(crate) mod test_support;
