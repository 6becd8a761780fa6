//! The ten most recent ideas of one collection.
//!
//! The local list is a derived view of the remote collection, newest
//! first. `add` prepends the created document without re-fetching;
//! `remove` filters locally and then reloads the page from the server.

mod draft;
mod store;

#[cfg(test)]
mod tests;

pub use draft::IdeaDraft;
pub use store::{IdeaStore, PAGE_SIZE};
