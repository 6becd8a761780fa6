//! Navigation side-channel.
//!
//! The session manager asks the UI to move to a route after a successful
//! login or logout; how routing happens is up to the implementor.

/// Route of the home view.
pub const HOME_ROUTE: &str = "/";

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, route: &str) {
        self(route)
    }
}
