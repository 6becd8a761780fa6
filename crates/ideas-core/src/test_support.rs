//! Shared fixtures for the module tests.

use std::sync::Mutex;

use ideas_backend::Payload;

use crate::navigation::Navigator;

/// Navigator that remembers every route it was sent to.
#[derive(Default)]
pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub(crate) fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

pub(crate) fn titled(title: &str) -> Payload {
    let mut data = Payload::new();
    data.insert("title".into(), title.into());
    data
}
