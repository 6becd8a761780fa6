use std::sync::Arc;

use ideas_backend::{AccountApi, BackendError, Session, SessionRef, UNIQUE_ID};
use ideas_common::Reactive;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::navigation::{Navigator, HOME_ROUTE};

/// Register, log in and log out against the account endpoints.
///
/// State moves between logged out and logged in only on successful remote
/// calls. A failed call leaves both cells untouched, which means a failed
/// `logout` can leave the local state claiming a session the server no
/// longer has.
pub struct SessionManager {
    account: Arc<dyn AccountApi>,
    navigator: Arc<dyn Navigator>,
    current: Reactive<Option<Session>>,
    logged_in: Reactive<bool>,
}

impl SessionManager {
    pub fn new(account: Arc<dyn AccountApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            account,
            navigator,
            current: Reactive::new(None),
            logged_in: Reactive::new(false),
        }
    }

    /// Create an account with a server-generated id, then log in with the
    /// same credentials.
    ///
    /// Credentials are passed through as given; the server enforces
    /// uniqueness and password policy.
    pub async fn register(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let account = self
            .account
            .create_account(UNIQUE_ID, email, password)
            .await?;
        info!(user = %account.id, "account created");

        self.login(email, password).await
    }

    /// Open a session for the credentials and navigate home.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let session = self
            .account
            .create_email_session(email, password)
            .await
            .inspect_err(|e| warn!(error = %e, "login failed"))?;

        info!(user = %session.user_id, session = %session.id, "logged in");
        self.current.set(Some(session.clone()));
        self.logged_in.set(true);
        self.navigator.navigate(HOME_ROUTE);
        Ok(session)
    }

    /// Delete the session bound to the client handle and navigate home.
    pub async fn logout(&self) -> Result<(), BackendError> {
        self.account
            .delete_session(&SessionRef::Current)
            .await
            .inspect_err(|e| warn!(error = %e, "logout failed, keeping local session"))?;

        info!("logged out");
        self.current.set(None);
        self.logged_in.set(false);
        self.navigator.navigate(HOME_ROUTE);
        Ok(())
    }

    pub fn current(&self) -> Option<Session> {
        self.current.get()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in.get()
    }

    /// Id of the logged-in user, if any.
    pub fn user_id(&self) -> Option<String> {
        self.current
            .with(|session| session.as_ref().map(|s| s.user_id.clone()))
    }

    pub fn subscribe_current(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    pub fn subscribe_logged_in(&self) -> watch::Receiver<bool> {
        self.logged_in.subscribe()
    }
}
