//! Client handle for the hosted backend.
//!
//! Provides the two API surfaces the ideas client consumes:
//! - `AccountApi`: create account, create email session, delete session
//! - `DatabasesApi`: list, create and delete documents in a collection
//!
//! `AppwriteClient` implements both over the service's REST API;
//! `MemoryBackend` implements both in-process for tests and offline use.

pub mod appwrite;
pub mod memory;
pub mod models;
pub mod query;

use async_trait::async_trait;

pub use appwrite::{AppwriteClient, AppwriteConfig};
pub use memory::{MemoryBackend, Operation};
pub use models::{Account, Document, DocumentList, Payload, Session};
pub use query::Query;

/// Id placeholder asking the server to generate a unique id.
pub const UNIQUE_ID: &str = "unique()";

/// Which session a delete-session call targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRef {
    /// The session bound to this client handle.
    Current,
    /// A concrete session id.
    Id(String),
}

impl SessionRef {
    pub fn as_str(&self) -> &str {
        match self {
            SessionRef::Current => "current",
            SessionRef::Id(id) => id,
        }
    }
}

#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, BackendError>;

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError>;

    async fn delete_session(&self, session: &SessionRef) -> Result<(), BackendError>;
}

#[async_trait]
pub trait DatabasesApi: Send + Sync {
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentList, BackendError>;

    async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &Payload,
    ) -> Result<Document, BackendError>;

    async fn delete_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> Result<(), BackendError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The service answered with an error body.
    #[error("API error (HTTP {status}, {kind}): {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
    },
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl BackendError {
    pub fn api(status: u16, kind: impl Into<String>, message: impl Into<String>) -> Self {
        BackendError::Api {
            status,
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            BackendError::RateLimited => Some(429),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}
