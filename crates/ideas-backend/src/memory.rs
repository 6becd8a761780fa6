//! In-process backend.
//!
//! Keeps accounts, one client-bound session and any number of
//! collections in memory, mimicking the remote service's error codes.
//! Every call is recorded, and failures can be injected per operation,
//! which makes it the test double for the session and idea modules. The
//! binary also uses it for `--offline` runs.

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::debug;

use crate::models::{Account, Document, DocumentList, Payload, Session};
use crate::query::{Query, CREATED_AT};
use crate::{AccountApi, BackendError, DatabasesApi, SessionRef, UNIQUE_ID};

const MIN_PASSWORD_LEN: usize = 8;

/// Remote operations, as recorded in the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateAccount,
    CreateSession,
    DeleteSession,
    ListDocuments,
    CreateDocument,
    DeleteDocument,
}

struct StoredAccount {
    account: Account,
    password: String,
}

#[derive(Default)]
struct MemoryState {
    accounts: Vec<StoredAccount>,
    sessions: Vec<Session>,
    /// Session bound to this client handle.
    current_session: Option<String>,
    collections: HashMap<(String, String), Vec<Document>>,
    failures: VecDeque<(Operation, BackendError)>,
    calls: Vec<Operation>,
    /// Logical clock; every created record gets a strictly later timestamp.
    ticks: i64,
}

pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    epoch: DateTime<Utc>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            epoch: Utc::now(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make the next call of `op` fail with `error`.
    pub fn fail_next(&self, op: Operation, error: BackendError) {
        self.lock().failures.push_back((op, error));
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<Operation> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: Operation) -> usize {
        self.lock().calls.iter().filter(|c| **c == op).count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Insert a document directly, bypassing the call log.
    pub fn seed_document(&self, database_id: &str, collection_id: &str, data: Payload) -> Document {
        let mut state = self.lock();
        let doc = self.new_document(&mut state, database_id, collection_id, None, data);
        state
            .collections
            .entry((database_id.to_string(), collection_id.to_string()))
            .or_default()
            .push(doc.clone());
        doc
    }

    /// Remove a document directly, as another writer would.
    pub fn remove_document(&self, database_id: &str, collection_id: &str, document_id: &str) {
        let mut state = self.lock();
        if let Some(docs) = state
            .collections
            .get_mut(&(database_id.to_string(), collection_id.to_string()))
        {
            docs.retain(|d| d.id != document_id);
        }
    }

    /// Snapshot of a collection in insertion order.
    pub fn documents(&self, database_id: &str, collection_id: &str) -> Vec<Document> {
        self.lock()
            .collections
            .get(&(database_id.to_string(), collection_id.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_active_session(&self) -> bool {
        self.lock().current_session.is_some()
    }

    fn begin(&self, state: &mut MemoryState, op: Operation) -> Result<(), BackendError> {
        state.calls.push(op);
        if let Some(pos) = state.failures.iter().position(|(o, _)| *o == op) {
            if let Some((_, err)) = state.failures.remove(pos) {
                debug!(?op, error = %err, "injected failure");
                return Err(err);
            }
        }
        Ok(())
    }

    fn now(&self, state: &mut MemoryState) -> DateTime<Utc> {
        state.ticks += 1;
        self.epoch + Duration::milliseconds(state.ticks)
    }

    fn new_document(
        &self,
        state: &mut MemoryState,
        database_id: &str,
        collection_id: &str,
        id: Option<&str>,
        data: Payload,
    ) -> Document {
        let now = self.now(state);
        Document {
            id: resolve_id(id.unwrap_or(UNIQUE_ID)),
            collection_id: collection_id.to_string(),
            database_id: database_id.to_string(),
            created_at: now,
            updated_at: Some(now),
            permissions: Vec::new(),
            data,
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_id(requested: &str) -> String {
    if requested == UNIQUE_ID {
        ideas_common::new_id()
    } else {
        requested.to_string()
    }
}

/// Filter and order `docs`, then cut the page. The returned total counts
/// every match before the limit applies.
fn apply_queries(mut docs: Vec<Document>, queries: &[Query]) -> (u64, Vec<Document>) {
    let mut limit = None;

    for query in queries {
        match query {
            Query::Equal(attr, values) => {
                docs.retain(|d| d.data.get(attr).is_some_and(|v| values.contains(v)));
            }
            Query::OrderAsc(attr) => sort_by_attribute(&mut docs, attr, false),
            Query::OrderDesc(attr) => sort_by_attribute(&mut docs, attr, true),
            Query::Limit(n) => limit = Some(*n as usize),
        }
    }

    let total = docs.len() as u64;
    if let Some(limit) = limit {
        docs.truncate(limit);
    }
    (total, docs)
}

fn sort_by_attribute(docs: &mut [Document], attr: &str, descending: bool) {
    if attr == CREATED_AT {
        docs.sort_by_key(|d| d.created_at);
    } else {
        docs.sort_by(|a, b| compare_values(a.data.get(attr), b.data.get(attr)));
    }
    if descending {
        docs.reverse();
    }
}

/// Missing values sort first, then nulls, booleans, numbers and strings,
/// each compared by value.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(Value::Array(_)) => 5,
            Some(Value::Object(_)) => 6,
        }
    }

    match (a, b) {
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.total_cmp(&b)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(a), Some(b)) if rank(Some(a)) == rank(Some(b)) => a.to_string().cmp(&b.to_string()),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[async_trait]
impl AccountApi for MemoryBackend {
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, BackendError> {
        let mut state = self.lock();
        self.begin(&mut state, Operation::CreateAccount)?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(BackendError::api(
                400,
                "general_argument_invalid",
                "Invalid `password` param: Password must be at least 8 characters",
            ));
        }
        let id = resolve_id(user_id);
        if state
            .accounts
            .iter()
            .any(|a| a.account.email == email || a.account.id == id)
        {
            return Err(BackendError::api(
                409,
                "user_already_exists",
                "A user with the same id, email, or phone already exists in this project.",
            ));
        }

        let account = Account {
            id,
            created_at: self.now(&mut state),
            name: String::new(),
            email: email.to_string(),
            status: true,
            email_verification: false,
        };
        state.accounts.push(StoredAccount {
            account: account.clone(),
            password: password.to_string(),
        });
        Ok(account)
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let mut state = self.lock();
        self.begin(&mut state, Operation::CreateSession)?;

        if state.current_session.is_some() {
            return Err(BackendError::api(
                401,
                "user_session_already_exists",
                "Creation of a session is prohibited when a session is active.",
            ));
        }
        let Some(user_id) = state
            .accounts
            .iter()
            .find(|a| a.account.email == email && a.password == password)
            .map(|a| a.account.id.clone())
        else {
            return Err(BackendError::api(
                401,
                "user_invalid_credentials",
                "Invalid credentials. Please check the email and password.",
            ));
        };

        let session = Session {
            id: ideas_common::new_id(),
            created_at: self.now(&mut state),
            user_id,
            expire: None,
            provider: "email".to_string(),
            current: true,
        };
        state.current_session = Some(session.id.clone());
        state.sessions.push(session.clone());
        Ok(session)
    }

    async fn delete_session(&self, session: &SessionRef) -> Result<(), BackendError> {
        let mut state = self.lock();
        self.begin(&mut state, Operation::DeleteSession)?;

        let target = match session {
            SessionRef::Current => state.current_session.clone().ok_or_else(|| {
                BackendError::api(
                    401,
                    "general_unauthorized_scope",
                    "User (role: guests) missing scope (account)",
                )
            })?,
            SessionRef::Id(id) => id.clone(),
        };

        let before = state.sessions.len();
        state.sessions.retain(|s| s.id != target);
        if state.sessions.len() == before {
            return Err(BackendError::api(
                404,
                "user_session_not_found",
                "The current user session could not be found.",
            ));
        }
        if state.current_session.as_deref() == Some(target.as_str()) {
            state.current_session = None;
        }
        Ok(())
    }
}

#[async_trait]
impl DatabasesApi for MemoryBackend {
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentList, BackendError> {
        let mut state = self.lock();
        self.begin(&mut state, Operation::ListDocuments)?;

        let docs = state
            .collections
            .get(&(database_id.to_string(), collection_id.to_string()))
            .cloned()
            .unwrap_or_default();
        let (total, documents) = apply_queries(docs, queries);
        Ok(DocumentList { total, documents })
    }

    async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &Payload,
    ) -> Result<Document, BackendError> {
        let mut state = self.lock();
        self.begin(&mut state, Operation::CreateDocument)?;

        let key = (database_id.to_string(), collection_id.to_string());
        let exists = state
            .collections
            .get(&key)
            .is_some_and(|docs| docs.iter().any(|d| d.id == document_id));
        if exists {
            return Err(BackendError::api(
                409,
                "document_already_exists",
                "Document with the requested ID already exists.",
            ));
        }

        let doc = self.new_document(
            &mut state,
            database_id,
            collection_id,
            Some(document_id),
            data.clone(),
        );
        state.collections.entry(key).or_default().push(doc.clone());
        Ok(doc)
    }

    async fn delete_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> Result<(), BackendError> {
        let mut state = self.lock();
        self.begin(&mut state, Operation::DeleteDocument)?;

        let docs = state
            .collections
            .get_mut(&(database_id.to_string(), collection_id.to_string()));
        match docs {
            Some(docs) if docs.iter().any(|d| d.id == document_id) => {
                docs.retain(|d| d.id != document_id);
                Ok(())
            }
            _ => Err(BackendError::api(
                404,
                "document_not_found",
                "Document with the requested ID could not be found.",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str) -> Payload {
        let mut data = Payload::new();
        data.insert("title".into(), title.into());
        data
    }

    #[tokio::test]
    async fn account_then_session() {
        let backend = MemoryBackend::new();
        let account = backend
            .create_account(UNIQUE_ID, "ada@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(account.id.len(), 32);

        let session = backend
            .create_email_session("ada@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(session.user_id, account.id);
        assert!(backend.has_active_session());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let backend = MemoryBackend::new();
        backend
            .create_account(UNIQUE_ID, "ada@example.com", "password123")
            .await
            .unwrap();
        let err = backend
            .create_account(UNIQUE_ID, "ada@example.com", "password456")
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn short_password_rejected() {
        let backend = MemoryBackend::new();
        let err = backend
            .create_account(UNIQUE_ID, "ada@example.com", "short")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let backend = MemoryBackend::new();
        backend
            .create_account(UNIQUE_ID, "ada@example.com", "password123")
            .await
            .unwrap();
        let err = backend
            .create_email_session("ada@example.com", "nope-nope")
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert!(!backend.has_active_session());
    }

    #[tokio::test]
    async fn delete_current_without_session_fails() {
        let backend = MemoryBackend::new();
        let err = backend
            .delete_session(&SessionRef::Current)
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn delete_current_clears_binding() {
        let backend = MemoryBackend::new();
        backend
            .create_account(UNIQUE_ID, "ada@example.com", "password123")
            .await
            .unwrap();
        backend
            .create_email_session("ada@example.com", "password123")
            .await
            .unwrap();
        backend.delete_session(&SessionRef::Current).await.unwrap();
        assert!(!backend.has_active_session());
    }

    #[tokio::test]
    async fn list_orders_and_limits() {
        let backend = MemoryBackend::new();
        for i in 0..15 {
            backend.seed_document("db", "ideas", payload(&format!("idea {i}")));
        }

        let list = backend
            .list_documents(
                "db",
                "ideas",
                &[Query::order_desc(CREATED_AT), Query::limit(10)],
            )
            .await
            .unwrap();
        assert_eq!(list.total, 15);
        assert_eq!(list.documents.len(), 10);
        assert_eq!(list.documents[0].get_str("title"), Some("idea 14"));
        assert_eq!(list.documents[9].get_str("title"), Some("idea 5"));
    }

    #[tokio::test]
    async fn list_filters_by_equal() {
        let backend = MemoryBackend::new();
        backend.seed_document("db", "ideas", payload("a"));
        backend.seed_document("db", "ideas", payload("b"));

        let list = backend
            .list_documents("db", "ideas", &[Query::equal("title", "b")])
            .await
            .unwrap();
        assert_eq!(list.documents.len(), 1);
        assert_eq!(list.documents[0].get_str("title"), Some("b"));
    }

    #[tokio::test]
    async fn total_counts_filtered_matches_before_limit() {
        let backend = MemoryBackend::new();
        for title in ["a", "b", "a", "a"] {
            backend.seed_document("db", "ideas", payload(title));
        }

        let list = backend
            .list_documents(
                "db",
                "ideas",
                &[Query::equal("title", "a"), Query::limit(2)],
            )
            .await
            .unwrap();
        assert_eq!(list.total, 3);
        assert_eq!(list.documents.len(), 2);
    }

    #[tokio::test]
    async fn numeric_fields_sort_by_value() {
        let backend = MemoryBackend::new();
        for score in [9, 10, 2] {
            let mut data = Payload::new();
            data.insert("score".into(), score.into());
            backend.seed_document("db", "ideas", data);
        }
        let scores = |list: DocumentList| -> Vec<i64> {
            list.documents
                .iter()
                .filter_map(|d| d.data.get("score").and_then(Value::as_i64))
                .collect()
        };

        let asc = backend
            .list_documents("db", "ideas", &[Query::order_asc("score")])
            .await
            .unwrap();
        assert_eq!(scores(asc), vec![2, 9, 10]);

        let desc = backend
            .list_documents("db", "ideas", &[Query::order_desc("score")])
            .await
            .unwrap();
        assert_eq!(scores(desc), vec![10, 9, 2]);
    }

    #[test]
    fn missing_values_sort_before_present_ones() {
        let one = Value::from(1);
        let text = Value::from("x");
        assert_eq!(compare_values(None, Some(&one)), Ordering::Less);
        assert_eq!(compare_values(Some(&one), Some(&text)), Ordering::Less);
        assert_eq!(
            compare_values(Some(&Value::from("b")), Some(&Value::from("a"))),
            Ordering::Greater
        );
    }

    #[tokio::test]
    async fn list_of_unknown_collection_is_empty() {
        let backend = MemoryBackend::new();
        let list = backend.list_documents("db", "none", &[]).await.unwrap();
        assert_eq!(list, DocumentList::default());
    }

    #[tokio::test]
    async fn create_assigns_increasing_timestamps() {
        let backend = MemoryBackend::new();
        let a = backend
            .create_document("db", "ideas", UNIQUE_ID, &payload("a"))
            .await
            .unwrap();
        let b = backend
            .create_document("db", "ideas", UNIQUE_ID, &payload("b"))
            .await
            .unwrap();
        assert!(b.created_at > a.created_at);
        assert_ne!(a.id, b.id);
        assert_eq!(a.collection_id, "ideas");
    }

    #[tokio::test]
    async fn create_with_taken_id_conflicts() {
        let backend = MemoryBackend::new();
        backend
            .create_document("db", "ideas", "fixed", &payload("a"))
            .await
            .unwrap();
        let err = backend
            .create_document("db", "ideas", "fixed", &payload("b"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn delete_missing_document_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend
            .delete_document("db", "ideas", "missing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn injected_failure_is_consumed_once() {
        let backend = MemoryBackend::new();
        backend.fail_next(
            Operation::ListDocuments,
            BackendError::NetworkError("connection reset".into()),
        );

        let err = backend.list_documents("db", "ideas", &[]).await.unwrap_err();
        assert_eq!(err, BackendError::NetworkError("connection reset".into()));
        assert!(backend.list_documents("db", "ideas", &[]).await.is_ok());
        assert_eq!(backend.call_count(Operation::ListDocuments), 2);
    }

    #[tokio::test]
    async fn injected_failure_targets_only_its_operation() {
        let backend = MemoryBackend::new();
        backend.fail_next(Operation::DeleteDocument, BackendError::RateLimited);

        assert!(backend.list_documents("db", "ideas", &[]).await.is_ok());
        let err = backend
            .delete_document("db", "ideas", "x")
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::RateLimited);
        assert_eq!(
            backend.calls(),
            vec![Operation::ListDocuments, Operation::DeleteDocument]
        );
    }
}
