use std::sync::Arc;

use ideas_backend::query::CREATED_AT;
use ideas_backend::{BackendError, DatabasesApi, Document, Payload, Query, UNIQUE_ID};
use ideas_common::Reactive;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Number of ideas kept locally and fetched per load.
pub const PAGE_SIZE: usize = 10;

/// Load, add and remove ideas in one (database, collection) pair.
pub struct IdeaStore {
    databases: Arc<dyn DatabasesApi>,
    database_id: String,
    collection_id: String,
    current: Reactive<Vec<Document>>,
}

impl IdeaStore {
    pub fn new(
        databases: Arc<dyn DatabasesApi>,
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            databases,
            database_id: database_id.into(),
            collection_id: collection_id.into(),
            current: Reactive::new(Vec::new()),
        }
    }

    /// Replace the local list with the newest page from the server.
    pub async fn init(&self) -> Result<(), BackendError> {
        let queries = [
            Query::order_desc(CREATED_AT),
            Query::limit(PAGE_SIZE as u32),
        ];
        let list = self
            .databases
            .list_documents(&self.database_id, &self.collection_id, &queries)
            .await
            .inspect_err(|e| warn!(error = %e, "loading ideas failed"))?;

        debug!(
            fetched = list.documents.len(),
            total = list.total,
            "ideas loaded"
        );
        self.current.set(list.documents);
        Ok(())
    }

    /// Create a document with a server-generated id and put it at the
    /// front of the local list, dropping the oldest entry past
    /// [`PAGE_SIZE`].
    ///
    /// No fetch follows, so a newer document written concurrently by
    /// someone else is not reflected until the next `init`.
    pub async fn add(&self, payload: impl Into<Payload>) -> Result<Document, BackendError> {
        let payload = payload.into();
        let doc = self
            .databases
            .create_document(&self.database_id, &self.collection_id, UNIQUE_ID, &payload)
            .await
            .inspect_err(|e| warn!(error = %e, "adding idea failed"))?;

        info!(idea = %doc.id, "idea added");
        self.current.update(|list| {
            list.insert(0, doc.clone());
            list.truncate(PAGE_SIZE);
        });
        Ok(doc)
    }

    /// Delete a document, drop it from the local list, then reload.
    ///
    /// The reload refills the slot freed at the end of the page. If it
    /// fails, the error is returned and the list keeps only the local
    /// removal, possibly holding fewer than [`PAGE_SIZE`] entries.
    pub async fn remove(&self, id: &str) -> Result<(), BackendError> {
        self.databases
            .delete_document(&self.database_id, &self.collection_id, id)
            .await
            .inspect_err(|e| warn!(idea = id, error = %e, "removing idea failed"))?;

        info!(idea = id, "idea removed");
        self.current.update(|list| list.retain(|doc| doc.id != id));
        self.init().await
    }

    pub fn current(&self) -> Vec<Document> {
        self.current.get()
    }

    pub fn len(&self) -> usize {
        self.current.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Document>> {
        self.current.subscribe()
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }
}
