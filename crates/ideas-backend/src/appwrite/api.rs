//! `AccountApi` and `DatabasesApi` implementations for `AppwriteClient`.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::{Account, Document, DocumentList, Payload, Session};
use crate::query::Query;
use crate::{AccountApi, BackendError, DatabasesApi, SessionRef};

use super::client::AppwriteClient;

#[async_trait]
impl AccountApi for AppwriteClient {
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, BackendError> {
        let request_id = ideas_common::new_correlation_id();
        debug!(request = %request_id, "create account");

        let request = self.create_account_request(user_id, email, password);
        self.execute_json(request)
            .await
            .inspect_err(|e| warn!(request = %request_id, error = %e, "create account failed"))
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let request_id = ideas_common::new_correlation_id();
        debug!(request = %request_id, "create email session");

        let request = self.create_email_session_request(email, password);

        self.execute_json(request).await.inspect_err(
            |e| warn!(request = %request_id, error = %e, "create email session failed"),
        )
    }

    async fn delete_session(&self, session: &SessionRef) -> Result<(), BackendError> {
        let request_id = ideas_common::new_correlation_id();
        debug!(request = %request_id, session = session.as_str(), "delete session");

        self.execute(self.delete_session_request(session))
            .await
            .inspect_err(|e| warn!(request = %request_id, error = %e, "delete session failed"))?;

        self.session_deleted(session);
        Ok(())
    }
}

#[async_trait]
impl DatabasesApi for AppwriteClient {
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentList, BackendError> {
        let request_id = ideas_common::new_correlation_id();
        debug!(
            request = %request_id,
            database = database_id,
            collection = collection_id,
            queries = queries.len(),
            "list documents"
        );

        let request = self.list_documents_request(database_id, collection_id, queries);

        self.execute_json(request)
            .await
            .inspect_err(|e| warn!(request = %request_id, error = %e, "list documents failed"))
    }

    async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &Payload,
    ) -> Result<Document, BackendError> {
        let request_id = ideas_common::new_correlation_id();
        debug!(
            request = %request_id,
            database = database_id,
            collection = collection_id,
            fields = data.len(),
            "create document"
        );

        let request =
            self.create_document_request(database_id, collection_id, document_id, data);

        self.execute_json(request)
            .await
            .inspect_err(|e| warn!(request = %request_id, error = %e, "create document failed"))
    }

    async fn delete_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> Result<(), BackendError> {
        let request_id = ideas_common::new_correlation_id();
        debug!(
            request = %request_id,
            database = database_id,
            collection = collection_id,
            document = document_id,
            "delete document"
        );

        let request = self.delete_document_request(database_id, collection_id, document_id);
        self.execute(request)
            .await
            .inspect_err(|e| warn!(request = %request_id, error = %e, "delete document failed"))?;
        Ok(())
    }
}
