//! REST client struct, request building, and response checking.

use std::sync::RwLock;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{ErrorBody, Payload};
use crate::query::Query;
use crate::{BackendError, SessionRef};

use super::config::AppwriteConfig;

pub(crate) const PROJECT_HEADER: &str = "x-appwrite-project";
pub(crate) const RESPONSE_FORMAT_HEADER: &str = "x-appwrite-response-format";
pub(crate) const RESPONSE_FORMAT: &str = "1.4.0";
pub(crate) const FALLBACK_COOKIES_HEADER: &str = "x-fallback-cookies";

/// Client handle bound to one endpoint and project.
///
/// Cheap to share behind an `Arc`; both API traits take `&self`.
pub struct AppwriteClient {
    pub(crate) config: AppwriteConfig,
    pub(crate) http: reqwest::Client,
    fallback_cookies: RwLock<Option<String>>,
}

impl AppwriteClient {
    pub fn new(config: AppwriteConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| BackendError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http,
            fallback_cookies: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &AppwriteConfig {
        &self.config
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// Headers sent with every request.
    pub(crate) fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(project) = HeaderValue::from_str(&self.config.project_id) {
            headers.insert(PROJECT_HEADER, project);
        }
        headers.insert(
            RESPONSE_FORMAT_HEADER,
            HeaderValue::from_static(RESPONSE_FORMAT),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(cookies) = self.fallback_cookies() {
            if let Ok(value) = HeaderValue::from_str(&cookies) {
                headers.insert(FALLBACK_COOKIES_HEADER, value);
            }
        }
        headers
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .headers(self.default_headers())
    }

    /// Send a request and turn non-2xx answers into `BackendError`.
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await.map_err(network_error)?;
        self.remember_fallback_cookies(response.headers());

        let status = response.status();
        debug!(status = status.as_u16(), "response received");

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(BackendError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &text));
        }
        Ok(response)
    }

    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        self.execute(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| BackendError::ParseError(e.to_string()))
    }

    pub(crate) fn fallback_cookies(&self) -> Option<String> {
        self.fallback_cookies
            .read()
            .ok()
            .and_then(|slot| slot.clone())
    }

    pub(crate) fn remember_fallback_cookies(&self, headers: &HeaderMap) {
        let Some(value) = headers
            .get(FALLBACK_COOKIES_HEADER)
            .and_then(|v| v.to_str().ok())
        else {
            return;
        };
        if let Ok(mut slot) = self.fallback_cookies.write() {
            *slot = Some(value.to_string());
        }
    }

    pub(crate) fn forget_fallback_cookies(&self) {
        if let Ok(mut slot) = self.fallback_cookies.write() {
            *slot = None;
        }
    }

    /// Local cleanup after a successful delete-session. Only the handle's
    /// own session owns the remembered cookies.
    pub(crate) fn session_deleted(&self, session: &SessionRef) {
        if *session == SessionRef::Current {
            self.forget_fallback_cookies();
        }
    }

    // -- Request builders --

    pub(crate) fn create_account_request(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
    ) -> RequestBuilder {
        let body = serde_json::json!({
            "userId": user_id,
            "email": email,
            "password": password,
        });
        self.request(Method::POST, "/account").json(&body)
    }

    pub(crate) fn create_email_session_request(&self, email: &str, password: &str) -> RequestBuilder {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });
        self.request(Method::POST, "/account/sessions/email")
            .json(&body)
    }

    pub(crate) fn delete_session_request(&self, session: &SessionRef) -> RequestBuilder {
        let path = format!("/account/sessions/{}", session.as_str());
        self.request(Method::DELETE, &path)
    }

    /// Each query becomes one `queries[]` parameter.
    pub(crate) fn list_documents_request(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> RequestBuilder {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_string()))
            .collect();
        self.request(Method::GET, &documents_path(database_id, collection_id))
            .query(&params)
    }

    pub(crate) fn create_document_request(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &Payload,
    ) -> RequestBuilder {
        let body = serde_json::json!({
            "documentId": document_id,
            "data": data,
        });
        self.request(Method::POST, &documents_path(database_id, collection_id))
            .json(&body)
    }

    pub(crate) fn delete_document_request(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> RequestBuilder {
        let path = format!(
            "{}/{document_id}",
            documents_path(database_id, collection_id)
        );
        self.request(Method::DELETE, &path)
    }
}

pub(crate) fn network_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::NetworkError(format!("request timed out: {e}"))
    } else {
        BackendError::NetworkError(e.to_string())
    }
}

/// Decode an error response body. Falls back to the raw text when the
/// body is not the service's JSON error shape.
pub(crate) fn api_error(status: u16, body: &str) -> BackendError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => BackendError::Api {
            status: if err.code >= 400 { err.code } else { status },
            kind: if err.kind.is_empty() {
                "unknown".to_string()
            } else {
                err.kind
            },
            message: err.message,
        },
        Err(_) => {
            let text = body.chars().take(200).collect::<String>();
            BackendError::Api {
                status,
                kind: "unknown".to_string(),
                message: if text.is_empty() {
                    format!("HTTP {status}")
                } else {
                    text
                },
            }
        }
    }
}

pub(crate) fn documents_path(database_id: &str, collection_id: &str) -> String {
    format!("/databases/{database_id}/collections/{collection_id}/documents")
}
