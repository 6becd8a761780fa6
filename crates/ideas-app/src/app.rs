//! Wiring of the session manager and idea store behind one backend.

use std::sync::Arc;
use std::time::Duration;

use ideas_backend::{
    AccountApi, AppwriteClient, AppwriteConfig, BackendError, DatabasesApi, Document,
    MemoryBackend, Session,
};
use ideas_common::IdeasError;
use ideas_config::IdeasConfig;
use ideas_core::{IdeaDraft, IdeaStore, Navigator, SessionManager};

use crate::commands::{Command, HELP};

/// Collection ids used against the in-memory backend when none are set.
const OFFLINE_DATABASE: &str = "local";
const OFFLINE_COLLECTION: &str = "ideas";

/// What the shell should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

pub struct App {
    pub session: SessionManager,
    pub ideas: IdeaStore,
}

impl App {
    /// Build against the remote service described by `config`.
    pub fn remote(config: &IdeasConfig, navigator: Arc<dyn Navigator>) -> Result<Self, IdeasError> {
        ideas_config::validation::validate_remote(config)?;

        let backend = &config.backend;
        let client = AppwriteClient::new(
            AppwriteConfig::new(&backend.project_id)
                .with_endpoint(&backend.endpoint)
                .with_connect_timeout(Duration::from_secs(backend.connect_timeout_secs))
                .with_request_timeout(Duration::from_secs(backend.request_timeout_secs)),
        )
        .map_err(|e| IdeasError::Backend(e.to_string()))?;
        let client = Arc::new(client);

        Ok(Self::with_backends(
            client.clone(),
            client,
            navigator,
            &config.ideas.database_id,
            &config.ideas.collection_id,
        ))
    }

    /// Build against a fresh in-memory backend.
    pub fn offline(config: &IdeasConfig, navigator: Arc<dyn Navigator>) -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let database_id = non_empty_or(&config.ideas.database_id, OFFLINE_DATABASE);
        let collection_id = non_empty_or(&config.ideas.collection_id, OFFLINE_COLLECTION);
        Self::with_backends(backend.clone(), backend, navigator, database_id, collection_id)
    }

    pub fn with_backends(
        account: Arc<dyn AccountApi>,
        databases: Arc<dyn DatabasesApi>,
        navigator: Arc<dyn Navigator>,
        database_id: &str,
        collection_id: &str,
    ) -> Self {
        Self {
            session: SessionManager::new(account, navigator),
            ideas: IdeaStore::new(databases, database_id, collection_id),
        }
    }

    /// Run one shell command. Backend failures come back as `Err` and
    /// leave the shell running.
    pub async fn execute(&self, command: Command) -> Result<Reply, BackendError> {
        let text = match command {
            Command::Register { email, password } => {
                let session = self.session.register(&email, &password).await?;
                format!("registered and logged in as {}", session.user_id)
            }
            Command::Login { email, password } => {
                let session = self.session.login(&email, &password).await?;
                format!("logged in as {}", session.user_id)
            }
            Command::Logout => {
                self.session.logout().await?;
                "logged out".to_string()
            }
            Command::Whoami => match self.session.current() {
                Some(session) => render_session(&session),
                None => "not logged in".to_string(),
            },
            Command::List => render_ideas(&self.ideas.current()),
            Command::Refresh => {
                self.ideas.init().await?;
                render_ideas(&self.ideas.current())
            }
            Command::Add { title, description } => {
                let mut draft = IdeaDraft::new(title);
                if let Some(description) = description {
                    draft = draft.with_description(description);
                }
                if let Some(user_id) = self.session.user_id() {
                    draft = draft.with_user_id(user_id);
                }
                let doc = self.ideas.add(draft).await?;
                format!("added {}", doc.id)
            }
            Command::Remove { id } => {
                self.ideas.remove(&id).await?;
                format!("removed {id}")
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Text(text))
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

pub fn render_session(session: &Session) -> String {
    format!(
        "user {} (session {}, since {})",
        session.user_id,
        session.id,
        session.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

pub fn render_ideas(ideas: &[Document]) -> String {
    if ideas.is_empty() {
        return "no ideas yet".to_string();
    }
    ideas
        .iter()
        .map(|doc| {
            let title = doc.get_str("title").unwrap_or("(untitled)");
            match doc.get_str("description") {
                Some(description) if !description.is_empty() => {
                    format!("{}  {title}: {description}", doc.id)
                }
                _ => format!("{}  {title}", doc.id),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
