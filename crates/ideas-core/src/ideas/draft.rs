use ideas_backend::Payload;
use serde_json::Value;

/// Typed shape of the usual idea document: a title, an optional
/// description and the id of the user who wrote it.
///
/// Converts into the free-form payload `IdeaStore::add` accepts. No
/// validation happens here; the collection's attribute rules apply
/// server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaDraft {
    pub title: String,
    pub description: Option<String>,
    pub user_id: Option<String>,
}

impl IdeaDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            user_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

impl From<IdeaDraft> for Payload {
    fn from(draft: IdeaDraft) -> Self {
        let mut data = Payload::new();
        data.insert("title".into(), Value::String(draft.title));
        if let Some(description) = draft.description {
            data.insert("description".into(), Value::String(description));
        }
        if let Some(user_id) = draft.user_id {
            data.insert("userId".into(), Value::String(user_id));
        }
        data
    }
}
