use serde::{Deserialize, Serialize};

/// The (database, collection) pair holding idea documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CollectionConfig {
    pub database_id: String,
    pub collection_id: String,
}
