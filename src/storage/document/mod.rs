//! Collection-level document store.
//!
//! Documents are JSON objects keyed by `_id`. The trait exposes the handful
//! of operations the repository needs, including the nested array updates
//! used for embedded checkups. Every call touches a single document.

use crate::domain::model::{ObjectId, ID_FIELD};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PostgresDocumentStore;

pub type Document = serde_json::Map<String, JsonValue>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed document in '{collection}': {source}")]
    Malformed {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed document in '{collection}': {reason}")]
    InvalidShape { collection: String, reason: String },
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Round-trips to the backend.
    async fn ping(&self) -> Result<(), StoreError>;

    /// All documents of a collection, in insertion order.
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn find_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError>;

    /// The document whose `array_field` holds an element with `_id == element_id`.
    async fn find_by_element(
        &self,
        collection: &str,
        array_field: &str,
        element_id: &ObjectId,
    ) -> Result<Option<Document>, StoreError>;

    /// Inserts a document. A missing `_id` is generated; returns the stored id.
    async fn insert(&self, collection: &str, document: Document) -> Result<ObjectId, StoreError>;

    /// Overwrites top-level fields. Returns false if no document matched.
    async fn set_fields(
        &self,
        collection: &str,
        id: &ObjectId,
        fields: Document,
    ) -> Result<bool, StoreError>;

    /// Appends to an array field, creating it if absent. Returns false if no
    /// document matched.
    async fn push_element(
        &self,
        collection: &str,
        id: &ObjectId,
        array_field: &str,
        element: Document,
    ) -> Result<bool, StoreError>;

    /// Positional update: merges `fields` into the array element with the
    /// given id. Returns the owner's id, or `None` if no element matched.
    async fn set_element_fields(
        &self,
        collection: &str,
        array_field: &str,
        element_id: &ObjectId,
        fields: Document,
    ) -> Result<Option<ObjectId>, StoreError>;

    /// Removes the array element with the given id. Returns the owner's id,
    /// or `None` if nothing was removed.
    async fn pull_element(
        &self,
        collection: &str,
        array_field: &str,
        element_id: &ObjectId,
    ) -> Result<Option<ObjectId>, StoreError>;

    /// Removes a document. Returns false if it did not exist.
    async fn delete(&self, collection: &str, id: &ObjectId) -> Result<bool, StoreError>;

    async fn count(&self, collection: &str) -> Result<u64, StoreError>;
}

/// Serializes a record into a document.
pub fn to_document<T: Serialize>(collection: &str, value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::InvalidShape {
            collection: collection.to_string(),
            reason: format!("expected an object, got {}", other),
        }),
        Err(source) => Err(StoreError::Malformed {
            collection: collection.to_string(),
            source,
        }),
    }
}

/// Deserializes a stored document into a record.
pub fn from_document<T: DeserializeOwned>(
    collection: &str,
    document: Document,
) -> Result<T, StoreError> {
    serde_json::from_value(JsonValue::Object(document)).map_err(|source| StoreError::Malformed {
        collection: collection.to_string(),
        source,
    })
}

/// Reads the `_id` of a document or embedded element.
pub fn document_id(document: &Document) -> Option<ObjectId> {
    document
        .get(ID_FIELD)
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
}

/// Returns the document's id, assigning a fresh one if it has none.
pub(crate) fn ensure_id(collection: &str, document: &mut Document) -> Result<ObjectId, StoreError> {
    match document.get(ID_FIELD) {
        None => {
            let id = ObjectId::new();
            document.insert(ID_FIELD.to_string(), JsonValue::String(id.to_hex()));
            Ok(id)
        }
        Some(_) => document_id(document).ok_or_else(|| StoreError::InvalidShape {
            collection: collection.to_string(),
            reason: "`_id` is not an object id".to_string(),
        }),
    }
}
