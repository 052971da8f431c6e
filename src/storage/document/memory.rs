//! In-process document store.
//!
//! Backs the test suite and local runs without Postgres. A single write lock
//! covers each operation, which gives the same per-document atomicity the
//! Postgres store gets from single statements. Embedded elements are indexed
//! by id so lookups by checkup id avoid scanning every animal.

use crate::domain::model::{ObjectId, ID_FIELD};
use crate::storage::document::{document_id, ensure_id, Document, DocumentStore, StoreError};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Default)]
struct Collection {
    next_seq: u64,
    /// Insertion sequence -> document; iteration order is insertion order.
    documents: BTreeMap<u64, Document>,
    positions: HashMap<ObjectId, u64>,
    /// (array field, element id) -> owning document id.
    element_owners: HashMap<(String, ObjectId), ObjectId>,
}

impl Collection {
    fn get(&self, id: &ObjectId) -> Option<&Document> {
        self.positions.get(id).and_then(|seq| self.documents.get(seq))
    }

    fn get_mut(&mut self, id: &ObjectId) -> Option<&mut Document> {
        let seq = *self.positions.get(id)?;
        self.documents.get_mut(&seq)
    }

    fn index_elements(&mut self, owner: ObjectId, document: &Document) {
        for (field, value) in document {
            if let JsonValue::Array(items) = value {
                for item in items {
                    if let Some(element_id) = item.as_object().and_then(document_id) {
                        self.element_owners.insert((field.clone(), element_id), owner);
                    }
                }
            }
        }
    }

    fn unindex_owner(&mut self, owner: &ObjectId) {
        self.element_owners.retain(|_, o| o != owner);
    }
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn element_position(items: &[JsonValue], element_id: &ObjectId) -> Option<usize> {
    items
        .iter()
        .position(|item| item.as_object().and_then(document_id).as_ref() == Some(element_id))
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|c| c.documents.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|c| c.get(id)).cloned())
    }

    async fn find_by_element(
        &self,
        collection: &str,
        array_field: &str,
        element_id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(c) = collections.get(collection) else {
            return Ok(None);
        };
        let owner = c
            .element_owners
            .get(&(array_field.to_string(), *element_id))
            .copied();
        Ok(owner.and_then(|id| c.get(&id)).cloned())
    }

    async fn insert(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<ObjectId, StoreError> {
        let id = ensure_id(collection, &mut document)?;
        let mut collections = self.collections.write().await;
        let c = collections.entry(collection.to_string()).or_default();
        if c.positions.contains_key(&id) {
            return Err(StoreError::InvalidShape {
                collection: collection.to_string(),
                reason: format!("duplicate `_id` {}", id),
            });
        }
        let seq = c.next_seq;
        c.next_seq += 1;
        c.index_elements(id, &document);
        c.positions.insert(id, seq);
        c.documents.insert(seq, document);
        Ok(id)
    }

    async fn set_fields(
        &self,
        collection: &str,
        id: &ObjectId,
        mut fields: Document,
    ) -> Result<bool, StoreError> {
        fields.remove(ID_FIELD);
        let mut collections = self.collections.write().await;
        let Some(c) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let Some(document) = c.get_mut(id) else {
            return Ok(false);
        };
        document.extend(fields);
        let snapshot = document.clone();
        c.unindex_owner(id);
        c.index_elements(*id, &snapshot);
        Ok(true)
    }

    async fn push_element(
        &self,
        collection: &str,
        id: &ObjectId,
        array_field: &str,
        mut element: Document,
    ) -> Result<bool, StoreError> {
        let element_id = ensure_id(collection, &mut element)?;
        let mut collections = self.collections.write().await;
        let Some(c) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let Some(document) = c.get_mut(id) else {
            return Ok(false);
        };
        let slot = document
            .entry(array_field.to_string())
            .or_insert_with(|| JsonValue::Array(Vec::new()));
        let JsonValue::Array(items) = slot else {
            return Err(StoreError::InvalidShape {
                collection: collection.to_string(),
                reason: format!("`{}` is not an array", array_field),
            });
        };
        items.push(JsonValue::Object(element));
        c.element_owners
            .insert((array_field.to_string(), element_id), *id);
        Ok(true)
    }

    async fn set_element_fields(
        &self,
        collection: &str,
        array_field: &str,
        element_id: &ObjectId,
        mut fields: Document,
    ) -> Result<Option<ObjectId>, StoreError> {
        fields.remove(ID_FIELD);
        let mut collections = self.collections.write().await;
        let Some(c) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let key = (array_field.to_string(), *element_id);
        let Some(owner) = c.element_owners.get(&key).copied() else {
            return Ok(None);
        };
        let Some(JsonValue::Array(items)) = c.get_mut(&owner).and_then(|d| d.get_mut(array_field))
        else {
            return Ok(None);
        };
        let Some(pos) = element_position(items, element_id) else {
            return Ok(None);
        };
        if let JsonValue::Object(element) = &mut items[pos] {
            element.extend(fields);
        }
        Ok(Some(owner))
    }

    async fn pull_element(
        &self,
        collection: &str,
        array_field: &str,
        element_id: &ObjectId,
    ) -> Result<Option<ObjectId>, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(c) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let key = (array_field.to_string(), *element_id);
        let Some(owner) = c.element_owners.remove(&key) else {
            return Ok(None);
        };
        if let Some(JsonValue::Array(items)) =
            c.get_mut(&owner).and_then(|d| d.get_mut(array_field))
        {
            items.retain(|item| item.as_object().and_then(document_id).as_ref() != Some(element_id));
        }
        Ok(Some(owner))
    }

    async fn delete(&self, collection: &str, id: &ObjectId) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(c) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let Some(seq) = c.positions.remove(id) else {
            return Ok(false);
        };
        c.documents.remove(&seq);
        c.unindex_owner(id);
        Ok(true)
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|c| c.documents.len() as u64)
            .unwrap_or(0))
    }
}
