//! Shared helpers for integration tests.

use animal_shelter::domain::model::ObjectId;
use animal_shelter::storage::document::{Document, DocumentStore, StoreError};
use async_trait::async_trait;

/// A store whose backend is gone: every call fails like a closed pool.
pub struct FailingStore;

fn unavailable<T>() -> Result<T, StoreError> {
    Err(StoreError::Database(sqlx::Error::PoolClosed))
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn ping(&self) -> Result<(), StoreError> {
        unavailable()
    }

    async fn find_all(&self, _collection: &str) -> Result<Vec<Document>, StoreError> {
        unavailable()
    }

    async fn find_by_id(
        &self,
        _collection: &str,
        _id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        unavailable()
    }

    async fn find_by_element(
        &self,
        _collection: &str,
        _array_field: &str,
        _element_id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        unavailable()
    }

    async fn insert(&self, _collection: &str, _document: Document) -> Result<ObjectId, StoreError> {
        unavailable()
    }

    async fn set_fields(
        &self,
        _collection: &str,
        _id: &ObjectId,
        _fields: Document,
    ) -> Result<bool, StoreError> {
        unavailable()
    }

    async fn push_element(
        &self,
        _collection: &str,
        _id: &ObjectId,
        _array_field: &str,
        _element: Document,
    ) -> Result<bool, StoreError> {
        unavailable()
    }

    async fn set_element_fields(
        &self,
        _collection: &str,
        _array_field: &str,
        _element_id: &ObjectId,
        _fields: Document,
    ) -> Result<Option<ObjectId>, StoreError> {
        unavailable()
    }

    async fn pull_element(
        &self,
        _collection: &str,
        _array_field: &str,
        _element_id: &ObjectId,
    ) -> Result<Option<ObjectId>, StoreError> {
        unavailable()
    }

    async fn delete(&self, _collection: &str, _id: &ObjectId) -> Result<bool, StoreError> {
        unavailable()
    }

    async fn count(&self, _collection: &str) -> Result<u64, StoreError> {
        unavailable()
    }
}
