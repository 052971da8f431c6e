//! Resolution of animal-type and vet references.
//!
//! Writes embed the referenced name as a snapshot, so every write resolves
//! its reference again; nothing is cached here.

use crate::domain::model::{AnimalType, CollectionRecord, ObjectId, Vet};
use crate::domain::{ShelterError, ShelterResult};
use crate::storage::document::{from_document, DocumentStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct ReferenceLookup {
    store: Arc<dyn DocumentStore>,
}

impl ReferenceLookup {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn resolve_type(&self, type_id: &ObjectId) -> ShelterResult<AnimalType> {
        self.resolve(type_id).await
    }

    pub async fn resolve_vet(&self, vet_id: &ObjectId) -> ShelterResult<Vet> {
        self.resolve(vet_id).await
    }

    pub async fn list_types(&self) -> ShelterResult<Vec<AnimalType>> {
        self.list().await
    }

    pub async fn list_vets(&self) -> ShelterResult<Vec<Vet>> {
        self.list().await
    }

    async fn resolve<T: CollectionRecord>(&self, id: &ObjectId) -> ShelterResult<T> {
        let document = self
            .store
            .find_by_id(T::COLLECTION, id)
            .await?
            .ok_or_else(|| ShelterError::not_found(T::KIND, id))?;
        Ok(from_document(T::COLLECTION, document)?)
    }

    async fn list<T: CollectionRecord>(&self) -> ShelterResult<Vec<T>> {
        let documents = self.store.find_all(T::COLLECTION).await?;
        let records = documents
            .into_iter()
            .map(|d| from_document(T::COLLECTION, d))
            .collect::<Result<Vec<T>, _>>()?;
        Ok(records)
    }
}
