//! The animal repository.
//!
//! This is the intermediary between the request handlers and the document
//! store. It is responsible for:
//! 1.  Validating animal input before any write.
//! 2.  Resolving type and vet references into write-time name snapshots.
//! 3.  Mapping `Animal` records to documents in the `animals` collection,
//!     including push/positional-update/pull of embedded checkups.

use crate::app::reference_lookup::ReferenceLookup;
use crate::domain::model::{
    Animal, AnimalInput, Checkup, CheckupInput, CheckupRecord, CollectionRecord, EntityKind,
    ObjectId, TypeSnapshot, CHECKUPS_FIELD,
};
use crate::domain::validation::validate_animal_input;
use crate::domain::{ShelterError, ShelterResult};
use crate::storage::document::{from_document, to_document, DocumentStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

const ANIMALS: &str = Animal::COLLECTION;

/// Document layout of a new animal; the store assigns `_id`.
#[derive(Serialize)]
struct NewAnimal<'a> {
    name: &'a str,
    breed: &'a str,
    age: &'a str,
    #[serde(rename = "type")]
    animal_type: TypeSnapshot,
    checkups: Vec<Checkup>,
}

/// Fields replaced by an animal update.
#[derive(Serialize)]
struct AnimalFields<'a> {
    name: &'a str,
    breed: &'a str,
    age: &'a str,
    #[serde(rename = "type")]
    animal_type: TypeSnapshot,
}

/// Fields replaced by a checkup update; the checkup keeps its `_id`.
#[derive(Serialize)]
struct CheckupFields<'a> {
    vet_id: ObjectId,
    vet_name: &'a str,
    diagnosis: &'a str,
    treatment: &'a str,
    date: chrono::NaiveDate,
}

#[derive(Clone)]
pub struct AnimalRepository {
    store: Arc<dyn DocumentStore>,
    references: ReferenceLookup,
}

impl AnimalRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let references = ReferenceLookup::new(store.clone());
        Self { store, references }
    }

    pub fn references(&self) -> &ReferenceLookup {
        &self.references
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub async fn list_animals(&self) -> ShelterResult<Vec<Animal>> {
        let documents = self.store.find_all(ANIMALS).await?;
        let animals = documents
            .into_iter()
            .map(|d| from_document(ANIMALS, d))
            .collect::<Result<Vec<Animal>, _>>()?;
        Ok(animals)
    }

    /// Validates, resolves the type snapshot and inserts an animal with no
    /// checkups. Nothing is written when validation fails.
    pub async fn create_animal(&self, input: &AnimalInput) -> ShelterResult<ObjectId> {
        let errors = validate_animal_input(&input.name, &input.breed, &input.age);
        if !errors.is_empty() {
            debug!(%errors, "rejected animal input");
            return Err(ShelterError::ValidationFailed(errors));
        }

        let animal_type = self.references.resolve_type(&input.type_id).await?;
        let record = NewAnimal {
            name: &input.name,
            breed: &input.breed,
            age: &input.age,
            animal_type: animal_type.snapshot(),
            checkups: Vec::new(),
        };
        let id = self.store.insert(ANIMALS, to_document(ANIMALS, &record)?).await?;
        info!(animal_id = %id, name = %input.name, "created animal");
        Ok(id)
    }

    pub async fn get_animal(&self, id: &ObjectId) -> ShelterResult<Animal> {
        let document = self
            .store
            .find_by_id(ANIMALS, id)
            .await?
            .ok_or_else(|| ShelterError::not_found(EntityKind::Animal, id))?;
        Ok(from_document(ANIMALS, document)?)
    }

    /// Replaces name, breed, age and type. Input goes through the same
    /// checks as creation and the type snapshot is taken again.
    pub async fn update_animal(&self, id: &ObjectId, input: &AnimalInput) -> ShelterResult<()> {
        let errors = validate_animal_input(&input.name, &input.breed, &input.age);
        if !errors.is_empty() {
            debug!(animal_id = %id, %errors, "rejected animal update");
            return Err(ShelterError::ValidationFailed(errors));
        }

        let animal_type = self.references.resolve_type(&input.type_id).await?;
        let fields = AnimalFields {
            name: &input.name,
            breed: &input.breed,
            age: &input.age,
            animal_type: animal_type.snapshot(),
        };
        let matched = self
            .store
            .set_fields(ANIMALS, id, to_document(ANIMALS, &fields)?)
            .await?;
        if !matched {
            return Err(ShelterError::not_found(EntityKind::Animal, id));
        }
        info!(animal_id = %id, "updated animal");
        Ok(())
    }

    /// Removes an animal with its checkups. Deleting a missing id is a no-op.
    pub async fn delete_animal(&self, id: &ObjectId) -> ShelterResult<bool> {
        let removed = self.store.delete(ANIMALS, id).await?;
        if removed {
            info!(animal_id = %id, "deleted animal");
        } else {
            debug!(animal_id = %id, "delete of missing animal ignored");
        }
        Ok(removed)
    }

    pub async fn list_checkups(&self, animal_id: &ObjectId) -> ShelterResult<Vec<Checkup>> {
        Ok(self.get_animal(animal_id).await?.checkups)
    }

    /// Appends a checkup to an animal and returns the new checkup's id.
    pub async fn add_checkup(
        &self,
        animal_id: &ObjectId,
        input: &CheckupInput,
    ) -> ShelterResult<ObjectId> {
        let vet = self.references.resolve_vet(&input.vet_id).await?;
        let checkup = Checkup {
            id: ObjectId::new(),
            vet_id: vet.id,
            vet_name: vet.name,
            diagnosis: input.diagnosis.clone(),
            treatment: input.treatment.clone(),
            date: input.date,
        };
        let matched = self
            .store
            .push_element(
                ANIMALS,
                animal_id,
                CHECKUPS_FIELD,
                to_document(ANIMALS, &checkup)?,
            )
            .await?;
        if !matched {
            return Err(ShelterError::not_found(EntityKind::Animal, animal_id));
        }
        info!(animal_id = %animal_id, checkup_id = %checkup.id, "added checkup");
        Ok(checkup.id)
    }

    /// Finds a checkup by its own id along with its owner's id and name.
    pub async fn get_checkup(&self, checkup_id: &ObjectId) -> ShelterResult<CheckupRecord> {
        let document = self
            .store
            .find_by_element(ANIMALS, CHECKUPS_FIELD, checkup_id)
            .await?
            .ok_or_else(|| ShelterError::not_found(EntityKind::Checkup, checkup_id))?;
        let animal: Animal = from_document(ANIMALS, document)?;
        let checkup = animal
            .checkups
            .into_iter()
            .find(|c| c.id == *checkup_id)
            .ok_or_else(|| ShelterError::not_found(EntityKind::Checkup, checkup_id))?;
        Ok(CheckupRecord {
            animal_id: animal.id,
            animal_name: animal.name,
            checkup,
        })
    }

    /// Rewrites a checkup in place and returns the owning animal's id.
    pub async fn update_checkup(
        &self,
        checkup_id: &ObjectId,
        input: &CheckupInput,
    ) -> ShelterResult<ObjectId> {
        let vet = self.references.resolve_vet(&input.vet_id).await?;
        let fields = CheckupFields {
            vet_id: vet.id,
            vet_name: &vet.name,
            diagnosis: &input.diagnosis,
            treatment: &input.treatment,
            date: input.date,
        };
        let owner = self
            .store
            .set_element_fields(
                ANIMALS,
                CHECKUPS_FIELD,
                checkup_id,
                to_document(ANIMALS, &fields)?,
            )
            .await?
            .ok_or_else(|| ShelterError::not_found(EntityKind::Checkup, checkup_id))?;
        info!(animal_id = %owner, checkup_id = %checkup_id, "updated checkup");
        Ok(owner)
    }

    /// Removes a checkup from its owner. Returns the owner's id when
    /// something was removed; a missing checkup is a no-op.
    pub async fn delete_checkup(&self, checkup_id: &ObjectId) -> ShelterResult<Option<ObjectId>> {
        let owner = self
            .store
            .pull_element(ANIMALS, CHECKUPS_FIELD, checkup_id)
            .await?;
        match owner {
            Some(animal_id) => info!(%animal_id, %checkup_id, "deleted checkup"),
            None => debug!(%checkup_id, "delete of missing checkup ignored"),
        }
        Ok(owner)
    }
}
