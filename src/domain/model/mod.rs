//! Record types stored in the shelter's document collections.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod object_id;

pub use object_id::{InvalidObjectId, ObjectId};

/// Contract shared by every top-level record persisted as a document.
///
/// Each record names the collection it lives in and the key under which
/// the store keeps its identifier. The repository maps records to and
/// from documents through serde, so the record's field layout is the
/// document layout.
pub trait CollectionRecord: Serialize + DeserializeOwned + Send + Sync {
    /// Name of the collection holding this record.
    const COLLECTION: &'static str;

    /// Kind reported in `NotFound` errors.
    const KIND: EntityKind;

    fn id(&self) -> ObjectId;
}

/// Document key of the identifier, shared by records and embedded elements.
pub const ID_FIELD: &str = "_id";

/// Array field of an animal document holding its checkups.
pub const CHECKUPS_FIELD: &str = "checkups";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Animal,
    AnimalType,
    Vet,
    Checkup,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Animal => "animal",
            EntityKind::AnimalType => "animal type",
            EntityKind::Vet => "vet",
            EntityKind::Checkup => "checkup",
        };
        f.write_str(name)
    }
}

/// Snapshot of an animal type captured when the animal was last written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSnapshot {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub breed: String,
    /// Kept as entered; validated to be an integer of at least 1.
    pub age: String,
    #[serde(rename = "type")]
    pub animal_type: TypeSnapshot,
    #[serde(default)]
    pub checkups: Vec<Checkup>,
}

impl CollectionRecord for Animal {
    const COLLECTION: &'static str = "animals";
    const KIND: EntityKind = EntityKind::Animal;

    fn id(&self) -> ObjectId {
        self.id
    }
}

/// A veterinary checkup embedded in its animal's `checkups` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkup {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub vet_id: ObjectId,
    pub vet_name: String,
    pub diagnosis: String,
    pub treatment: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalType {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
}

impl AnimalType {
    pub fn snapshot(&self) -> TypeSnapshot {
        TypeSnapshot {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl CollectionRecord for AnimalType {
    const COLLECTION: &'static str = "animal_types";
    const KIND: EntityKind = EntityKind::AnimalType;

    fn id(&self) -> ObjectId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vet {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
}

impl CollectionRecord for Vet {
    const COLLECTION: &'static str = "vets";
    const KIND: EntityKind = EntityKind::Vet;

    fn id(&self) -> ObjectId {
        self.id
    }
}

/// Fields supplied when creating or updating an animal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalInput {
    pub name: String,
    pub breed: String,
    pub age: String,
    pub type_id: ObjectId,
}

/// Fields supplied when adding or updating a checkup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckupInput {
    pub diagnosis: String,
    pub treatment: String,
    pub date: NaiveDate,
    pub vet_id: ObjectId,
}

/// A checkup together with the name and id of the animal that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckupRecord {
    pub animal_id: ObjectId,
    pub animal_name: String,
    pub checkup: Checkup,
}
