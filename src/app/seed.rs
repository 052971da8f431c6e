//! Default reference data for a fresh database.

use crate::domain::model::{AnimalType, CollectionRecord, ObjectId, Vet};
use crate::storage::document::{to_document, DocumentStore, StoreError};

pub const DEFAULT_ANIMAL_TYPES: &[&str] = &["Dog", "Cat", "Bird", "Rodent"];

/// (name, address, license number)
pub const DEFAULT_VETS: &[(&str, &str, &str)] = &[
    ("Dr Chua", "Sunset Drive Lane 1 Blk 313 #01-01", "AX12345"),
    ("Dr Tan", "Ang Mio Kio Ave 4 Blk 221 #02-02", "DX45678"),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub animal_types_inserted: usize,
    pub vets_inserted: usize,
}

/// Inserts the default animal types and vets into collections that are
/// still empty. Collections that already hold documents are left alone.
pub async fn seed_reference_data(store: &dyn DocumentStore) -> Result<SeedReport, StoreError> {
    let mut report = SeedReport::default();

    if store.count(AnimalType::COLLECTION).await? == 0 {
        for name in DEFAULT_ANIMAL_TYPES {
            let record = AnimalType {
                id: ObjectId::new(),
                name: name.to_string(),
            };
            store
                .insert(AnimalType::COLLECTION, to_document(AnimalType::COLLECTION, &record)?)
                .await?;
            report.animal_types_inserted += 1;
        }
    }

    if store.count(Vet::COLLECTION).await? == 0 {
        for (name, address, license) in DEFAULT_VETS {
            let record = Vet {
                id: ObjectId::new(),
                name: name.to_string(),
                address: Some(address.to_string()),
                license_number: Some(license.to_string()),
            };
            store
                .insert(Vet::COLLECTION, to_document(Vet::COLLECTION, &record)?)
                .await?;
            report.vets_inserted += 1;
        }
    }

    Ok(report)
}
