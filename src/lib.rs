pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::animal_repository::AnimalRepository;
pub use app::reference_lookup::ReferenceLookup;
pub use domain::model::{Animal, AnimalInput, AnimalType, Checkup, CheckupInput, ObjectId, Vet};
pub use domain::{ShelterError, ShelterResult};
pub use storage::document::{DocumentStore, MemoryDocumentStore, PostgresDocumentStore};
