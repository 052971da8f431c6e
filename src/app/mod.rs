pub mod animal_repository;
pub mod reference_lookup;
pub mod seed;
