use crate::domain::model::EntityKind;
use crate::domain::validation::ValidationErrors;
use crate::storage::document::StoreError;

/// Failures surfaced by the repository and reference lookups.
#[derive(Debug, thiserror::Error)]
pub enum ShelterError {
    #[error("validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("document store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl ShelterError {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        ShelterError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ShelterError::NotFound { .. })
    }
}

pub type ShelterResult<T> = Result<T, ShelterError>;
