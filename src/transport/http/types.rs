use crate::app::animal_repository::AnimalRepository;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub repository: AnimalRepository,
}

impl AppState {
    pub fn new(repository: AnimalRepository) -> Self {
        Self { repository }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>, data: Option<JsonValue>) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.into()),
        }
    }
}

/// Animal form fields. Identifiers and ages travel as text.
#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct AnimalRequest {
    pub name: String,
    pub breed: String,
    /// Whole number of years, at least 1 (e.g. `"5"`).
    pub age: String,
    /// Id of an existing animal type.
    pub type_id: String,
}

/// Checkup form fields.
#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct CheckupRequest {
    pub diagnosis: String,
    pub treatment: String,
    /// Calendar date as `YYYY-MM-DD`.
    pub date: String,
    /// Id of an existing vet.
    pub vet_id: String,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::failure(
            format!("Invalid JSON body: {} (expected: {})", err, expected),
            None,
        )),
    )
}
