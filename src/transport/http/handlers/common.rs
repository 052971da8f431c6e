use crate::domain::model::{EntityKind, ObjectId};
use crate::domain::ShelterError;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde_json::Value as JsonValue;
use tracing::error;

pub type ApiError = (StatusCode, Json<ApiResponse>);

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn ok(status: StatusCode, data: JsonValue) -> (StatusCode, Json<ApiResponse>) {
    (status, Json(ApiResponse::ok(data)))
}

/// Maps a repository failure to a response.
///
/// `previous_values` is echoed back on validation failures so the caller can
/// re-display the submitted form.
pub fn shelter_error(err: ShelterError, previous_values: Option<JsonValue>) -> ApiError {
    match err {
        ShelterError::ValidationFailed(errors) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::failure(
                "Validation failed",
                Some(serde_json::json!({
                    "errors": errors,
                    "previous_values": previous_values,
                })),
            )),
        ),
        ShelterError::NotFound { kind, id } => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::failure(
                format!("{} '{}' not found", kind, id),
                Some(serde_json::json!({ "kind": kind, "id": id })),
            )),
        ),
        ShelterError::StoreUnavailable(e) => {
            error!(error = %e, "document store call failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure(format!("Document store error: {}", e), None)),
            )
        }
    }
}

/// Parses an id taken from the URL. Malformed text cannot name any stored
/// document, so it is reported as not found.
pub fn path_id(kind: EntityKind, raw: &str) -> Result<ObjectId, ApiError> {
    raw.parse().map_err(|_| {
        shelter_error(ShelterError::not_found(kind, raw), None)
    })
}

/// Parses an id submitted in a request body.
pub fn body_id(field: &str, raw: &str) -> Result<ObjectId, ApiError> {
    raw.parse().map_err(|_| unprocessable(field, format!("'{}' is not a valid id", raw)))
}

pub fn body_date(field: &str, raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| unprocessable(field, format!("'{}' is not a YYYY-MM-DD date", raw)))
}

fn unprocessable(field: &str, message: String) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::failure(
            format!("Invalid field '{}': {}", field, message),
            Some(serde_json::json!({ "field": field })),
        )),
    )
}
