use crate::transport::http::handlers::common::{ok, shelter_error};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/api/animal-types",
    responses(
        (status = 200, description = "Animal types available for new animals", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_animal_types_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.repository.references().list_types().await {
        Ok(types) => ok(StatusCode::OK, serde_json::json!(types)).into_response(),
        Err(e) => shelter_error(e, None).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/vets",
    responses(
        (status = 200, description = "Vets available for checkups", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_vets_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.repository.references().list_vets().await {
        Ok(vets) => ok(StatusCode::OK, serde_json::json!(vets)).into_response(),
        Err(e) => shelter_error(e, None).into_response(),
    }
}
