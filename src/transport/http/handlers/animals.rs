use crate::domain::model::{AnimalInput, EntityKind, ObjectId};
use crate::domain::validation::validate_animal_input;
use crate::domain::ShelterError;
use crate::transport::http::handlers::common::{body_id, ok, path_id, shelter_error, ApiError};
use crate::transport::http::types::{json_422, AnimalRequest, ApiResponse, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

const ANIMAL_BODY: &str = r#"{"name": "...", "breed": "...", "age": "...", "type_id": "..."}"#;

/// Builds the repository input. When `type_id` is malformed the form fields
/// are still checked, so their errors win over the 422.
fn animal_input(request: &AnimalRequest) -> Result<AnimalInput, ApiError> {
    let type_id = match body_id("type_id", &request.type_id) {
        Ok(id) => id,
        Err(unprocessable) => {
            let errors = validate_animal_input(&request.name, &request.breed, &request.age);
            if errors.is_empty() {
                return Err(unprocessable);
            }
            return Err(shelter_error(
                ShelterError::ValidationFailed(errors),
                Some(serde_json::json!(request)),
            ));
        }
    };
    Ok(AnimalInput {
        name: request.name.clone(),
        breed: request.breed.clone(),
        age: request.age.clone(),
        type_id,
    })
}

#[utoipa::path(
    get,
    path = "/api/animals",
    responses(
        (status = 200, description = "All animals with their checkups", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_animals_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.repository.list_animals().await {
        Ok(animals) => ok(StatusCode::OK, serde_json::json!(animals)).into_response(),
        Err(e) => shelter_error(e, None).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/animals",
    request_body = AnimalRequest,
    responses(
        (status = 201, description = "Animal created", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "Animal type not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_animal_handler(
    State(state): State<AppState>,
    request: Result<Json<AnimalRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, ANIMAL_BODY).into_response(),
    };
    let input = match animal_input(&request) {
        Ok(i) => i,
        Err(resp) => return resp.into_response(),
    };

    match state.repository.create_animal(&input).await {
        Ok(id) => ok(
            StatusCode::CREATED,
            serde_json::json!({ "id": id, "message": "New animal has been added" }),
        )
        .into_response(),
        Err(e) => shelter_error(e, Some(serde_json::json!(request))).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/animals/{animal_id}",
    params(
        ("animal_id" = String, Path, description = "Animal id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "The animal", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_animal_handler(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
) -> impl IntoResponse {
    let id = match path_id(EntityKind::Animal, &animal_id) {
        Ok(id) => id,
        Err(resp) => return resp.into_response(),
    };
    match state.repository.get_animal(&id).await {
        Ok(animal) => ok(StatusCode::OK, serde_json::json!(animal)).into_response(),
        Err(e) => shelter_error(e, None).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/animals/{animal_id}",
    params(
        ("animal_id" = String, Path, description = "Animal id (24 hex characters)")
    ),
    request_body = AnimalRequest,
    responses(
        (status = 200, description = "Animal updated", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "Animal or animal type not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_animal_handler(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
    request: Result<Json<AnimalRequest>, JsonRejection>,
) -> impl IntoResponse {
    let id = match path_id(EntityKind::Animal, &animal_id) {
        Ok(id) => id,
        Err(resp) => return resp.into_response(),
    };
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, ANIMAL_BODY).into_response(),
    };
    let input = match animal_input(&request) {
        Ok(i) => i,
        Err(resp) => return resp.into_response(),
    };

    match state.repository.update_animal(&id, &input).await {
        Ok(()) => ok(StatusCode::OK, serde_json::json!({ "id": id })).into_response(),
        Err(e) => shelter_error(e, Some(serde_json::json!(request))).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/animals/{animal_id}",
    params(
        ("animal_id" = String, Path, description = "Animal id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Animal removed, or it did not exist", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_animal_handler(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
) -> impl IntoResponse {
    // Unknown or malformed ids delete nothing.
    let Ok(id) = animal_id.parse::<ObjectId>() else {
        return ok(
            StatusCode::OK,
            serde_json::json!({ "id": animal_id, "deleted": false }),
        )
        .into_response();
    };
    match state.repository.delete_animal(&id).await {
        Ok(deleted) => ok(
            StatusCode::OK,
            serde_json::json!({ "id": id, "deleted": deleted }),
        )
        .into_response(),
        Err(e) => shelter_error(e, None).into_response(),
    }
}
