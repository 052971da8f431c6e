use crate::domain::model::{CheckupInput, EntityKind, ObjectId};
use crate::transport::http::handlers::common::{
    body_date, body_id, ok, path_id, shelter_error, ApiError,
};
use crate::transport::http::types::{json_422, ApiResponse, AppState, CheckupRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

const CHECKUP_BODY: &str =
    r#"{"diagnosis": "...", "treatment": "...", "date": "YYYY-MM-DD", "vet_id": "..."}"#;

fn checkup_input(request: &CheckupRequest) -> Result<CheckupInput, ApiError> {
    Ok(CheckupInput {
        diagnosis: request.diagnosis.clone(),
        treatment: request.treatment.clone(),
        date: body_date("date", &request.date)?,
        vet_id: body_id("vet_id", &request.vet_id)?,
    })
}

#[utoipa::path(
    get,
    path = "/api/animals/{animal_id}/checkups",
    params(
        ("animal_id" = String, Path, description = "Animal id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "The animal's checkups in the order they were added", body = ApiResponse),
        (status = 404, description = "Animal not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_checkups_handler(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
) -> impl IntoResponse {
    let id = match path_id(EntityKind::Animal, &animal_id) {
        Ok(id) => id,
        Err(resp) => return resp.into_response(),
    };
    match state.repository.list_checkups(&id).await {
        Ok(checkups) => ok(
            StatusCode::OK,
            serde_json::json!({ "animal_id": id, "checkups": checkups }),
        )
        .into_response(),
        Err(e) => shelter_error(e, None).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/animals/{animal_id}/checkups",
    params(
        ("animal_id" = String, Path, description = "Animal id (24 hex characters)")
    ),
    request_body = CheckupRequest,
    responses(
        (status = 201, description = "Checkup added", body = ApiResponse),
        (status = 404, description = "Animal or vet not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body, id or date)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn add_checkup_handler(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
    request: Result<Json<CheckupRequest>, JsonRejection>,
) -> impl IntoResponse {
    let animal_id = match path_id(EntityKind::Animal, &animal_id) {
        Ok(id) => id,
        Err(resp) => return resp.into_response(),
    };
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, CHECKUP_BODY).into_response(),
    };
    let input = match checkup_input(&request) {
        Ok(i) => i,
        Err(resp) => return resp.into_response(),
    };

    match state.repository.add_checkup(&animal_id, &input).await {
        Ok(id) => ok(
            StatusCode::CREATED,
            serde_json::json!({ "id": id, "animal_id": animal_id }),
        )
        .into_response(),
        Err(e) => shelter_error(e, Some(serde_json::json!(request))).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/checkups/{checkup_id}",
    params(
        ("checkup_id" = String, Path, description = "Checkup id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "The checkup with its animal's id and name", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_checkup_handler(
    State(state): State<AppState>,
    Path(checkup_id): Path<String>,
) -> impl IntoResponse {
    let id = match path_id(EntityKind::Checkup, &checkup_id) {
        Ok(id) => id,
        Err(resp) => return resp.into_response(),
    };
    match state.repository.get_checkup(&id).await {
        Ok(record) => ok(StatusCode::OK, serde_json::json!(record)).into_response(),
        Err(e) => shelter_error(e, None).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/checkups/{checkup_id}",
    params(
        ("checkup_id" = String, Path, description = "Checkup id (24 hex characters)")
    ),
    request_body = CheckupRequest,
    responses(
        (status = 200, description = "Checkup updated", body = ApiResponse),
        (status = 404, description = "Checkup or vet not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body, id or date)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_checkup_handler(
    State(state): State<AppState>,
    Path(checkup_id): Path<String>,
    request: Result<Json<CheckupRequest>, JsonRejection>,
) -> impl IntoResponse {
    let id = match path_id(EntityKind::Checkup, &checkup_id) {
        Ok(id) => id,
        Err(resp) => return resp.into_response(),
    };
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, CHECKUP_BODY).into_response(),
    };
    let input = match checkup_input(&request) {
        Ok(i) => i,
        Err(resp) => return resp.into_response(),
    };

    match state.repository.update_checkup(&id, &input).await {
        Ok(animal_id) => ok(
            StatusCode::OK,
            serde_json::json!({ "id": id, "animal_id": animal_id }),
        )
        .into_response(),
        Err(e) => shelter_error(e, Some(serde_json::json!(request))).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/checkups/{checkup_id}",
    params(
        ("checkup_id" = String, Path, description = "Checkup id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Checkup removed, or it did not exist", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_checkup_handler(
    State(state): State<AppState>,
    Path(checkup_id): Path<String>,
) -> impl IntoResponse {
    let Ok(id) = checkup_id.parse::<ObjectId>() else {
        return ok(
            StatusCode::OK,
            serde_json::json!({ "id": checkup_id, "animal_id": null, "deleted": false }),
        )
        .into_response();
    };
    match state.repository.delete_checkup(&id).await {
        Ok(animal_id) => ok(
            StatusCode::OK,
            serde_json::json!({
                "id": id,
                "animal_id": animal_id,
                "deleted": animal_id.is_some(),
            }),
        )
        .into_response(),
        Err(e) => shelter_error(e, None).into_response(),
    }
}
