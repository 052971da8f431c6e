use crate::transport::http::handlers::{animals, checkups, health, references};
use crate::transport::http::types::{AnimalRequest, ApiResponse, AppState, CheckupRequest};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        animals::list_animals_handler,
        animals::create_animal_handler,
        animals::get_animal_handler,
        animals::update_animal_handler,
        animals::delete_animal_handler,
        checkups::list_checkups_handler,
        checkups::add_checkup_handler,
        checkups::get_checkup_handler,
        checkups::update_checkup_handler,
        checkups::delete_checkup_handler,
        references::list_animal_types_handler,
        references::list_vets_handler
    ),
    components(schemas(ApiResponse, AnimalRequest, CheckupRequest))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/animals",
            get(animals::list_animals_handler).post(animals::create_animal_handler),
        )
        .route(
            "/api/animals/:animal_id",
            get(animals::get_animal_handler)
                .put(animals::update_animal_handler)
                .delete(animals::delete_animal_handler),
        )
        .route(
            "/api/animals/:animal_id/checkups",
            get(checkups::list_checkups_handler).post(checkups::add_checkup_handler),
        )
        .route(
            "/api/checkups/:checkup_id",
            get(checkups::get_checkup_handler)
                .put(checkups::update_checkup_handler)
                .delete(checkups::delete_checkup_handler),
        )
        .route("/api/animal-types", get(references::list_animal_types_handler))
        .route("/api/vets", get(references::list_vets_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
