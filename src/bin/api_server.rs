// src/bin/api_server.rs

use animal_shelter::infra::{telemetry, Config};
use animal_shelter::{transport, AnimalRepository, PostgresDocumentStore};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();
    let config = Config::from_env()?;

    // --- Store Initialization ---
    info!("connecting to document store");
    let store = PostgresDocumentStore::connect(&config.database_url, config.max_connections).await?;
    store.ensure_schema().await?;

    let repository = AnimalRepository::new(Arc::new(store.clone()));
    let app_state = transport::http::AppState::new(repository);

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "API server listening");
    info!("Swagger UI available at /swagger-ui");

    let served = tokio::select! {
        result = axum::serve(listener, app) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            Ok(())
        }
    };

    store.close().await;
    if let Err(e) = &served {
        error!(error = %e, "server stopped with an error");
    }
    served?;
    Ok(())
}
