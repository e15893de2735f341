//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing,
//! body limit), and creates the axum router ready for serving.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.server.max_upload_bytes();

    let api_v1 = Router::new()
        .route(
            "/datasets",
            get(handlers::list_datasets).post(handlers::upload_dataset),
        )
        .route(
            "/datasets/{dataset_id}",
            get(handlers::get_dataset).delete(handlers::delete_dataset),
        )
        .route("/datasets/{dataset_id}/coverage", get(handlers::get_coverage))
        .route("/datasets/{dataset_id}/export", get(handlers::export_coverage));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(Arc::new(LocalRepository::new()), AppConfig::default());
        let _router = create_router(state);
    }
}
