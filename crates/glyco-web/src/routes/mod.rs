//! HTTP routes for the web dashboard.

pub mod api;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Determine static file directory
    let static_dir = std::env::var("GLYCO_STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            manifest.join("static")
        });

    Router::new()
        // API routes
        .route("/api/schema", get(api::get_schema))
        .route("/api/predict", post(api::predict))
        .route("/api/health", get(api::health))
        // Static files (serve index.html as fallback)
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        // CORS for development
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
