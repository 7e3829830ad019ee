use axum::{
    routing::{get, post},
    Router,
};
use models::AppSettings;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;

/// Create the main application router with all API endpoints
pub fn create_router(default_settings: AppSettings) -> Router {
    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Reconciliation endpoints
        .route("/api/reconcile", post(handlers::reconcile_records))
        .route("/api/reconcile/latest", post(handlers::reconcile_latest))
        // Default settings for requests that carry none
        .with_state(Arc::new(default_settings))
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
