//! Route table.

use crate::handlers;
use crate::{AppState, ServerConfig};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the application router.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/gallery", get(handlers::gallery))
        .route("/posts", post(handlers::create_posts))
        .route("/posts/:id/media", get(handlers::post_media))
        .route("/api/posts", get(handlers::list_posts))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
