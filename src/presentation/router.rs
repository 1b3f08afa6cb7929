// Route table for the blend service
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{create_blend, health_check, latest_blend, update_blend};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// JSON API under `/api`, the page and its assets from `public_dir` for
/// every other path.
pub fn build_router(state: Arc<AppState>, public_dir: &Path) -> Router {
    let api = Router::new()
        .route("/blend/latest", get(latest_blend))
        .route("/blend", post(create_blend))
        .route("/blend/:id", put(update_blend));

    Router::new()
        .route("/healthz", get(health_check))
        .nest("/api", api)
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
