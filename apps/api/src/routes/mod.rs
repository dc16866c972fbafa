pub mod health;
pub mod request_id;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::answer::handlers;
use crate::state::AppState;

/// Uploaded supporting documents can be larger than axum's 2 MB default.
const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/invoke", post(handlers::handle_invoke))
        .route("/api/v1/answers", post(handlers::handle_answer))
        .route(
            "/api/v1/answers/upload",
            post(handlers::handle_upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}
