pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route(
            "/extract",
            post(handlers::handle_extract).layer(DefaultBodyLimit::disable()),
        )
        .route("/download/:filename", get(handlers::handle_download))
        .with_state(state)
}
