use crate::server::{websocket_listener, AppState};
use axum::{routing::get, Router};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/endpoint", get(websocket_listener::handle_endpoint))
        .route("/monitor", get(websocket_listener::handle_monitor))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
