use super::handlers;
use crate::server::state::AppState;
use axum::{routing::post, Router};

/// Registry webhook routes (unauthenticated)
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/docker-repositories/payload",
        post(handlers::receive_push),
    )
}
