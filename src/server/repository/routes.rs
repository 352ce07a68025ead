use super::handlers;
use crate::server::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/docker-repositories", get(handlers::list_repositories))
        .route("/docker-repositories", post(handlers::create_repository))
        .route(
            "/docker-repositories/{id}",
            delete(handlers::delete_repository),
        )
        .route(
            "/docker-repositories/{id}/images",
            get(handlers::list_images),
        )
}
