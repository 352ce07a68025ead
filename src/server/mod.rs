pub mod error;
pub mod middleware;
pub mod repository;
pub mod settings;
pub mod state;
pub mod store;
pub mod webhook;

use anyhow::Result;
use axum::Router;
use state::AppState;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Run the HTTP server until SIGINT/SIGTERM
pub async fn run_server(settings: settings::Settings) -> Result<()> {
    let state = AppState::new_for_server(&settings).await?;
    let app = build_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("HTTP server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Build the application router with all API routes nested under `/api/v1`
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/version", axum::routing::get(version_info))
        .merge(webhook::routes::routes())
        .merge(repository::routes::routes());

    Router::new()
        .nest("/api/v1", api_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(middleware::request_id_middleware)),
        )
}

async fn health_check() -> &'static str {
    "OK"
}

async fn version_info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Wait for a shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{DockerImage, DockerRepository};
    use crate::server::store::{ImageStore, MemoryStore, RepositoryStore, StoreError};
    use crate::server::webhook::TracingReporter;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`
    use uuid::Uuid;

    fn app_with(store: Arc<MemoryStore>) -> Router {
        build_router(AppState::from_stores(
            store.clone(),
            store,
            Arc::new(TracingReporter),
        ))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn push(full_name: &str, tag: &str) -> Value {
        json!({
            "push_data": { "digest": "sha256:abc", "pushed_at": "2026-01-01 00:00:00", "tag": tag },
            "repository": { "repo_full_name": full_name, "name": "app", "namespace": "org" }
        })
    }

    async fn create_app_repository(app: &Router) -> Value {
        let response = send(
            app,
            Method::POST,
            "/api/v1/docker-repositories",
            Some(json!({ "name": "app", "registry": "reg.example.com", "repository": "org/app" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await["repository"].clone()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let response = send(&app, Method::GET, "/api/v1/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_push_recorded_then_duplicate() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let repository = create_app_repository(&app).await;

        let first = send(
            &app,
            Method::POST,
            "/api/v1/docker-repositories/payload",
            Some(push("org/app", "v1.2.3")),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(
            json_body(first).await,
            json!({ "outcome": "recorded", "image": "reg.example.com/org/app:v1.2.3" })
        );

        let second = send(
            &app,
            Method::POST,
            "/api/v1/docker-repositories/payload",
            Some(push("org/app", "v1.2.3")),
        )
        .await;
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(json_body(second).await["outcome"], "duplicate");

        let uri = format!(
            "/api/v1/docker-repositories/{}/images",
            repository["id"].as_str().unwrap()
        );
        let images = json_body(send(&app, Method::GET, &uri, None).await).await;
        assert_eq!(images["images"].as_array().unwrap().len(), 1);
        assert_eq!(images["images"][0]["image"], "reg.example.com/org/app:v1.2.3");
    }

    #[tokio::test]
    async fn test_push_for_unregistered_repository_acknowledged() {
        let app = app_with(Arc::new(MemoryStore::new()));

        let response = send(
            &app,
            Method::POST,
            "/api/v1/docker-repositories/payload",
            Some(push("org/unknown", "v1")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "outcome": "ignored-unregistered" })
        );
    }

    #[tokio::test]
    async fn test_push_of_latest_acknowledged() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone());
        create_app_repository(&app).await;

        let response = send(
            &app,
            Method::POST,
            "/api/v1/docker-repositories/payload",
            Some(push("org/app", "latest")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["outcome"], "ignored-latest");
        assert!(store
            .find_by_image("reg.example.com/org/app:latest")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_malformed_push_rejected() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let response = send(
            &app,
            Method::POST,
            "/api/v1/docker-repositories/payload",
            Some(json!({ "repository": { "repo_full_name": "org/app" } })),
        )
        .await;
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_create_repository_conflicts_reported() {
        let app = app_with(Arc::new(MemoryStore::new()));
        create_app_repository(&app).await;

        let response = send(
            &app,
            Method::POST,
            "/api/v1/docker-repositories",
            Some(json!({ "name": "app", "registry": "reg.example.com", "repository": "org/app" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = json_body(response).await;
        let fields: Vec<_> = body["field_errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["name", "repository"]);

        let list = json_body(send(&app, Method::GET, "/api/v1/docker-repositories", None).await).await;
        assert_eq!(list["repositories"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_repository_validation() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let response = send(
            &app,
            Method::POST,
            "/api/v1/docker-repositories",
            Some(json!({ "name": "", "registry": "reg.example.com", "repository": "org/app" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["field_errors"][0]["field"], "name");
    }

    #[tokio::test]
    async fn test_delete_repository_is_idempotent() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let repository = create_app_repository(&app).await;
        let uri = format!(
            "/api/v1/docker-repositories/{}",
            repository["id"].as_str().unwrap()
        );

        let response = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let list = json_body(send(&app, Method::GET, "/api/v1/docker-repositories", None).await).await;
        assert!(list["repositories"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_repository_changes_nothing() {
        let app = app_with(Arc::new(MemoryStore::new()));
        create_app_repository(&app).await;

        let uri = format!("/api/v1/docker-repositories/{}", Uuid::new_v4());
        let response = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let list = json_body(send(&app, Method::GET, "/api/v1/docker-repositories", None).await).await;
        assert_eq!(list["repositories"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_invalid_id_is_bad_request() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let response = send(
            &app,
            Method::DELETE,
            "/api/v1/docker-repositories/not-a-uuid",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_images_of_unknown_repository_not_found() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let uri = format!("/api/v1/docker-repositories/{}/images", Uuid::new_v4());
        let response = send(&app, Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    struct UnavailableStore;

    fn unavailable() -> StoreError {
        StoreError::Unavailable(anyhow::anyhow!("connection refused"))
    }

    #[async_trait]
    impl RepositoryStore for UnavailableStore {
        async fn list(&self) -> Result<Vec<DockerRepository>, StoreError> {
            Err(unavailable())
        }

        async fn find_by_name_or_repository(
            &self,
            _name: &str,
            _repository: &str,
        ) -> Result<Vec<DockerRepository>, StoreError> {
            Err(unavailable())
        }

        async fn find_by_repository(
            &self,
            _repository: &str,
        ) -> Result<Option<DockerRepository>, StoreError> {
            Err(unavailable())
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<DockerRepository>, StoreError> {
            Err(unavailable())
        }

        async fn create(
            &self,
            _name: &str,
            _registry: &str,
            _repository: &str,
        ) -> Result<DockerRepository, StoreError> {
            Err(unavailable())
        }

        async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
            Err(unavailable())
        }
    }

    #[async_trait]
    impl ImageStore for UnavailableStore {
        async fn find_by_image(&self, _image: &str) -> Result<Option<DockerImage>, StoreError> {
            Err(unavailable())
        }

        async fn insert(
            &self,
            _image: &str,
            _repository_id: Uuid,
        ) -> Result<DockerImage, StoreError> {
            Err(unavailable())
        }

        async fn list_for_repository(
            &self,
            _repository_id: Uuid,
        ) -> Result<Vec<DockerImage>, StoreError> {
            Err(unavailable())
        }
    }

    #[tokio::test]
    async fn test_storage_failure_is_server_error() {
        let store = Arc::new(UnavailableStore);
        let app = build_router(AppState::from_stores(
            store.clone(),
            store,
            Arc::new(TracingReporter),
        ));

        let response = send(
            &app,
            Method::POST,
            "/api/v1/docker-repositories/payload",
            Some(push("org/app", "v1")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Failed to process push event" })
        );

        let response = send(&app, Method::GET, "/api/v1/docker-repositories", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
