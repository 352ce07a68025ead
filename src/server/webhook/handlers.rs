use super::models::{PushEventResponse, PushPayload};
use crate::server::error::{ServerError, ServerErrorExt};
use crate::server::state::AppState;
use axum::{extract::State, Json};

/// Webhook called by the registry on every tag push.
///
/// Ignored and duplicate pushes are acknowledged with 200; only storage
/// failures return 500 so the registry retries delivery.
pub async fn receive_push(
    State(state): State<AppState>,
    Json(payload): Json<PushPayload>,
) -> Result<Json<PushEventResponse>, ServerError> {
    tracing::debug!(
        repository = %payload.repository.repo_full_name,
        tag = %payload.push_data.tag,
        "Received push event"
    );

    let outcome = state
        .push_processor
        .process(&payload)
        .await
        .internal_err("Failed to process push event")
        .map_err(|e| {
            e.with_context("repository", payload.repository.repo_full_name.clone())
                .with_context("tag", payload.push_data.tag.clone())
        })?;

    Ok(Json(PushEventResponse::from(&outcome)))
}
