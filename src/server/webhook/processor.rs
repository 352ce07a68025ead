use super::models::{PushEventResponse, PushPayload};
use super::reporter::PushEventReporter;
use crate::db::models::{DockerImage, DockerRepository};
use crate::server::repository::RepositoryRegistry;
use crate::server::store::{ImageStore, StoreError, UniqueField};
use std::sync::Arc;

/// Floating tag that is re-pushed on every build and never recorded
pub const FLOATING_TAG: &str = "latest";

/// Terminal state of processing one push event
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// No repository is registered for the pushed path
    IgnoredUnregistered { repository: String },
    /// The pushed tag is the floating `latest` tag
    IgnoredLatest { repository: String },
    /// The canonical reference is already recorded
    Duplicate { image: String },
    /// A new image record was written
    Recorded(DockerImage),
}

impl PushOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PushOutcome::IgnoredUnregistered { .. } => "ignored-unregistered",
            PushOutcome::IgnoredLatest { .. } => "ignored-latest",
            PushOutcome::Duplicate { .. } => "duplicate",
            PushOutcome::Recorded(_) => "recorded",
        }
    }
}

impl From<&PushOutcome> for PushEventResponse {
    fn from(outcome: &PushOutcome) -> Self {
        let image = match outcome {
            PushOutcome::Duplicate { image } => Some(image.clone()),
            PushOutcome::Recorded(image) => Some(image.image.clone()),
            _ => None,
        };
        Self {
            outcome: outcome.as_str().to_string(),
            image,
        }
    }
}

/// Canonical image reference: `registry/repository:tag`
pub fn canonical_reference(repository: &DockerRepository, full_name: &str, tag: &str) -> String {
    format!("{}/{}:{}", repository.registry, full_name, tag)
}

/// Turns registry push notifications into image records.
///
/// Each call is independent. The image store's unique constraint makes the
/// lookup-then-insert sequence safe under concurrent deliveries: losing the
/// race ends in `Duplicate`, the same as a lookup hit.
pub struct PushEventProcessor {
    registry: RepositoryRegistry,
    images: Arc<dyn ImageStore>,
    reporter: Arc<dyn PushEventReporter>,
}

impl PushEventProcessor {
    pub fn new(
        registry: RepositoryRegistry,
        images: Arc<dyn ImageStore>,
        reporter: Arc<dyn PushEventReporter>,
    ) -> Self {
        Self {
            registry,
            images,
            reporter,
        }
    }

    /// Process one push event.
    ///
    /// Every outcome is a success; only storage failures return `Err`.
    pub async fn process(&self, payload: &PushPayload) -> Result<PushOutcome, StoreError> {
        let outcome = self.resolve(payload).await?;
        self.reporter.report(&outcome);
        Ok(outcome)
    }

    async fn resolve(&self, payload: &PushPayload) -> Result<PushOutcome, StoreError> {
        let full_name = &payload.repository.repo_full_name;
        let tag = &payload.push_data.tag;

        let Some(repository) = self.registry.find_by_repository_path(full_name).await? else {
            return Ok(PushOutcome::IgnoredUnregistered {
                repository: full_name.clone(),
            });
        };

        if tag == FLOATING_TAG {
            return Ok(PushOutcome::IgnoredLatest {
                repository: full_name.clone(),
            });
        }

        let image = canonical_reference(&repository, full_name, tag);

        if self.images.find_by_image(&image).await?.is_some() {
            return Ok(PushOutcome::Duplicate { image });
        }

        match self.images.insert(&image, repository.id).await {
            Ok(recorded) => Ok(PushOutcome::Recorded(recorded)),
            Err(StoreError::Conflict(UniqueField::Image)) => Ok(PushOutcome::Duplicate { image }),
            Err(e) => Err(e),
        }
    }
}
