use super::processor::PushOutcome;

/// Receives the terminal outcome of every processed push event.
///
/// The processor calls `report` exactly once per successful call and never
/// for storage failures, which are returned to the caller instead.
pub trait PushEventReporter: Send + Sync {
    fn report(&self, outcome: &PushOutcome);
}

/// Reports outcomes as `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl PushEventReporter for TracingReporter {
    fn report(&self, outcome: &PushOutcome) {
        match outcome {
            PushOutcome::IgnoredUnregistered { repository } => {
                tracing::warn!(
                    repository = %repository,
                    "Ignoring push for unregistered repository"
                );
            }
            PushOutcome::IgnoredLatest { repository } => {
                tracing::warn!(
                    repository = %repository,
                    "Ignoring push of 'latest' tag"
                );
            }
            PushOutcome::Duplicate { image } => {
                tracing::info!(image = %image, "Image already recorded");
            }
            PushOutcome::Recorded(image) => {
                tracing::info!(
                    image = %image.image,
                    repository_id = %image.repository_id,
                    "Recorded image"
                );
            }
        }
    }
}
