use serde::{Deserialize, Serialize};

/// Push notification sent by the container registry.
///
/// Only the fields used for ingestion are modelled; anything else in the
/// body is accepted and ignored.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PushPayload {
    pub repository: PayloadRepository,
    pub push_data: PushData,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PayloadRepository {
    /// Fully-qualified repository path, e.g. "org/app"
    pub repo_full_name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PushData {
    pub tag: String,
}

/// Response body for the webhook endpoint
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PushEventResponse {
    /// One of `recorded`, `duplicate`, `ignored-latest`, `ignored-unregistered`
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
