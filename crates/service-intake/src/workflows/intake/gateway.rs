use std::sync::Arc;

use async_trait::async_trait;

use super::catalog::ServiceVariant;
use super::composer::ServiceRequest;

/// Storage boundary that durably records a composed request.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, request: ServiceRequest) -> Result<(), SubmissionError>;
}

#[async_trait]
impl<G> SubmissionGateway for Arc<G>
where
    G: SubmissionGateway + ?Sized,
{
    async fn submit(&self, request: ServiceRequest) -> Result<(), SubmissionError> {
        (**self).submit(request).await
    }
}

/// Failure reported by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl SubmissionError {
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected(message) | Self::Unavailable(message) => message,
        }
    }
}

/// Category the legacy request table accepts for `service`.
///
/// The table predates moving/renovation and only admits the original categories, so moving
/// requests are filed under cleaning.
pub const fn legacy_storage_category(service: ServiceVariant) -> ServiceVariant {
    match service {
        ServiceVariant::Moving => ServiceVariant::Cleaning,
        other => other,
    }
}

/// Gateway adapter applying [`legacy_storage_category`] before forwarding.
#[derive(Debug, Clone)]
pub struct LegacyCategoryGateway<G> {
    inner: G,
}

impl<G> LegacyCategoryGateway<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<G> SubmissionGateway for LegacyCategoryGateway<G>
where
    G: SubmissionGateway,
{
    async fn submit(&self, mut request: ServiceRequest) -> Result<(), SubmissionError> {
        let category = legacy_storage_category(request.service_type);
        if category != request.service_type {
            tracing::debug!(
                from = %request.service_type,
                to = %category,
                "remapping service type for storage"
            );
            request.service_type = category;
        }
        self.inner.submit(request).await
    }
}
