//! Short order form that bypasses the wizard and files a general request directly.

use serde::{Deserialize, Serialize};

use super::catalog::ServiceVariant;
use super::composer::{RequestPayload, RequestStatus, ServiceRequest};
use super::gateway::{SubmissionError, SubmissionGateway};

pub const QUICK_ORDER_KIND: &str = "commande_generale";

/// Fields captured by the quick-order modal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickOrder {
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub adresse: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickOrderPayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub nom: String,
    pub telephone: String,
    pub service_demande: String,
    pub description: String,
    pub adresse: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuickOrderError {
    #[error("please enter your name")]
    MissingName,
    #[error("please enter your phone number")]
    MissingPhone,
    #[error("please choose a service")]
    MissingService,
    #[error("please describe your request")]
    MissingDescription,
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl QuickOrderError {
    /// Wire name of the offending field, if the error is a validation failure.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingName => Some("nom"),
            Self::MissingPhone => Some("telephone"),
            Self::MissingService => Some("service"),
            Self::MissingDescription => Some("description"),
            Self::Submission(_) => None,
        }
    }
}

impl QuickOrder {
    pub fn validate(&self) -> Result<(), QuickOrderError> {
        if self.nom.is_empty() {
            return Err(QuickOrderError::MissingName);
        }
        if self.telephone.is_empty() {
            return Err(QuickOrderError::MissingPhone);
        }
        if self.service.is_empty() {
            return Err(QuickOrderError::MissingService);
        }
        if self.description.is_empty() {
            return Err(QuickOrderError::MissingDescription);
        }
        Ok(())
    }

    /// Requested services outside the catalog are filed as `other`.
    pub fn service_type(&self) -> ServiceVariant {
        ServiceVariant::from_id(&self.service).unwrap_or(ServiceVariant::Other)
    }

    pub fn compose(&self) -> ServiceRequest {
        ServiceRequest {
            service_type: self.service_type(),
            payload: RequestPayload::QuickOrder(QuickOrderPayload {
                kind: QUICK_ORDER_KIND,
                nom: self.nom.clone(),
                telephone: self.telephone.clone(),
                service_demande: self.service.clone(),
                description: self.description.clone(),
                adresse: self.adresse.clone(),
            }),
            contact_name: self.nom.clone(),
            contact_phone: self.telephone.clone(),
            status: RequestStatus::New,
        }
    }

    /// Validate, compose and hand the order to `gateway`.
    pub async fn submit<G>(&self, gateway: &G) -> Result<ServiceRequest, QuickOrderError>
    where
        G: SubmissionGateway + ?Sized,
    {
        self.validate()?;
        let request = self.compose();
        gateway.submit(request.clone()).await?;
        tracing::info!(service = %request.service_type, "quick order submitted");
        Ok(request)
    }
}
