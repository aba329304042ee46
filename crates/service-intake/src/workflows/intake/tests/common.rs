use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use tokio::sync::Notify;

use crate::workflows::intake::{
    FieldValue, FormField, ServiceRequest, ServiceVariant, SessionRegistry, SubmissionError,
    SubmissionGateway, WizardState,
};

#[derive(Default)]
pub(super) struct MemoryGateway {
    requests: Mutex<Vec<ServiceRequest>>,
}

impl MemoryGateway {
    pub(super) fn requests(&self) -> Vec<ServiceRequest> {
        self.requests.lock().expect("gateway mutex poisoned").clone()
    }
}

#[async_trait]
impl SubmissionGateway for MemoryGateway {
    async fn submit(&self, request: ServiceRequest) -> Result<(), SubmissionError> {
        self.requests
            .lock()
            .expect("gateway mutex poisoned")
            .push(request);
        Ok(())
    }
}

/// Rejects every request while counting attempts.
#[derive(Default)]
pub(super) struct OfflineGateway {
    attempts: Mutex<usize>,
}

impl OfflineGateway {
    pub(super) fn attempts(&self) -> usize {
        *self.attempts.lock().expect("gateway mutex poisoned")
    }
}

#[async_trait]
impl SubmissionGateway for OfflineGateway {
    async fn submit(&self, _request: ServiceRequest) -> Result<(), SubmissionError> {
        *self.attempts.lock().expect("gateway mutex poisoned") += 1;
        Err(SubmissionError::Unavailable("database offline".to_string()))
    }
}

/// Holds every submission until `release` is called.
#[derive(Default)]
pub(super) struct HeldGateway {
    pub(super) entered: Notify,
    pub(super) release: Notify,
    inner: MemoryGateway,
}

impl HeldGateway {
    pub(super) fn requests(&self) -> Vec<ServiceRequest> {
        self.inner.requests()
    }
}

#[async_trait]
impl SubmissionGateway for HeldGateway {
    async fn submit(&self, request: ServiceRequest) -> Result<(), SubmissionError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.submit(request).await
    }
}

pub(super) fn text(value: &str) -> FieldValue {
    FieldValue::Text(value.to_string())
}

pub(super) fn choices(values: &[&str]) -> FieldValue {
    FieldValue::Choices(values.iter().map(|value| value.to_string()).collect())
}

pub(super) fn fill(state: WizardState, fields: &[(FormField, FieldValue)]) -> WizardState {
    fields.iter().fold(state, |state, (field, value)| {
        state
            .with_field(*field, value.clone())
            .expect("field accepts value")
    })
}

pub(super) fn selected(service: ServiceVariant) -> WizardState {
    WizardState::new()
        .select_service(service)
        .expect("selection allowed")
}

pub(super) fn moved(state: &WizardState) -> WizardState {
    match state.advance().expect("advance allowed") {
        crate::workflows::intake::Advance::Moved(next) => next,
        other => panic!("expected a move, got {other:?}"),
    }
}

pub(super) fn gas_at_contact() -> WizardState {
    let state = fill(
        selected(ServiceVariant::Gas),
        &[(FormField::BottleBrand, text("Total"))],
    );
    moved(&state)
}

pub(super) fn contact_filled(state: WizardState) -> WizardState {
    fill(
        state,
        &[
            (FormField::ContactName, text("Jean")),
            (FormField::ContactPhone, text("699000000")),
        ],
    )
}

pub(super) fn registry<G: SubmissionGateway + 'static>(gateway: G) -> Arc<SessionRegistry<G>> {
    Arc::new(SessionRegistry::new(Arc::new(gateway)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
