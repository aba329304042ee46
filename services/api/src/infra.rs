use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use service_intake::config::IntakeConfig;
use service_intake::workflows::intake::{
    LegacyCategoryGateway, ServiceRequest, SubmissionError, SubmissionGateway,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Request as held by the in-memory store.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct StoredRequest {
    pub(crate) id: u64,
    pub(crate) received_at: DateTime<Utc>,
    #[serde(flatten)]
    pub(crate) request: ServiceRequest,
}

/// Stand-in for the hosted request table.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRequestStore {
    records: Arc<Mutex<Vec<StoredRequest>>>,
}

impl InMemoryRequestStore {
    pub(crate) fn records(&self) -> Vec<StoredRequest> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SubmissionGateway for InMemoryRequestStore {
    async fn submit(&self, request: ServiceRequest) -> Result<(), SubmissionError> {
        let mut guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let id = guard.len() as u64 + 1;
        info!(id, service = %request.service_type, "request stored");
        guard.push(StoredRequest {
            id,
            received_at: Utc::now(),
            request,
        });
        Ok(())
    }
}

pub(crate) type SharedGateway = Arc<dyn SubmissionGateway>;

/// Gateway the wizard submits to, with the legacy category shim when configured.
pub(crate) fn storage_gateway(config: &IntakeConfig, store: InMemoryRequestStore) -> SharedGateway {
    if config.legacy_category_remap {
        Arc::new(LegacyCategoryGateway::new(store))
    } else {
        Arc::new(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_intake::workflows::intake::{QuickOrder, ServiceVariant};

    fn renovation_order() -> QuickOrder {
        QuickOrder {
            nom: "Awa".to_string(),
            telephone: "677112233".to_string(),
            service: "moving".to_string(),
            description: "Peinture salon".to_string(),
            adresse: String::new(),
        }
    }

    #[tokio::test]
    async fn remap_is_applied_only_when_configured() {
        let store = InMemoryRequestStore::default();
        let legacy = storage_gateway(
            &IntakeConfig {
                legacy_category_remap: true,
                ..IntakeConfig::default()
            },
            store.clone(),
        );
        renovation_order()
            .submit(legacy.as_ref())
            .await
            .expect("stored");

        let direct = storage_gateway(
            &IntakeConfig {
                legacy_category_remap: false,
                ..IntakeConfig::default()
            },
            store.clone(),
        );
        renovation_order()
            .submit(direct.as_ref())
            .await
            .expect("stored");

        let records = store.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].request.service_type, ServiceVariant::Cleaning);
        assert_eq!(records[1].request.service_type, ServiceVariant::Moving);
    }

    #[tokio::test]
    async fn store_keeps_serving_after_a_poisoned_lock() {
        let store = InMemoryRequestStore::default();
        let records = store.records.clone();
        let _ = std::thread::spawn(move || {
            let _guard = records.lock().expect("first lock");
            panic!("writer crashed while holding the store");
        })
        .join();
        assert!(store.records.is_poisoned());

        renovation_order()
            .submit(&store)
            .await
            .expect("stored despite poisoning");
        assert_eq!(store.records().len(), 1);
    }
}
