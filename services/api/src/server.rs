use crate::cli::ServeArgs;
use crate::infra::{storage_gateway, AppState, InMemoryRequestStore};
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use service_intake::config::AppConfig;
use service_intake::error::AppError;
use service_intake::telemetry;
use service_intake::workflows::intake::SessionRegistry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = storage_gateway(&config.intake, InMemoryRequestStore::default());
    let registry = Arc::new(
        SessionRegistry::new(Arc::new(gateway)).with_idle_ttl(config.intake.session_idle_ttl),
    );
    let sweeper = registry.clone().spawn_sweeper(config.intake.sweep_interval());

    let app = with_intake_routes(registry)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        legacy_category_remap = config.intake.legacy_category_remap,
        session_idle_secs = config.intake.session_idle_ttl.as_secs(),
        "service intake ready"
    );

    let served = axum::serve(listener, app).await;
    sweeper.abort();
    served?;
    Ok(())
}
