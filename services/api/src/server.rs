use crate::cli::ServeArgs;
use crate::infra::{seed_sample_properties, AppState, InMemoryPropertyStore};
use crate::routes::with_readiness_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use estimate_readiness::config::AppConfig;
use estimate_readiness::error::AppError;
use estimate_readiness::readiness::{PropertyReadinessService, ReadinessBackend, ReadinessEngine};
use estimate_readiness::telemetry;
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

    let engine = ReadinessEngine::new(config.readiness.load_profiles()?);
    let backend = Arc::new(ReadinessBackend::select(
        engine.clone(),
        config.readiness.remote_url.as_deref(),
        config.readiness.remote_timeout,
    )?);
    info!(
        backend = backend.label(),
        profile_version = engine.profiles().version(),
        cache_capacity = config.readiness.cache_capacity,
        "readiness backend selected"
    );

    let store = Arc::new(InMemoryPropertyStore::default());
    let seeded = seed_sample_properties(&store)?;
    info!(seeded, "sample properties loaded");

    let service = Arc::new(PropertyReadinessService::new(
        store,
        backend.clone(),
        config.readiness.cache_capacity,
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        backend,
    };

    let app = with_readiness_routes(Arc::new(engine), service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "estimate readiness service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
