use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryApplicationRepository, LoggingStatusNotifier};
use crate::routes::with_financing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use showroom::config::AppConfig;
use showroom::error::AppError;
use showroom::telemetry;
use showroom::workflows::financing::ApplicationStatusService;
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

    let repository = Arc::new(InMemoryApplicationRepository::default());
    let notifier = Arc::new(LoggingStatusNotifier::default());
    let status_service = Arc::new(ApplicationStatusService::new(repository, notifier));

    let app = with_financing_routes(status_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        swipe_distance = config.deck.gesture.distance_threshold,
        swipe_velocity = config.deck.gesture.velocity_threshold,
        "showroom api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
