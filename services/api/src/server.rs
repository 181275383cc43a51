use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRosterRepository};
use crate::routes::with_delegation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use team_delegation::config::AppConfig;
use team_delegation::delegation::DelegationService;
use team_delegation::error::AppError;
use team_delegation::telemetry;
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryRosterRepository::default());
    let service = Arc::new(DelegationService::new(repository, config.engine));

    let app = with_delegation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        capacity_weeks = config.engine.nominal_capacity_weeks,
        allow_overcommit = config.engine.allow_overcommit,
        "team delegation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
