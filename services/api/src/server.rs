use crate::cli::ServeArgs;
use crate::infra::{load_assets, AppState};
use crate::routes::with_session_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use smartintern::config::AppConfig;
use smartintern::error::AppError;
use smartintern::flows::{InMemorySessionStore, SessionService};
use smartintern::telemetry;
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

    let assets = load_assets(&config, None)?;
    let session_service = Arc::new(SessionService::new(
        InMemorySessionStore::with_limit(config.server.max_sessions),
        assets,
    ));

    let app = with_session_routes(session_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "smartintern onboarding service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
