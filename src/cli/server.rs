use super::routes::{with_operational_routes, AppState};
use super::ServeArgs;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use case_study_desk::config::AppConfig;
use case_study_desk::error::AppError;
use case_study_desk::telemetry;
use case_study_desk::workflows::case_study::{case_study_router, DocumentRenderer, RequestLedger};
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let ledger = Arc::new(RequestLedger::new());
    let renderer = Arc::new(DocumentRenderer::new(config.institution.clone()));

    let app = with_operational_routes(case_study_router(ledger, renderer))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        institution = %config.institution.institution,
        "case study desk ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
