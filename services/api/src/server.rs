use crate::cli::ServeArgs;
use crate::demo::{
    sample_communications, sample_departments, sample_interventions, sample_reports,
    sample_resources,
};
use crate::infra::AppState;
use crate::routes::civic_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use urbanscope::assignment::coordination::CoordinationBoard;
use urbanscope::assignment::AssignmentService;
use urbanscope::config::AppConfig;
use urbanscope::error::AppError;
use urbanscope::interventions::InMemoryInterventionStore;
use urbanscope::reports::{InMemoryReportStore, ReportService};
use urbanscope::telemetry;

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

    // Seeded in-memory stores stand in for the not-yet-built persistence
    // layer; every triage action operates on this collection.
    let report_store = Arc::new(InMemoryReportStore::seeded(sample_reports()));
    let intervention_store = Arc::new(InMemoryInterventionStore::seeded(sample_interventions()));
    let report_service = Arc::new(ReportService::new(
        report_store.clone(),
        config.query.clone(),
    ));
    let assignment_service = Arc::new(AssignmentService::new(
        report_store,
        sample_departments(),
    ));
    let coordination_board = Arc::new(CoordinationBoard::seeded(
        sample_communications(),
        sample_resources(),
    ));

    let app = civic_routes(
        report_service,
        assignment_service,
        intervention_store,
        coordination_board,
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "civic report desk ready");

    axum::serve(listener, app).await?;
    Ok(())
}
