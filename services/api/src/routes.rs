use crate::infra::AppState;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use urbanscope::assignment::coordination::{coordination_router, CoordinationBoard};
use urbanscope::assignment::{assignment_router, AssignmentService};
use urbanscope::interventions::{intervention_router, InterventionRepository};
use urbanscope::reports::{report_router, ReportRepository, ReportService};

/// Compose the domain routers with the operational endpoints.
pub(crate) fn civic_routes<R, I>(
    reports: Arc<ReportService<R>>,
    assignments: Arc<AssignmentService<R>>,
    interventions: Arc<I>,
    coordination: Arc<CoordinationBoard>,
) -> axum::Router
where
    R: ReportRepository + 'static,
    I: InterventionRepository + 'static,
{
    report_router(reports)
        .merge(assignment_router(assignments))
        .merge(intervention_router(interventions))
        .merge(coordination_router(coordination))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.readiness.load(std::sync::atomic::Ordering::Acquire) {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "starting" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    state.metrics.render()
}
