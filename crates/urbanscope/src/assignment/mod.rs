//! Assignment queue for routing unassigned reports to departments, plus the
//! per-department workload summary the coordination page renders.

pub mod coordination;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::reports::domain::{Department, Report, ReportId, ReportStatus};
use crate::reports::repository::{ReportRepository, RepositoryError};
use crate::reports::views::ReportView;

/// Service pairing the report store with the known department roster.
pub struct AssignmentService<R> {
    repository: Arc<R>,
    departments: Vec<Department>,
}

impl<R> AssignmentService<R>
where
    R: ReportRepository + 'static,
{
    pub fn new(repository: Arc<R>, departments: Vec<Department>) -> Self {
        Self {
            repository,
            departments,
        }
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// Reports nobody has picked up yet, in collection order.
    pub fn queue(&self) -> Result<Vec<Report>, RepositoryError> {
        Ok(self
            .repository
            .all()?
            .into_iter()
            .filter(|report| !report.is_assigned())
            .collect())
    }

    /// Hand the selected reports to a department. Unknown report ids are
    /// skipped so a stale selection cannot fail the whole batch; an unknown
    /// department is an error.
    pub fn assign(
        &self,
        report_ids: &[ReportId],
        department_id: &str,
    ) -> Result<Vec<Report>, AssignmentError> {
        let department = self
            .departments
            .iter()
            .find(|department| department.id == department_id)
            .ok_or_else(|| AssignmentError::UnknownDepartment(department_id.to_string()))?;

        let mut updated = Vec::new();
        for id in report_ids {
            let Some(mut report) = self.repository.fetch(id)? else {
                continue;
            };
            report.assigned_to = Some(department.id.clone());
            updated.push(self.repository.update(report)?);
        }
        Ok(updated)
    }

    /// One row per department: open count from live assignments, the rest
    /// from the roster record.
    pub fn workload(&self) -> Result<Vec<DepartmentWorkload>, RepositoryError> {
        let reports = self.repository.all()?;
        Ok(self
            .departments
            .iter()
            .map(|department| {
                let open_reports = reports
                    .iter()
                    .filter(|report| {
                        report.assigned_to.as_deref() == Some(department.id.as_str())
                            && !matches!(
                                report.status,
                                ReportStatus::Resolved | ReportStatus::Rejected
                            )
                    })
                    .count();
                DepartmentWorkload {
                    department_id: department.id.clone(),
                    name: department.name.clone(),
                    member_count: department.member_count,
                    open_reports,
                    avg_resolution_hours: department.avg_resolution_hours,
                    performance_label: department.performance.label(),
                }
            })
            .collect())
    }
}

/// Error raised when routing reports to a department.
#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    #[error("unknown department: {0}")]
    UnknownDepartment(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Serialized workload row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentWorkload {
    pub department_id: String,
    pub name: String,
    pub member_count: u32,
    pub open_reports: usize,
    pub avg_resolution_hours: u32,
    pub performance_label: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentRequest {
    report_ids: Vec<String>,
    department_id: String,
}

/// Router builder for the assignment queue endpoints.
pub fn assignment_router<R>(service: Arc<AssignmentService<R>>) -> Router
where
    R: ReportRepository + 'static,
{
    Router::new()
        .route("/api/v1/assignments/queue", get(queue_handler::<R>))
        .route("/api/v1/assignments/workload", get(workload_handler::<R>))
        .route("/api/v1/assignments", post(assign_handler::<R>))
        .with_state(service)
}

pub(crate) async fn queue_handler<R>(
    State(service): State<Arc<AssignmentService<R>>>,
) -> Response
where
    R: ReportRepository + 'static,
{
    match service.queue() {
        Ok(reports) => {
            let views: Vec<ReportView> = reports.iter().map(Report::to_view).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn workload_handler<R>(
    State(service): State<Arc<AssignmentService<R>>>,
) -> Response
where
    R: ReportRepository + 'static,
{
    match service.workload() {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn assign_handler<R>(
    State(service): State<Arc<AssignmentService<R>>>,
    axum::Json(request): axum::Json<AssignmentRequest>,
) -> Response
where
    R: ReportRepository + 'static,
{
    let ids: Vec<ReportId> = request.report_ids.into_iter().map(ReportId).collect();
    match service.assign(&ids, &request.department_id) {
        Ok(reports) => {
            let views: Vec<ReportView> = reports.iter().map(Report::to_view).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(AssignmentError::UnknownDepartment(id)) => {
            let payload = json!({ "error": format!("unknown department: {id}") });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

fn internal_error(error: impl std::fmt::Display) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
