use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ReportCategory, ReportId, ReportStatus, Severity};
use super::filter::{DateRange, ReportFilter, StatusFilter};
use super::kpi::{CategoryRecency, DashboardWindow};
use super::page::PageRequest;
use super::query::ReportQuery;
use super::repository::{ReportRepository, RepositoryError};
use super::service::{ReportService, ReportServiceError};
use super::sort::{SortDirection, SortField, SortSpec};

/// Router builder exposing the report list, export, dashboard, and batch
/// triage endpoints.
pub fn report_router<R>(service: Arc<ReportService<R>>) -> Router
where
    R: ReportRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/reports",
            get(list_handler::<R>).post(submit_handler::<R>),
        )
        .route("/api/v1/reports/export", get(export_handler::<R>))
        .route("/api/v1/reports/status", post(set_status_handler::<R>))
        .route("/api/v1/reports/read", post(mark_read_handler::<R>))
        .route("/api/v1/reports/:report_id", delete(delete_handler::<R>))
        .route("/api/v1/dashboard/kpis", get(dashboard_handler::<R>))
        .with_state(service)
}

/// Raw query-string parameters of the list and export endpoints. `all` (or
/// omission) leaves a dimension unconstrained, matching the filter bar's
/// dropdown defaults.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportListParams {
    search: Option<String>,
    status: Option<String>,
    category: Option<String>,
    severity: Option<String>,
    neighborhood: Option<String>,
    from: Option<String>,
    to: Option<String>,
    #[serde(default)]
    unread: bool,
    sort: Option<String>,
    direction: Option<String>,
    page: Option<u32>,
    per_page: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct ParamError(String);

impl IntoResponse for ParamError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.0 });
        (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
    }
}

fn parse_day(field: &str, value: &str) -> Result<NaiveDate, ParamError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ParamError(format!("{field} must be formatted as YYYY-MM-DD")))
}

impl ReportListParams {
    fn filter(&self) -> Result<ReportFilter, ParamError> {
        let status = match self.status.as_deref() {
            None | Some("all") => StatusFilter::Any,
            Some("assigned") => StatusFilter::AssignedOnly,
            Some(raw) => ReportStatus::parse(raw)
                .map(StatusFilter::Is)
                .ok_or_else(|| ParamError(format!("unknown status filter: {raw}")))?,
        };

        let category = match self.category.as_deref() {
            None | Some("all") => None,
            Some(raw) => Some(
                ReportCategory::parse(raw)
                    .ok_or_else(|| ParamError(format!("unknown category: {raw}")))?,
            ),
        };

        let severity = match self.severity.as_deref() {
            None | Some("all") => None,
            Some(raw) => Some(
                raw.parse::<u8>()
                    .ok()
                    .and_then(Severity::new)
                    .ok_or_else(|| ParamError(format!("severity must be 1-5, got {raw}")))?,
            ),
        };

        let from = self
            .from
            .as_deref()
            .map(|raw| parse_day("from", raw))
            .transpose()?;
        let to = self
            .to
            .as_deref()
            .map(|raw| parse_day("to", raw))
            .transpose()?;

        Ok(ReportFilter {
            search: self.search.clone().filter(|s| !s.is_empty()),
            status,
            category,
            severity,
            neighborhood: self
                .neighborhood
                .clone()
                .filter(|n| !n.is_empty() && n != "all"),
            date_range: DateRange { from, to },
            unread_only: self.unread,
        })
    }

    fn into_query(self, default_per_page: usize) -> Result<ReportQuery, ParamError> {
        let filter = self.filter()?;

        let field = match self.sort.as_deref() {
            None => SortField::SubmittedAt,
            Some(raw) => SortField::parse(raw)
                .ok_or_else(|| ParamError(format!("unknown sort field: {raw}")))?,
        };
        let direction = match self.direction.as_deref() {
            None => {
                if self.sort.is_none() {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                }
            }
            Some(raw) => SortDirection::parse(raw)
                .ok_or_else(|| ParamError(format!("unknown sort direction: {raw}")))?,
        };

        Ok(ReportQuery {
            filter,
            sort: SortSpec { field, direction },
            page: PageRequest::new(
                self.page.unwrap_or(1),
                self.per_page.unwrap_or(default_per_page),
            ),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardParams {
    from: Option<String>,
    to: Option<String>,
    region: Option<String>,
    recency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchStatusRequest {
    report_ids: Vec<String>,
    status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchReadRequest {
    report_ids: Vec<String>,
}

fn service_error(error: ReportServiceError) -> Response {
    let status = match &error {
        ReportServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ReportServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    Query(params): Query<ReportListParams>,
) -> Response
where
    R: ReportRepository + 'static,
{
    let query = match params.into_query(service.defaults().default_per_page) {
        Ok(query) => query,
        Err(error) => return error.into_response(),
    };
    match service.query(&query) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn export_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    Query(params): Query<ReportListParams>,
) -> Response
where
    R: ReportRepository + 'static,
{
    let filter = match params.filter() {
        Ok(filter) => filter,
        Err(error) => return error.into_response(),
    };
    match service.export(&filter) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    Query(params): Query<DashboardParams>,
) -> Response
where
    R: ReportRepository + 'static,
{
    let from = match params.from.as_deref().map(|raw| parse_day("from", raw)) {
        Some(Err(error)) => return error.into_response(),
        Some(Ok(day)) => Some(day),
        None => None,
    };
    let to = match params.to.as_deref().map(|raw| parse_day("to", raw)) {
        Some(Err(error)) => return error.into_response(),
        Some(Ok(day)) => Some(day),
        None => None,
    };
    let recency = match params.recency.as_deref() {
        None => CategoryRecency::Last30Days,
        Some(raw) => match CategoryRecency::parse(raw) {
            Some(recency) => recency,
            None => {
                return ParamError(format!("unknown recency window: {raw}")).into_response()
            }
        },
    };

    let window = DashboardWindow {
        range: DateRange { from, to },
        region: params.region.filter(|r| !r.is_empty() && r != "all"),
    };

    match service.dashboard(&window, recency, Utc::now()) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    axum::Json(report): axum::Json<super::domain::Report>,
) -> Response
where
    R: ReportRepository + 'static,
{
    match service.submit(report) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn set_status_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    axum::Json(request): axum::Json<BatchStatusRequest>,
) -> Response
where
    R: ReportRepository + 'static,
{
    let Some(status) = ReportStatus::parse(&request.status) else {
        return ParamError(format!("unknown status: {}", request.status)).into_response();
    };
    let ids: Vec<ReportId> = request.report_ids.into_iter().map(ReportId).collect();
    match service.set_status(&ids, status) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn mark_read_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    axum::Json(request): axum::Json<BatchReadRequest>,
) -> Response
where
    R: ReportRepository + 'static,
{
    let ids: Vec<ReportId> = request.report_ids.into_iter().map(ReportId).collect();
    match service.mark_read(&ids) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<ReportService<R>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
{
    match service.remove(&ReportId(report_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error(error),
    }
}
