use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::QueryConfig;

use super::domain::{Report, ReportId, ReportStatus};
use super::export;
use super::filter::ReportFilter;
use super::kpi::{self, CategoryRecency, DashboardWindow, KpiSnapshot};
use super::page::Page;
use super::query::{ReportQuery, ReportQueryEngine};
use super::repository::{ReportRepository, RepositoryError};
use super::views::{DashboardView, ReportView};

/// Service composing the repository and the query engine for list, export,
/// and dashboard consumers.
pub struct ReportService<R> {
    repository: Arc<R>,
    config: QueryConfig,
}

impl<R> ReportService<R>
where
    R: ReportRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: QueryConfig) -> Self {
        Self { repository, config }
    }

    pub fn defaults(&self) -> &QueryConfig {
        &self.config
    }

    /// Run the filter/sort/paginate pipeline over the current collection.
    pub fn query(&self, query: &ReportQuery) -> Result<Page<ReportView>, ReportServiceError> {
        let reports = self.repository.all()?;
        Ok(ReportQueryEngine::run(&reports, query).map(|report| report.to_view()))
    }

    /// CSV export of every report matching the filter, unpaginated.
    pub fn export(&self, filter: &ReportFilter) -> Result<Vec<u8>, ReportServiceError> {
        let matched: Vec<Report> = self
            .repository
            .all()?
            .into_iter()
            .filter(|report| filter.matches(report))
            .collect();
        Ok(export::csv_bytes(&matched)?)
    }

    /// KPI block, top categories, and recent feed for a dashboard window.
    pub fn dashboard(
        &self,
        window: &DashboardWindow,
        recency: CategoryRecency,
        now: DateTime<Utc>,
    ) -> Result<DashboardView, ReportServiceError> {
        let reports = self.repository.all()?;
        let kpis = KpiSnapshot::compute(&reports, window);

        let windowed: Vec<Report> = reports
            .into_iter()
            .filter(|report| window.contains(report))
            .collect();
        let top_categories = kpi::top_categories(&windowed, recency, now);
        let neighborhoods = kpi::neighborhood_overview(&windowed);
        let recent_reports = kpi::recent_feed(&windowed, window, self.config.recent_feed_size)
            .iter()
            .map(Report::to_view)
            .collect();

        Ok(DashboardView {
            kpis,
            top_categories,
            neighborhoods,
            recent_reports,
        })
    }

    /// File a new citizen report.
    pub fn submit(&self, report: Report) -> Result<ReportView, ReportServiceError> {
        Ok(self.repository.insert(report)?.to_view())
    }

    /// Batch status change from the admin toolbar. Unknown ids are skipped,
    /// matching how the toolbar operates on whatever is still selected.
    pub fn set_status(
        &self,
        ids: &[ReportId],
        status: ReportStatus,
    ) -> Result<Vec<ReportView>, ReportServiceError> {
        let mut updated = Vec::new();
        for id in ids {
            let Some(mut report) = self.repository.fetch(id)? else {
                continue;
            };
            report.status = status;
            updated.push(self.repository.update(report)?.to_view());
        }
        Ok(updated)
    }

    /// Batch read-marking for the notification-style treatment of reports.
    pub fn mark_read(&self, ids: &[ReportId]) -> Result<Vec<ReportView>, ReportServiceError> {
        let mut updated = Vec::new();
        for id in ids {
            let Some(mut report) = self.repository.fetch(id)? else {
                continue;
            };
            report.read = true;
            updated.push(self.repository.update(report)?.to_view());
        }
        Ok(updated)
    }

    pub fn remove(&self, id: &ReportId) -> Result<ReportView, ReportServiceError> {
        Ok(self.repository.delete(id)?.to_view())
    }
}

/// Error raised by the report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] export::ExportError),
}
