//! Citizen report domain: records, the filter/sort/paginate query engine,
//! dashboard aggregation, storage, CSV export, and the HTTP surface.

pub mod domain;
pub mod export;
pub mod filter;
pub mod kpi;
pub mod page;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;
pub mod sort;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Coordinates, Department, DepartmentPerformance, Neighborhood, Report, ReportCategory,
    ReportId, ReportStatus, Severity,
};
pub use export::{csv_bytes, write_csv, ExportError};
pub use filter::{DateRange, ReportFilter, StatusFilter};
pub use kpi::{
    neighborhood_overview, recent_feed, top_categories, CategoryCount, CategoryRecency,
    DashboardWindow, KpiSnapshot, ReportTotals,
};
pub use page::{Page, PageRequest};
pub use query::{ReportQuery, ReportQueryEngine};
pub use repository::{InMemoryReportStore, ReportRepository, RepositoryError};
pub use router::report_router;
pub use service::{ReportService, ReportServiceError};
pub use sort::{SortDirection, SortField, SortSpec};
pub use views::{DashboardView, ReportView};
