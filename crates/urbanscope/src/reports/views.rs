use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Neighborhood, Report, ReportCategory, ReportId, ReportStatus};
use super::kpi::{CategoryCount, KpiSnapshot};

/// Serialized shape of a report as list and table views consume it: the raw
/// enum values for machine use plus display labels beside them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub id: ReportId,
    pub title: String,
    pub category: ReportCategory,
    pub category_label: &'static str,
    pub status: ReportStatus,
    pub status_label: &'static str,
    pub severity: u8,
    pub region: String,
    pub location: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_hours: Option<u32>,
    pub read: bool,
}

impl Report {
    pub fn to_view(&self) -> ReportView {
        ReportView {
            id: self.id.clone(),
            title: self.title.clone(),
            category: self.category,
            category_label: self.category.label(),
            status: self.status,
            status_label: self.status.label(),
            severity: self.severity.get(),
            region: self.region.clone(),
            location: self.location.clone(),
            submitted_at: self.submitted_at,
            assigned_to: self.assigned_to.clone(),
            response_time_hours: self.response_time_hours,
            read: self.read,
        }
    }
}

/// Everything the dashboard page renders in one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub kpis: KpiSnapshot,
    pub top_categories: Vec<CategoryCount>,
    pub neighborhoods: Vec<Neighborhood>,
    pub recent_reports: Vec<ReportView>,
}
