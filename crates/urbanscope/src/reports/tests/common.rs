use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::config::QueryConfig;
use crate::reports::domain::{
    Coordinates, Report, ReportCategory, ReportId, ReportStatus, Severity,
};
use crate::reports::repository::InMemoryReportStore;
use crate::reports::service::ReportService;

pub(super) fn base_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) struct ReportSpec {
    pub id: &'static str,
    pub category: ReportCategory,
    pub severity: u8,
    pub status: ReportStatus,
    pub region: &'static str,
    pub days_after_base: i64,
    pub assigned_to: Option<&'static str>,
    pub response_time_hours: Option<u32>,
}

impl ReportSpec {
    pub fn build(&self) -> Report {
        Report {
            id: ReportId(self.id.to_string()),
            title: format!("{} at {}", self.category.label(), self.region),
            description: None,
            category: self.category,
            severity: Severity::new(self.severity).expect("valid severity"),
            status: self.status,
            location: format!("{} site", self.region),
            region: self.region.to_string(),
            coordinates: Coordinates {
                lat: -23.55,
                lng: -46.63,
            },
            submitted_at: base_instant() + Duration::days(self.days_after_base),
            assigned_to: self.assigned_to.map(str::to_string),
            response_time_hours: self.response_time_hours,
            read: false,
        }
    }
}

pub(super) fn fixture_reports() -> Vec<Report> {
    let specs = [
        ReportSpec {
            id: "rep-001",
            category: ReportCategory::BrokenSidewalk,
            severity: 3,
            status: ReportStatus::Resolved,
            region: "Centro",
            days_after_base: 0,
            assigned_to: Some("dept-roads"),
            response_time_hours: Some(24),
        },
        ReportSpec {
            id: "rep-002",
            category: ReportCategory::HeatIsland,
            severity: 4,
            status: ReportStatus::Pending,
            region: "Centro",
            days_after_base: 1,
            assigned_to: None,
            response_time_hours: None,
        },
        ReportSpec {
            id: "rep-003",
            category: ReportCategory::Flooding,
            severity: 5,
            status: ReportStatus::InProgress,
            region: "Zona Norte",
            days_after_base: 2,
            assigned_to: Some("dept-drainage"),
            response_time_hours: Some(48),
        },
        ReportSpec {
            id: "rep-004",
            category: ReportCategory::HeatIsland,
            severity: 2,
            status: ReportStatus::Pending,
            region: "Zona Sul",
            days_after_base: 3,
            assigned_to: None,
            response_time_hours: None,
        },
        ReportSpec {
            id: "rep-005",
            category: ReportCategory::MissingRamp,
            severity: 1,
            status: ReportStatus::Rejected,
            region: "Centro",
            days_after_base: 4,
            assigned_to: Some("dept-accessibility"),
            response_time_hours: Some(12),
        },
    ];
    specs.iter().map(ReportSpec::build).collect()
}

pub(super) fn seeded_service() -> Arc<ReportService<InMemoryReportStore>> {
    let store = Arc::new(InMemoryReportStore::seeded(fixture_reports()));
    Arc::new(ReportService::new(store, QueryConfig::default()))
}
