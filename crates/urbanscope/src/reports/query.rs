use super::domain::Report;
use super::filter::ReportFilter;
use super::page::{Page, PageRequest};
use super::sort::{SortField, SortSpec};

/// Filter, ordering, and page selection bundled the way a list view holds
/// them between interactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportQuery {
    pub filter: ReportFilter,
    pub sort: SortSpec,
    pub page: PageRequest,
}

impl ReportQuery {
    /// Replacing the filter snaps back to the first page, mirroring the
    /// list view resetting its pager on any filter edit.
    pub fn with_filter(mut self, filter: ReportFilter) -> Self {
        self.filter = filter;
        self.page.page = 1;
        self
    }

    pub fn sorted_by(mut self, field: SortField) -> Self {
        self.sort = self.sort.toggle(field);
        self
    }

    pub fn at_page(mut self, page: u32) -> Self {
        self.page.page = page.max(1);
        self
    }
}

/// Turns a full report collection into the slice a view needs: filter,
/// stable sort, then paginate. Never fails; malformed optional fields are
/// treated as absent by the predicates.
pub struct ReportQueryEngine;

impl ReportQueryEngine {
    pub fn run(reports: &[Report], query: &ReportQuery) -> Page<Report> {
        let mut matched: Vec<Report> = reports
            .iter()
            .filter(|report| query.filter.matches(report))
            .cloned()
            .collect();
        query.sort.apply(&mut matched);
        Page::from_collection(matched, query.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::domain::{
        Coordinates, ReportCategory, ReportId, ReportStatus, Severity,
    };
    use crate::reports::filter::StatusFilter;
    use chrono::{Duration, TimeZone, Utc};

    fn report(id: u32, status: ReportStatus) -> Report {
        let base = Utc
            .with_ymd_and_hms(2025, 5, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp");
        Report {
            id: ReportId(format!("rep-{id:03}")),
            title: format!("Report {id}"),
            description: None,
            category: ReportCategory::Flooding,
            severity: Severity::new(1 + (id % 5) as u8).expect("valid severity"),
            status,
            location: String::new(),
            region: "Centro".to_string(),
            coordinates: Coordinates { lat: 0.0, lng: 0.0 },
            submitted_at: base + Duration::hours(id as i64),
            assigned_to: None,
            response_time_hours: None,
            read: false,
        }
    }

    #[test]
    fn result_contains_exactly_the_matching_reports() {
        let reports: Vec<Report> = (0..8)
            .map(|n| {
                report(
                    n,
                    if n % 2 == 0 {
                        ReportStatus::Pending
                    } else {
                        ReportStatus::Resolved
                    },
                )
            })
            .collect();

        let query = ReportQuery::default().with_filter(ReportFilter {
            status: StatusFilter::Is(ReportStatus::Resolved),
            ..ReportFilter::default()
        });
        let page = ReportQueryEngine::run(&reports, &query);

        assert_eq!(page.total, 4);
        assert!(page
            .items
            .iter()
            .all(|r| r.status == ReportStatus::Resolved));
    }

    #[test]
    fn default_ordering_is_newest_first() {
        let reports: Vec<Report> = (0..3).map(|n| report(n, ReportStatus::Pending)).collect();
        let page = ReportQueryEngine::run(&reports, &ReportQuery::default());
        assert_eq!(page.items[0].id.0, "rep-002");
        assert_eq!(page.items[2].id.0, "rep-000");
    }

    #[test]
    fn filter_change_resets_to_first_page() {
        let query = ReportQuery::default().at_page(3);
        assert_eq!(query.page.page, 3);
        let query = query.with_filter(ReportFilter::default());
        assert_eq!(query.page.page, 1);
    }
}
