use super::common::{fixture_reports, seeded_service};
use crate::reports::filter::{ReportFilter, StatusFilter};
use crate::reports::query::ReportQuery;
use crate::reports::sort::{SortDirection, SortField};

#[test]
fn every_result_satisfies_all_active_predicates_and_nothing_else_does() {
    let reports = fixture_reports();
    let filter = ReportFilter {
        category: Some(crate::reports::domain::ReportCategory::HeatIsland),
        ..ReportFilter::default()
    };

    let matched: Vec<&str> = reports
        .iter()
        .filter(|r| filter.matches(r))
        .map(|r| r.id.0.as_str())
        .collect();
    assert_eq!(matched, vec!["rep-002", "rep-004"]);

    for report in &reports {
        let in_result = matched.contains(&report.id.0.as_str());
        assert_eq!(in_result, filter.matches(report));
    }
}

#[test]
fn assigned_filter_returns_exactly_the_assigned_reports() {
    let service = seeded_service();
    let query = ReportQuery::default().with_filter(ReportFilter {
        status: StatusFilter::AssignedOnly,
        ..ReportFilter::default()
    });
    let page = service.query(&query).expect("query succeeds");

    let mut ids: Vec<String> = page.items.into_iter().map(|view| view.id.0).collect();
    ids.sort();
    assert_eq!(ids, vec!["rep-001", "rep-003", "rep-005"]);
}

#[test]
fn severity_sort_through_the_service_matches_the_toggle_contract() {
    let service = seeded_service();

    let descending = ReportQuery::default()
        .sorted_by(SortField::Severity)
        .sorted_by(SortField::Severity);
    assert_eq!(descending.sort.direction, SortDirection::Descending);
    let page = service.query(&descending).expect("query succeeds");
    let severities: Vec<u8> = page.items.iter().map(|view| view.severity).collect();
    assert_eq!(severities, vec![5, 4, 3, 2, 1]);

    let ascending = descending.sorted_by(SortField::Severity);
    let page = service.query(&ascending).expect("query succeeds");
    let severities: Vec<u8> = page.items.iter().map(|view| view.severity).collect();
    assert_eq!(severities, vec![1, 2, 3, 4, 5]);
}

#[test]
fn pagination_counts_survive_the_view_mapping() {
    let service = seeded_service();
    let query = ReportQuery {
        page: crate::reports::page::PageRequest::new(2, 2),
        ..ReportQuery::default()
    };
    let page = service.query(&query).expect("query succeeds");
    assert_eq!(page.total, 5);
    assert_eq!(page.page_count, 3);
    assert_eq!(page.items.len(), 2);
}

#[test]
fn batch_status_update_skips_unknown_ids() {
    let service = seeded_service();
    let ids = vec![
        crate::reports::domain::ReportId("rep-002".to_string()),
        crate::reports::domain::ReportId("rep-999".to_string()),
    ];
    let updated = service
        .set_status(&ids, crate::reports::domain::ReportStatus::Resolved)
        .expect("batch update succeeds");
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].status_label, "Resolved");
}

#[test]
fn mark_read_flips_the_flag() {
    let service = seeded_service();
    let ids = vec![crate::reports::domain::ReportId("rep-004".to_string())];
    let updated = service.mark_read(&ids).expect("mark read succeeds");
    assert!(updated[0].read);

    let unread_query = ReportQuery::default().with_filter(ReportFilter {
        unread_only: true,
        ..ReportFilter::default()
    });
    let page = service.query(&unread_query).expect("query succeeds");
    assert!(page.items.iter().all(|view| view.id.0 != "rep-004"));
}
