use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Neighborhood, Report, ReportCategory, ReportStatus};
use super::filter::DateRange;

/// The slice of the collection a dashboard aggregates over: a date range
/// plus an optional region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardWindow {
    pub range: DateRange,
    pub region: Option<String>,
}

impl DashboardWindow {
    pub fn contains(&self, report: &Report) -> bool {
        self.range.contains(report.submitted_at)
            && self
                .region
                .as_ref()
                .map_or(true, |region| &report.region == region)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    pub current: usize,
    pub all_time: usize,
}

/// Headline numbers on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub total_reports: ReportTotals,
    pub resolved_percentage: u32,
    pub avg_response_hours: u32,
    pub active_interventions: usize,
}

impl KpiSnapshot {
    /// Aggregates over the windowed subset; `all_time` counts the whole
    /// collection. Empty windows and missing response times produce zeros
    /// rather than errors, matching the dashboard's historical behavior of
    /// collapsing "no data" and "zero" into the same display value.
    pub fn compute(reports: &[Report], window: &DashboardWindow) -> Self {
        let windowed: Vec<&Report> = reports
            .iter()
            .filter(|report| window.contains(report))
            .collect();
        let current = windowed.len();

        let resolved = windowed
            .iter()
            .filter(|report| report.status == ReportStatus::Resolved)
            .count();
        let resolved_percentage = if current == 0 {
            0
        } else {
            ((resolved * 100) as f64 / current as f64).round() as u32
        };

        let response_times: Vec<u32> = windowed
            .iter()
            .filter_map(|report| report.response_time_hours)
            .collect();
        let avg_response_hours = if response_times.is_empty() {
            0
        } else {
            (response_times.iter().map(|&hours| f64::from(hours)).sum::<f64>()
                / response_times.len() as f64)
                .round() as u32
        };

        let active_interventions = windowed
            .iter()
            .filter(|report| report.status == ReportStatus::InProgress)
            .count();

        Self {
            total_reports: ReportTotals {
                current,
                all_time: reports.len(),
            },
            resolved_percentage,
            avg_response_hours,
            active_interventions,
        }
    }
}

/// Recency window of the top-categories chart tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryRecency {
    Last7Days,
    Last30Days,
    AllTime,
}

impl CategoryRecency {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "7days" | "last_7_days" => Some(Self::Last7Days),
            "month" | "30days" | "last_30_days" => Some(Self::Last30Days),
            "all" | "all_time" => Some(Self::AllTime),
            _ => None,
        }
    }

    fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            CategoryRecency::Last7Days => Some(now - Duration::days(7)),
            CategoryRecency::Last30Days => Some(now - Duration::days(30)),
            CategoryRecency::AllTime => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: ReportCategory,
    pub label: &'static str,
    pub count: usize,
}

/// Group by category and order by descending count. The sort is stable, so
/// ties keep first-seen order. `now` is supplied rather than read from the
/// clock to keep the recency cutoff deterministic.
pub fn top_categories(
    reports: &[Report],
    recency: CategoryRecency,
    now: DateTime<Utc>,
) -> Vec<CategoryCount> {
    let cutoff = recency.cutoff(now);

    let mut counts: Vec<(ReportCategory, usize)> = Vec::new();
    for report in reports {
        if cutoff.is_some_and(|cutoff| report.submitted_at < cutoff) {
            continue;
        }
        match counts
            .iter_mut()
            .find(|(category, _)| *category == report.category)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((report.category, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category,
            label: category.label(),
            count,
        })
        .collect()
}

/// Response times above this many hours mark a neighborhood as critical.
const CRITICAL_RESPONSE_HOURS: u32 = 48;

/// Per-region rollup for the dashboard's neighborhood table, ordered by
/// report count descending with first-seen order on ties.
pub fn neighborhood_overview(reports: &[Report]) -> Vec<Neighborhood> {
    struct Bucket {
        region: String,
        count: usize,
        response_sum: u64,
        response_samples: usize,
    }

    let mut buckets: Vec<Bucket> = Vec::new();
    for report in reports {
        let index = match buckets.iter().position(|b| b.region == report.region) {
            Some(index) => index,
            None => {
                buckets.push(Bucket {
                    region: report.region.clone(),
                    count: 0,
                    response_sum: 0,
                    response_samples: 0,
                });
                buckets.len() - 1
            }
        };
        let bucket = &mut buckets[index];
        bucket.count += 1;
        if let Some(hours) = report.response_time_hours {
            bucket.response_sum += u64::from(hours);
            bucket.response_samples += 1;
        }
    }

    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
        .into_iter()
        .map(|bucket| {
            let avg_response_hours = if bucket.response_samples == 0 {
                0
            } else {
                (bucket.response_sum as f64 / bucket.response_samples as f64).round() as u32
            };
            Neighborhood {
                id: bucket.region.to_lowercase().replace(' ', "-"),
                name: bucket.region.clone(),
                region: bucket.region,
                report_count: bucket.count,
                avg_response_hours,
                critical: avg_response_hours > CRITICAL_RESPONSE_HOURS,
            }
        })
        .collect()
}

/// First `limit` reports of the window, collection order, for the dashboard
/// feed.
pub fn recent_feed(reports: &[Report], window: &DashboardWindow, limit: usize) -> Vec<Report> {
    reports
        .iter()
        .filter(|report| window.contains(report))
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::domain::{Coordinates, ReportId, Severity};
    use chrono::TimeZone;

    fn when(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, day, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn report(
        id: u32,
        day: u32,
        status: ReportStatus,
        category: ReportCategory,
        response: Option<u32>,
    ) -> Report {
        Report {
            id: ReportId(format!("rep-{id:03}")),
            title: format!("Report {id}"),
            description: None,
            category,
            severity: Severity::new(3).expect("valid severity"),
            status,
            location: String::new(),
            region: "Centro".to_string(),
            coordinates: Coordinates { lat: 0.0, lng: 0.0 },
            submitted_at: when(day),
            assigned_to: None,
            response_time_hours: response,
            read: false,
        }
    }

    #[test]
    fn empty_window_yields_zero_percentages_not_nan() {
        let reports = vec![report(1, 1, ReportStatus::Resolved, ReportCategory::Other, None)];
        let window = DashboardWindow {
            region: Some("Zona Norte".to_string()),
            ..DashboardWindow::default()
        };
        let kpis = KpiSnapshot::compute(&reports, &window);
        assert_eq!(kpis.total_reports.current, 0);
        assert_eq!(kpis.total_reports.all_time, 1);
        assert_eq!(kpis.resolved_percentage, 0);
        assert_eq!(kpis.avg_response_hours, 0);
    }

    #[test]
    fn response_average_skips_reports_without_one() {
        let reports = vec![
            report(1, 1, ReportStatus::Pending, ReportCategory::Other, Some(10)),
            report(2, 2, ReportStatus::Pending, ReportCategory::Other, Some(20)),
            report(3, 3, ReportStatus::Pending, ReportCategory::Other, None),
        ];
        let kpis = KpiSnapshot::compute(&reports, &DashboardWindow::default());
        assert_eq!(kpis.avg_response_hours, 15);
    }

    #[test]
    fn resolved_percentage_rounds_over_the_window() {
        let reports = vec![
            report(1, 1, ReportStatus::Resolved, ReportCategory::Other, None),
            report(2, 2, ReportStatus::Resolved, ReportCategory::Other, None),
            report(3, 3, ReportStatus::Pending, ReportCategory::Other, None),
        ];
        let kpis = KpiSnapshot::compute(&reports, &DashboardWindow::default());
        assert_eq!(kpis.resolved_percentage, 67);
        assert_eq!(kpis.active_interventions, 0);
    }

    #[test]
    fn top_categories_sorts_by_count_and_keeps_tie_order() {
        let reports = vec![
            report(1, 1, ReportStatus::Pending, ReportCategory::Flooding, None),
            report(2, 2, ReportStatus::Pending, ReportCategory::HeatIsland, None),
            report(3, 3, ReportStatus::Pending, ReportCategory::HeatIsland, None),
            report(4, 4, ReportStatus::Pending, ReportCategory::MissingRamp, None),
        ];
        let ranked = top_categories(&reports, CategoryRecency::AllTime, when(30));
        let order: Vec<ReportCategory> = ranked.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![
                ReportCategory::HeatIsland,
                ReportCategory::Flooding,
                ReportCategory::MissingRamp,
            ]
        );
        assert_eq!(ranked[0].count, 2);
    }

    #[test]
    fn recency_cutoff_drops_old_reports() {
        let reports = vec![
            report(1, 1, ReportStatus::Pending, ReportCategory::Flooding, None),
            report(2, 28, ReportStatus::Pending, ReportCategory::HeatIsland, None),
        ];
        let ranked = top_categories(&reports, CategoryRecency::Last7Days, when(30));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].category, ReportCategory::HeatIsland);
    }

    #[test]
    fn neighborhood_overview_ranks_by_count_and_flags_slow_regions() {
        let mut reports = vec![
            report(1, 1, ReportStatus::Pending, ReportCategory::Flooding, Some(60)),
            report(2, 2, ReportStatus::Pending, ReportCategory::Flooding, None),
            report(3, 3, ReportStatus::Pending, ReportCategory::Other, Some(12)),
        ];
        reports[0].region = "Zona Leste".to_string();
        reports[1].region = "Zona Leste".to_string();

        let rows = neighborhood_overview(&reports);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Zona Leste");
        assert_eq!(rows[0].id, "zona-leste");
        assert_eq!(rows[0].report_count, 2);
        assert_eq!(rows[0].avg_response_hours, 60);
        assert!(rows[0].critical);
        assert_eq!(rows[1].name, "Centro");
        assert_eq!(rows[1].avg_response_hours, 12);
        assert!(!rows[1].critical);
    }

    #[test]
    fn recent_feed_is_capped_and_windowed() {
        let reports: Vec<Report> = (1..=8)
            .map(|n| report(n, n, ReportStatus::Pending, ReportCategory::Other, None))
            .collect();
        let feed = recent_feed(&reports, &DashboardWindow::default(), 5);
        assert_eq!(feed.len(), 5);
        assert_eq!(feed[0].id.0, "rep-001");
    }
}
