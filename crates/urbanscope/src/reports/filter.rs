use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Report, ReportCategory, ReportStatus, Severity};

/// Predicate set applied to a report collection. Every supplied dimension
/// must match (logical AND); unset dimensions do not constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    /// Case-insensitive substring matched against id, title, or region.
    pub search: Option<String>,
    pub status: StatusFilter,
    pub category: Option<ReportCategory>,
    pub severity: Option<Severity>,
    /// Exact match against the report's region.
    pub neighborhood: Option<String>,
    pub date_range: DateRange,
    pub unread_only: bool,
}

/// Status dimension of the filter. "Assigned" is not a status: the admin UI
/// overloads the status dropdown with it, so it gets its own variant here
/// instead of a magic string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    Any,
    Is(ReportStatus),
    AssignedOnly,
}

/// Calendar-day bounds; `from` starts at midnight, `to` runs through
/// 23:59:59.999 of the named day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let after_start = match self.start_instant() {
            Some(start) => instant >= start,
            None => true,
        };
        let before_end = match self.end_instant() {
            Some(end) => instant <= end,
            None => true,
        };
        after_start && before_end
    }

    fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.from
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    fn end_instant(&self) -> Option<DateTime<Utc>> {
        self.to
            .and_then(|day| day.and_hms_milli_opt(23, 59, 59, 999))
            .map(|naive| naive.and_utc())
    }
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            if !needle.is_empty() {
                let hit = report.id.0.to_lowercase().contains(&needle)
                    || report.title.to_lowercase().contains(&needle)
                    || report.region.to_lowercase().contains(&needle);
                if !hit {
                    return false;
                }
            }
        }

        match self.status {
            StatusFilter::Any => {}
            StatusFilter::Is(status) => {
                if report.status != status {
                    return false;
                }
            }
            StatusFilter::AssignedOnly => {
                if !report.is_assigned() {
                    return false;
                }
            }
        }

        if let Some(category) = self.category {
            if report.category != category {
                return false;
            }
        }

        if let Some(severity) = self.severity {
            if report.severity != severity {
                return false;
            }
        }

        if let Some(region) = &self.neighborhood {
            if &report.region != region {
                return false;
            }
        }

        if !self.date_range.contains(report.submitted_at) {
            return false;
        }

        if self.unread_only && report.read {
            return false;
        }

        true
    }
}
