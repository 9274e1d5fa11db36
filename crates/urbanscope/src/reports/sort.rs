use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::Report;

/// Columns the admin table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    SubmittedAt,
    Severity,
    Title,
    Category,
    Region,
    Status,
    Id,
}

impl SortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "submitted_at" | "date" => Some(Self::SubmittedAt),
            "severity" => Some(Self::Severity),
            "title" => Some(Self::Title),
            "category" => Some(Self::Category),
            "region" => Some(Self::Region),
            "status" => Some(Self::Status),
            "id" => Some(Self::Id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// Active ordering. The table default is newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::SubmittedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    /// Clicking the active column flips direction; a new column starts
    /// ascending.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Ascending,
            }
        }
    }

    /// Stable sort in place. Timestamps and severity compare numerically,
    /// everything else as case-insensitive text.
    pub fn apply(&self, reports: &mut [Report]) {
        reports.sort_by(|a, b| {
            let ordering = compare_by(self.field, a, b);
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

fn compare_by(field: SortField, a: &Report, b: &Report) -> Ordering {
    match field {
        SortField::SubmittedAt => a.submitted_at.cmp(&b.submitted_at),
        SortField::Severity => a.severity.cmp(&b.severity),
        SortField::Title => compare_text(&a.title, &b.title),
        SortField::Category => compare_text(a.category.as_str(), b.category.as_str()),
        SortField::Region => compare_text(&a.region, &b.region),
        SortField::Status => compare_text(a.status.as_str(), b.status.as_str()),
        SortField::Id => compare_text(&a.id.0, &b.id.0),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
