use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for citizen-filed reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub String);

/// Issue categories offered by the reporting flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportCategory {
    MissingRamp,
    Obstruction,
    UnevenSurface,
    BrokenSidewalk,
    MissingTree,
    HeatIsland,
    Flooding,
    Other,
}

impl ReportCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            ReportCategory::MissingRamp => "missing-ramp",
            ReportCategory::Obstruction => "obstruction",
            ReportCategory::UnevenSurface => "uneven-surface",
            ReportCategory::BrokenSidewalk => "broken-sidewalk",
            ReportCategory::MissingTree => "missing-tree",
            ReportCategory::HeatIsland => "heat-island",
            ReportCategory::Flooding => "flooding",
            ReportCategory::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ReportCategory::MissingRamp => "Missing accessibility ramp",
            ReportCategory::Obstruction => "Sidewalk obstruction",
            ReportCategory::UnevenSurface => "Uneven surface",
            ReportCategory::BrokenSidewalk => "Broken sidewalk",
            ReportCategory::MissingTree => "Missing tree cover",
            ReportCategory::HeatIsland => "Heat island",
            ReportCategory::Flooding => "Flood-prone area",
            ReportCategory::Other => "Other issue",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "missing-ramp" => Some(Self::MissingRamp),
            "obstruction" => Some(Self::Obstruction),
            "uneven-surface" => Some(Self::UnevenSurface),
            "broken-sidewalk" => Some(Self::BrokenSidewalk),
            "missing-tree" => Some(Self::MissingTree),
            "heat-island" => Some(Self::HeatIsland),
            "flooding" => Some(Self::Flooding),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Triage status of a report. Transitions are unrestricted: any action may
/// set any status, matching how the admin tooling behaves today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::InProgress => "in-progress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Rejected => "rejected",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "In progress",
            ReportStatus::Resolved => "Resolved",
            ReportStatus::Rejected => "Rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "in-progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Severity scale used by the reporting flow, constrained to 1..=5. The
/// bound holds through deserialization as well, so submitted payloads
/// cannot smuggle an out-of-scale value into the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(Self(value))
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<Severity> for u8 {
    fn from(value: Severity) -> Self {
        value.0
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Severity::new(value).ok_or_else(|| format!("severity must be 1 to 5, got {value}"))
    }
}

/// WGS84 point attached to every report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A citizen-filed issue record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: ReportCategory,
    pub severity: Severity,
    pub status: ReportStatus,
    pub location: String,
    pub region: String,
    pub coordinates: Coordinates,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Hours elapsed until the first municipal response, when one happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_hours: Option<u32>,
    #[serde(default)]
    pub read: bool,
}

impl Report {
    /// Whether the report has been handed to a department. An empty string
    /// counts as unassigned so imported records with blank fields behave.
    pub fn is_assigned(&self) -> bool {
        self.assigned_to
            .as_deref()
            .is_some_and(|department| !department.is_empty())
    }
}

/// Municipal department that can receive assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub member_count: u32,
    pub avg_resolution_hours: u32,
    pub performance: DepartmentPerformance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentPerformance {
    Good,
    Average,
    Poor,
}

impl DepartmentPerformance {
    pub const fn label(self) -> &'static str {
        match self {
            DepartmentPerformance::Good => "good",
            DepartmentPerformance::Average => "average",
            DepartmentPerformance::Poor => "poor",
        }
    }
}

/// Aggregated per-neighborhood row shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub id: String,
    pub name: String,
    pub region: String,
    pub report_count: usize,
    pub avg_response_hours: u32,
    pub critical: bool,
}
