//! Planned remediation projects and the headline statistics the projects
//! page renders. Interventions reference reports only by id; nothing
//! enforces those links, matching the loosely-coupled source data.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::reports::repository::RepositoryError;

/// Identifier wrapper for interventions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterventionId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterventionKind {
    Ramps,
    GreenCorridors,
    HeatMitigation,
    Accessibility,
    TreePlanting,
    Infrastructure,
}

impl InterventionKind {
    pub const fn label(self) -> &'static str {
        match self {
            InterventionKind::Ramps => "Accessibility ramps",
            InterventionKind::GreenCorridors => "Green corridors",
            InterventionKind::HeatMitigation => "Heat mitigation",
            InterventionKind::Accessibility => "Accessibility works",
            InterventionKind::TreePlanting => "Tree planting",
            InterventionKind::Infrastructure => "Infrastructure",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterventionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterventionPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Percent complete, constrained to 0..=100 through deserialization as
/// well as construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Progress(u8);

impl Progress {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 100).then_some(Self(value))
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<Progress> for u8 {
    fn from(value: Progress) -> Self {
        value.0
    }
}

impl TryFrom<u8> for Progress {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Progress::new(value).ok_or_else(|| format!("progress must be 0 to 100, got {value}"))
    }
}

/// Where the work happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionSite {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub neighborhood: String,
}

/// A planned remediation project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    pub id: InterventionId,
    pub title: String,
    pub kind: InterventionKind,
    pub description: String,
    pub assigned_department: String,
    /// Loose references to the reports that motivated the project.
    pub linked_report_ids: Vec<String>,
    pub status: InterventionStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: u64,
    pub site: InterventionSite,
    pub progress: Progress,
    pub priority: InterventionPriority,
}

/// Headline numbers for the projects overview cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterventionStats {
    pub total: usize,
    pub by_kind: BTreeMap<InterventionKind, usize>,
    pub total_budget: u64,
    pub linked_to_reports_percentage: u32,
    pub completed_this_month: usize,
    pub in_progress: usize,
}

impl InterventionStats {
    /// `today` anchors the "completed this month" bucket so the figure is
    /// deterministic under test.
    pub fn compute(interventions: &[Intervention], today: NaiveDate) -> Self {
        let total = interventions.len();

        let mut by_kind = BTreeMap::new();
        for intervention in interventions {
            *by_kind.entry(intervention.kind).or_insert(0) += 1;
        }

        let total_budget = interventions.iter().map(|i| i.budget).sum();

        let linked = interventions
            .iter()
            .filter(|i| !i.linked_report_ids.is_empty())
            .count();
        let linked_to_reports_percentage = if total == 0 {
            0
        } else {
            ((linked * 100) as f64 / total as f64).round() as u32
        };

        let completed_this_month = interventions
            .iter()
            .filter(|i| {
                i.status == InterventionStatus::Completed
                    && i.end_date.year() == today.year()
                    && i.end_date.month() == today.month()
            })
            .count();

        let in_progress = interventions
            .iter()
            .filter(|i| i.status == InterventionStatus::InProgress)
            .count();

        Self {
            total,
            by_kind,
            total_budget,
            linked_to_reports_percentage,
            completed_this_month,
            in_progress,
        }
    }
}

/// Storage abstraction for intervention records.
pub trait InterventionRepository: Send + Sync {
    fn insert(&self, intervention: Intervention) -> Result<Intervention, RepositoryError>;
    fn fetch(&self, id: &InterventionId) -> Result<Option<Intervention>, RepositoryError>;
    fn all(&self) -> Result<Vec<Intervention>, RepositoryError>;
}

/// In-memory store mirroring the report store.
#[derive(Default, Clone)]
pub struct InMemoryInterventionStore {
    records: Arc<Mutex<Vec<Intervention>>>,
}

impl InMemoryInterventionStore {
    pub fn seeded(interventions: Vec<Intervention>) -> Self {
        Self {
            records: Arc::new(Mutex::new(interventions)),
        }
    }
}

impl InterventionRepository for InMemoryInterventionStore {
    fn insert(&self, intervention: Intervention) -> Result<Intervention, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .expect("intervention store mutex poisoned");
        if guard.iter().any(|existing| existing.id == intervention.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(intervention.clone());
        Ok(intervention)
    }

    fn fetch(&self, id: &InterventionId) -> Result<Option<Intervention>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .expect("intervention store mutex poisoned");
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<Intervention>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .expect("intervention store mutex poisoned");
        Ok(guard.clone())
    }
}

/// Router builder for the projects endpoints.
pub fn intervention_router<I>(repository: Arc<I>) -> Router
where
    I: InterventionRepository + 'static,
{
    Router::new()
        .route("/api/v1/interventions", get(list_handler::<I>))
        .route("/api/v1/interventions/stats", get(stats_handler::<I>))
        .with_state(repository)
}

pub(crate) async fn list_handler<I>(State(repository): State<Arc<I>>) -> Response
where
    I: InterventionRepository + 'static,
{
    match repository.all() {
        Ok(interventions) => (StatusCode::OK, axum::Json(interventions)).into_response(),
        Err(error) => repository_error(error),
    }
}

pub(crate) async fn stats_handler<I>(State(repository): State<Arc<I>>) -> Response
where
    I: InterventionRepository + 'static,
{
    match repository.all() {
        Ok(interventions) => {
            let today = chrono::Local::now().date_naive();
            let stats = InterventionStats::compute(&interventions, today);
            (StatusCode::OK, axum::Json(stats)).into_response()
        }
        Err(error) => repository_error(error),
    }
}

fn repository_error(error: RepositoryError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
