use std::sync::{Arc, Mutex};

use super::domain::{Report, ReportId};

/// Storage abstraction so the query engine and services can be exercised in
/// isolation. `all` hands back an owned snapshot: the engine always runs
/// over an immutable collection, and insertion order is preserved because
/// stable sorting and tie-breaking depend on it.
pub trait ReportRepository: Send + Sync {
    fn insert(&self, report: Report) -> Result<Report, RepositoryError>;
    fn update(&self, report: Report) -> Result<Report, RepositoryError>;
    fn fetch(&self, id: &ReportId) -> Result<Option<Report>, RepositoryError>;
    fn delete(&self, id: &ReportId) -> Result<Report, RepositoryError>;
    fn all(&self) -> Result<Vec<Report>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// In-memory store backing the service and tests. A Vec rather than a map
/// keeps insertion order stable.
#[derive(Default, Clone)]
pub struct InMemoryReportStore {
    records: Arc<Mutex<Vec<Report>>>,
}

impl InMemoryReportStore {
    pub fn seeded(reports: Vec<Report>) -> Self {
        Self {
            records: Arc::new(Mutex::new(reports)),
        }
    }
}

impl ReportRepository for InMemoryReportStore {
    fn insert(&self, report: Report) -> Result<Report, RepositoryError> {
        let mut guard = self.records.lock().expect("report store mutex poisoned");
        if guard.iter().any(|existing| existing.id == report.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(report.clone());
        Ok(report)
    }

    fn update(&self, report: Report) -> Result<Report, RepositoryError> {
        let mut guard = self.records.lock().expect("report store mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == report.id) {
            Some(slot) => {
                *slot = report.clone();
                Ok(report)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<Report>, RepositoryError> {
        let guard = self.records.lock().expect("report store mutex poisoned");
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn delete(&self, id: &ReportId) -> Result<Report, RepositoryError> {
        let mut guard = self.records.lock().expect("report store mutex poisoned");
        let position = guard
            .iter()
            .position(|existing| &existing.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(position))
    }

    fn all(&self) -> Result<Vec<Report>, RepositoryError> {
        let guard = self.records.lock().expect("report store mutex poisoned");
        Ok(guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::domain::{Coordinates, ReportCategory, ReportStatus, Severity};
    use chrono::{TimeZone, Utc};

    fn report(id: &str) -> Report {
        Report {
            id: ReportId(id.to_string()),
            title: "Flooded underpass".to_string(),
            description: None,
            category: ReportCategory::Flooding,
            severity: Severity::new(5).expect("valid severity"),
            status: ReportStatus::Pending,
            location: String::new(),
            region: "Centro".to_string(),
            coordinates: Coordinates { lat: 0.0, lng: 0.0 },
            submitted_at: Utc
                .with_ymd_and_hms(2025, 5, 1, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
            assigned_to: None,
            response_time_hours: None,
            read: false,
        }
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let store = InMemoryReportStore::default();
        store.insert(report("rep-1")).expect("first insert");
        let error = store.insert(report("rep-1")).expect_err("duplicate");
        assert!(matches!(error, RepositoryError::Conflict));
    }

    #[test]
    fn update_requires_an_existing_record() {
        let store = InMemoryReportStore::default();
        let error = store.update(report("rep-1")).expect_err("missing");
        assert!(matches!(error, RepositoryError::NotFound));
    }

    #[test]
    fn delete_returns_the_removed_record() {
        let store = InMemoryReportStore::seeded(vec![report("rep-1"), report("rep-2")]);
        let removed = store
            .delete(&ReportId("rep-1".to_string()))
            .expect("delete succeeds");
        assert_eq!(removed.id.0, "rep-1");
        assert_eq!(store.all().expect("snapshot").len(), 1);
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let store = InMemoryReportStore::default();
        for id in ["c", "a", "b"] {
            store.insert(report(id)).expect("insert");
        }
        let ids: Vec<String> = store
            .all()
            .expect("snapshot")
            .into_iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
