//! Flat records behind the team-coordination panels: department chatter and
//! resource requests. These carry informal id references only; nothing
//! cross-checks them against reports or departments.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A message posted on a department's coordination thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    pub id: String,
    pub department_id: String,
    pub author: String,
    pub sent_at: DateTime<Utc>,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceStatus {
    Requested,
    Approved,
    Fulfilled,
}

/// Equipment or material requested for linked reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub kind: String,
    pub description: String,
    pub linked_report_ids: Vec<String>,
    pub status: ResourceStatus,
    pub requested_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfilled_on: Option<NaiveDate>,
}

/// In-memory board holding both record kinds for the coordination page.
#[derive(Default, Clone)]
pub struct CoordinationBoard {
    communications: Arc<Mutex<Vec<Communication>>>,
    resources: Arc<Mutex<Vec<Resource>>>,
}

impl CoordinationBoard {
    pub fn seeded(communications: Vec<Communication>, resources: Vec<Resource>) -> Self {
        Self {
            communications: Arc::new(Mutex::new(communications)),
            resources: Arc::new(Mutex::new(resources)),
        }
    }

    pub fn post(&self, communication: Communication) -> Communication {
        let mut guard = self
            .communications
            .lock()
            .expect("coordination mutex poisoned");
        guard.push(communication.clone());
        communication
    }

    /// Thread for one department, in posting order.
    pub fn thread(&self, department_id: &str) -> Vec<Communication> {
        let guard = self
            .communications
            .lock()
            .expect("coordination mutex poisoned");
        guard
            .iter()
            .filter(|comm| comm.department_id == department_id)
            .cloned()
            .collect()
    }

    pub fn resources(&self) -> Vec<Resource> {
        self.resources
            .lock()
            .expect("coordination mutex poisoned")
            .clone()
    }

    /// Stamp a new status onto a resource request. Statuses are not a
    /// state machine here; the UI may move a request in either direction.
    pub fn set_resource_status(
        &self,
        resource_id: &str,
        status: ResourceStatus,
        on: NaiveDate,
    ) -> Option<Resource> {
        let mut guard = self.resources.lock().expect("coordination mutex poisoned");
        let resource = guard
            .iter_mut()
            .find(|resource| resource.id == resource_id)?;
        resource.status = status;
        match status {
            ResourceStatus::Requested => {}
            ResourceStatus::Approved => resource.approved_on = Some(on),
            ResourceStatus::Fulfilled => resource.fulfilled_on = Some(on),
        }
        Some(resource.clone())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThreadParams {
    department: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostRequest {
    department_id: String,
    author: String,
    content: String,
}

/// Router builder for the coordination panels.
pub fn coordination_router(board: Arc<CoordinationBoard>) -> Router {
    Router::new()
        .route(
            "/api/v1/coordination/communications",
            get(thread_handler).post(post_handler),
        )
        .route("/api/v1/coordination/resources", get(resources_handler))
        .with_state(board)
}

pub(crate) async fn thread_handler(
    State(board): State<Arc<CoordinationBoard>>,
    Query(params): Query<ThreadParams>,
) -> Response {
    (StatusCode::OK, axum::Json(board.thread(&params.department))).into_response()
}

pub(crate) async fn post_handler(
    State(board): State<Arc<CoordinationBoard>>,
    axum::Json(request): axum::Json<PostRequest>,
) -> Response {
    let posted = board.post(Communication {
        id: format!("comm-{}", Utc::now().timestamp_millis()),
        department_id: request.department_id,
        author: request.author,
        sent_at: Utc::now(),
        content: request.content,
    });
    (StatusCode::CREATED, axum::Json(posted)).into_response()
}

pub(crate) async fn resources_handler(State(board): State<Arc<CoordinationBoard>>) -> Response {
    (StatusCode::OK, axum::Json(board.resources())).into_response()
}
