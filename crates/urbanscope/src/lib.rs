//! Triage and analytics for municipal civic-issue reports.
//!
//! Citizens file geolocated reports of urban problems (missing ramps, heat
//! islands, flooding); administrators filter, assign, and track them. This
//! crate holds the domain model, the report query engine (filter, sort,
//! paginate, aggregate), the assignment queue, and intervention statistics.
//! HTTP routers for each area live beside the services so the API binary
//! only composes them.

pub mod assignment;
pub mod config;
pub mod error;
pub mod interventions;
pub mod reports;
pub mod telemetry;
