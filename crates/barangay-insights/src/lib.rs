//! Community risk indicators and event-priority predictions for barangay profiling.
//!
//! The `workflows` tree holds the prediction engine: the census importer feeding a
//! [`workflows::prediction::RecordStore`], the weather feed with its fallback series, and the
//! service and router that turn both into ranked event recommendations.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
