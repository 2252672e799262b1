//! Hiring pipeline stage model for the AMS recruitment platform.
//!
//! The crate owns the ordered stage list of a hiring pipeline: the stage catalog, the
//! reorder engine, per-stage-type configuration, and the derived flow and report views.
//! An axum router and a repository boundary expose the model to the API service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
