//! Domain models for the experiment tracker.
//!
//! # Core Concepts
//!
//! - [`Experiment`]: The only stored entity. A research or testing effort with
//!   a lifecycle [`ExperimentStatus`], a [`Category`], a date range, a budget
//!   and free-form structured data.
//! - [`CreateExperimentInput`] / [`UpdateExperimentInput`]: Validated payloads
//!   produced by [`crate::validation`]. Handlers never persist raw JSON.
//! - [`ExperimentFilter`], [`SortKey`], [`PageRequest`]: The list query, already
//!   parsed and bounded.
//! - [`ExperimentStats`]: Aggregate counts grouped by status and category.
//! - [`ApiResponse`], [`ListResponse`], [`ErrorResponse`]: The JSON envelopes
//!   every endpoint answers with; `success` tells them apart.

mod experiment;
mod query;
mod response;
mod stats;

pub use experiment::*;
pub use query::*;
pub use response::*;
pub use stats::*;
