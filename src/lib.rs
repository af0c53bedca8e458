//! Perfdash - project and task performance metrics.
//!
//! The library exposes the pieces behind the `perfdash` binary: the
//! dataset loader, the filter controller, the metrics aggregator and the
//! report renderers. Everything is synchronous and side-effect free apart
//! from reading dataset and config files.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filters;
pub mod models;
pub mod report;

pub use analysis::aggregate;
pub use dataset::Dataset;
pub use filters::{FilterController, FilterState, RangeMode};
pub use models::Dashboard;
