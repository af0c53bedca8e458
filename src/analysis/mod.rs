//! Metrics aggregation.
//!
//! Turns the project collection and a filter state into the dashboard
//! view-model. Everything here is pure: no I/O, no failure paths.

pub mod aggregator;
pub mod health;
pub mod timeline;

pub use aggregator::*;

/// Round half-up towards positive infinity (`-2.5` rounds to `-2`).
pub(crate) fn round(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// `part / whole * 100`, rounded, or 0 when `whole` is 0.
pub(crate) fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        round(part as f64 / whole as f64 * 100.0) as u32
    }
}
