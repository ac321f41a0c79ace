//! Synthetic EV fleet generation and vehicle-to-grid energy allocation.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
/// Seeded fleet generation around a reference point.
pub mod fleet;
pub mod forecast;
pub mod report;
pub mod runner;
pub mod settlement;
/// Eligibility, weighting and capacity-clamped allocation.
pub mod v2g;

pub use error::V2gError;
