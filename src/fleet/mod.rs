//! Synthetic EV fleet generation around a reference point.

mod generator;
/// Flat-earth projection and great-circle helpers.
pub mod geo;
pub mod types;

pub use generator::{generate, generate_with_rng, validate};
pub use types::{FleetParams, Vehicle};
