//! Vehicle rows and generator parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One member of a synthetic EV fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique identifier within the generated fleet (`Car_1`, `Car_2`, ...).
    pub id: String,
    /// State of charge in percent (0-100).
    pub battery_percentage: f64,
    /// Distance from the reference center point (km).
    pub distance_km: f64,
    /// Whether the vehicle is booked for a trip and unavailable for V2G.
    pub trip_scheduled: bool,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<9} battery={:>5.1}% dist={:>5.2}km trip={:<5} pos=({:.5}, {:.5})",
            self.id,
            self.battery_percentage,
            self.distance_km,
            self.trip_scheduled,
            self.latitude,
            self.longitude
        )
    }
}

/// Parameters for [`generate`](super::generate).
///
/// Defaults place 1000 vehicles within 40 km of a solar farm near Oxford.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FleetParams {
    /// Number of vehicles to generate.
    pub count: usize,
    /// Latitude of the reference center (degrees, strictly inside +/-90).
    pub center_lat: f64,
    /// Longitude of the reference center (degrees).
    pub center_lon: f64,
    /// Minimum distance from the center (km, >= 0).
    pub min_radius_km: f64,
    /// Maximum distance from the center (km, >= `min_radius_km`).
    pub max_radius_km: f64,
    /// Minimum battery percentage (0-100).
    pub min_battery: f64,
    /// Maximum battery percentage (0-100, >= `min_battery`).
    pub max_battery: f64,
    /// Probability that a vehicle has a trip scheduled (0.0-1.0).
    pub trip_probability: f64,
    /// Random seed for reproducible generation.
    pub seed: u64,
}

impl Default for FleetParams {
    fn default() -> Self {
        Self {
            count: 1000,
            center_lat: 51.7520,
            center_lon: -1.2577,
            min_radius_km: 0.1,
            max_radius_km: 40.0,
            min_battery: 20.0,
            max_battery: 100.0,
            trip_probability: 0.1,
            seed: 42,
        }
    }
}
