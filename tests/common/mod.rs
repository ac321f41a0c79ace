//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use v2g_fleet::fleet::{FleetParams, Vehicle};

/// Default fleet parameters with the given size (Oxford center, seed 42).
pub fn fleet_params(count: usize) -> FleetParams {
    FleetParams {
        count,
        ..FleetParams::default()
    }
}

/// Hand-built vehicle at the Oxford center coordinates.
pub fn vehicle(id: &str, battery_percentage: f64, distance_km: f64, trip: bool) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        battery_percentage,
        distance_km,
        trip_scheduled: trip,
        latitude: 51.7520,
        longitude: -1.2577,
    }
}

/// Fleet in which every vehicle is close, charged mid-range, and free.
///
/// Shares stay well below pack limits for modest deltas, so no clamping occurs.
pub fn unclamped_fleet() -> Vec<Vehicle> {
    (0..20)
        .map(|i| {
            vehicle(
                &format!("Car_{}", i + 1),
                40.0 + 2.5 * i as f64,
                0.5 + 0.5 * i as f64,
                false,
            )
        })
        .collect()
}

/// Sum of contributions across an allocation's rows (kWh).
pub fn total_contribution(allocation: &v2g_fleet::v2g::Allocation) -> f64 {
    allocation
        .results
        .iter()
        .map(|r| r.energy_contribution_kwh)
        .sum()
}
