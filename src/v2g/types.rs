//! Allocation parameters and result tables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{V2gError, ensure_finite};
use crate::fleet::Vehicle;

/// Battery floor (percent) at or below which a vehicle never takes part.
pub const MIN_BATTERY_PERCENTAGE: f64 = 30.0;

/// Scale (percentage points) of the exponential battery bias.
pub const BIAS_SCALE_PCT: f64 = 20.0;

/// Fleet-wide allocation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllocationParams {
    /// Usable pack size of every vehicle (kWh, > 0).
    pub battery_capacity_kwh: f64,
    /// Vehicles farther than this are ineligible (km, > 0).
    pub max_distance_km: f64,
}

impl Default for AllocationParams {
    fn default() -> Self {
        Self {
            battery_capacity_kwh: 50.0,
            max_distance_km: 20.0,
        }
    }
}

impl AllocationParams {
    /// Checks that capacity and radius are finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`V2gError::InvalidArgument`] naming the first bad field.
    pub fn validate(&self) -> Result<(), V2gError> {
        ensure_finite("battery_capacity_kwh", self.battery_capacity_kwh)?;
        ensure_finite("max_distance_km", self.max_distance_km)?;
        if self.battery_capacity_kwh <= 0.0 {
            return Err(V2gError::invalid("battery_capacity_kwh", "must be > 0"));
        }
        if self.max_distance_km <= 0.0 {
            return Err(V2gError::invalid("max_distance_km", "must be > 0"));
        }
        Ok(())
    }
}

/// Whether the fleet gives energy to the grid or absorbs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Grid shortfall (`delta_kwh < 0`): vehicles discharge.
    Discharge,
    /// Grid surplus (`delta_kwh >= 0`): vehicles charge.
    Charge,
}

impl Direction {
    /// Direction implied by the sign of a delta.
    pub fn from_delta(delta_kwh: f64) -> Self {
        if delta_kwh < 0.0 {
            Self::Discharge
        } else {
            Self::Charge
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discharge => write!(f, "discharge"),
            Self::Charge => write!(f, "charge"),
        }
    }
}

/// Outcome class of an allocation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    /// The delta was proportioned across vehicles with positive weight.
    Allocated,
    /// No eligible vehicle carried positive weight; nothing was allocated.
    NoEligibleWeight,
}

/// Public per-vehicle allocation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub vehicle_id: String,
    /// Battery level before the allocation (percent).
    pub battery_percentage: f64,
    /// Energy moved into or out of the pack (kWh, >= 0).
    pub energy_contribution_kwh: f64,
    /// Battery level after the allocation (percent, 0-100).
    pub final_battery_percentage: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for AllocationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<9} {:>6.2}% -> {:>6.2}%  {:>8.3} kWh  ({:.5}, {:.5})",
            self.vehicle_id,
            self.battery_percentage,
            self.final_battery_percentage,
            self.energy_contribution_kwh,
            self.latitude,
            self.longitude
        )
    }
}

/// Working-table row: an eligible vehicle with every intermediate quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibleVehicle {
    pub vehicle: Vehicle,
    /// Stored energy before the allocation (kWh).
    pub battery_energy_kwh: f64,
    pub battery_bias: f64,
    pub distance_multiplier: f64,
    /// `battery_bias * distance_multiplier`.
    pub total_bias: f64,
    pub energy_contribution_kwh: f64,
    pub final_battery_energy_kwh: f64,
    pub final_battery_percentage: f64,
}

impl From<&EligibleVehicle> for AllocationResult {
    fn from(row: &EligibleVehicle) -> Self {
        Self {
            vehicle_id: row.vehicle.id.clone(),
            battery_percentage: row.vehicle.battery_percentage,
            energy_contribution_kwh: row.energy_contribution_kwh,
            final_battery_percentage: row.final_battery_percentage,
            latitude: row.vehicle.latitude,
            longitude: row.vehicle.longitude,
        }
    }
}

/// Result of one allocation round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub direction: Direction,
    /// Magnitude of the delta that was distributed (kWh).
    pub requested_kwh: f64,
    pub status: AllocationStatus,
    /// One row per eligible vehicle; empty when `status` is `NoEligibleWeight`.
    pub results: Vec<AllocationResult>,
    /// Working table of every eligible vehicle.
    pub eligible: Vec<EligibleVehicle>,
}

impl Allocation {
    /// Sum of actual contributions (kWh).
    pub fn delivered_kwh(&self) -> f64 {
        self.results.iter().map(|r| r.energy_contribution_kwh).sum()
    }

    /// Requested energy that saturated vehicles could not absorb or supply (kWh).
    pub fn shortfall_kwh(&self) -> f64 {
        (self.requested_kwh - self.delivered_kwh()).max(0.0)
    }

    /// True when nothing could be allocated.
    pub fn is_degenerate(&self) -> bool {
        self.status == AllocationStatus::NoEligibleWeight
    }
}
