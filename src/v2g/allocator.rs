use tracing::debug;

use super::types::{
    Allocation, AllocationParams, AllocationResult, AllocationStatus, BIAS_SCALE_PCT, Direction,
    EligibleVehicle, MIN_BATTERY_PERCENTAGE,
};
use crate::error::{V2gError, ensure_finite};
use crate::fleet::Vehicle;

/// Distributes `|delta_kwh|` across the eligible vehicles of `fleet`.
///
/// A vehicle is eligible when its battery is above
/// [`MIN_BATTERY_PERCENTAGE`], it is within `params.max_distance_km`, and it
/// has no trip scheduled. Each eligible vehicle is weighted by a battery bias
/// times a distance multiplier; its share of the delta is then capped at what
/// its pack can give (discharge) or take (charge). Capped energy is not
/// redistributed, so [`Allocation::shortfall_kwh`] may be positive.
///
/// # Arguments
///
/// * `delta_kwh` - Signed imbalance; negative means discharge, otherwise charge
/// * `fleet` - Fleet snapshot; never modified
/// * `params` - Pack capacity and eligibility radius
///
/// # Errors
///
/// Returns [`V2gError::InvalidArgument`] for a non-finite delta or
/// non-positive capacity/radius. A round where no vehicle has positive weight
/// is not an error: it returns [`AllocationStatus::NoEligibleWeight`].
pub fn allocate(
    delta_kwh: f64,
    fleet: &[Vehicle],
    params: &AllocationParams,
) -> Result<Allocation, V2gError> {
    ensure_finite("delta_kwh", delta_kwh)?;
    params.validate()?;

    let direction = Direction::from_delta(delta_kwh);
    let requested_kwh = delta_kwh.abs();
    let capacity = params.battery_capacity_kwh;

    let mut eligible: Vec<EligibleVehicle> = fleet
        .iter()
        .filter(|v| is_eligible(v, params.max_distance_km))
        .map(|v| {
            let battery_bias = battery_bias(direction, v.battery_percentage);
            let distance_multiplier = distance_multiplier(v.distance_km, params.max_distance_km);
            let battery_energy_kwh = v.battery_percentage / 100.0 * capacity;
            EligibleVehicle {
                vehicle: v.clone(),
                battery_energy_kwh,
                battery_bias,
                distance_multiplier,
                total_bias: battery_bias * distance_multiplier,
                energy_contribution_kwh: 0.0,
                final_battery_energy_kwh: battery_energy_kwh,
                final_battery_percentage: v.battery_percentage,
            }
        })
        .collect();

    let total_bias: f64 = eligible.iter().map(|e| e.total_bias).sum();
    if total_bias <= 0.0 {
        debug!(
            fleet = fleet.len(),
            eligible = eligible.len(),
            %direction,
            "no eligible vehicle carries positive weight"
        );
        return Ok(Allocation {
            direction,
            requested_kwh,
            status: AllocationStatus::NoEligibleWeight,
            results: Vec::new(),
            eligible,
        });
    }

    for row in &mut eligible {
        let share = row.total_bias / total_bias * requested_kwh;
        let start_pct = row.vehicle.battery_percentage;
        let (contribution, final_energy, final_pct) = match direction {
            Direction::Discharge => {
                let c = share.min(row.battery_energy_kwh);
                (c, row.battery_energy_kwh - c, start_pct - c / capacity * 100.0)
            }
            Direction::Charge => {
                let c = share.min(capacity - row.battery_energy_kwh);
                (c, row.battery_energy_kwh + c, start_pct + c / capacity * 100.0)
            }
        };
        let final_pct = final_pct.clamp(0.0, 100.0);
        // A contribution too small to move the percentage counts as none, so
        // the row keeps its exact starting values.
        if contribution <= 0.0 || final_pct == start_pct {
            continue;
        }
        row.energy_contribution_kwh = contribution;
        row.final_battery_energy_kwh = final_energy;
        row.final_battery_percentage = final_pct;
    }

    let results: Vec<AllocationResult> = eligible.iter().map(AllocationResult::from).collect();
    let allocation = Allocation {
        direction,
        requested_kwh,
        status: AllocationStatus::Allocated,
        results,
        eligible,
    };

    debug!(
        fleet = fleet.len(),
        eligible = allocation.eligible.len(),
        %direction,
        requested_kwh,
        delivered_kwh = allocation.delivered_kwh(),
        "allocated delta"
    );
    Ok(allocation)
}

/// Whether `vehicle` may take part in a round with the given radius.
pub fn is_eligible(vehicle: &Vehicle, max_distance_km: f64) -> bool {
    vehicle.battery_percentage > MIN_BATTERY_PERCENTAGE
        && vehicle.distance_km <= max_distance_km
        && !vehicle.trip_scheduled
}

/// Exponential preference for full packs when discharging and empty packs when charging.
///
/// Zero at the 30 % floor (discharge) or at 100 % (charge).
pub fn battery_bias(direction: Direction, battery_percentage: f64) -> f64 {
    let headroom = match direction {
        Direction::Discharge => battery_percentage - MIN_BATTERY_PERCENTAGE,
        Direction::Charge => 100.0 - battery_percentage,
    };
    (headroom / BIAS_SCALE_PCT).exp() - 1.0
}

/// Linear proximity weight: 1 at the center, 0 at or beyond `max_distance_km`.
pub fn distance_multiplier(distance_km: f64, max_distance_km: f64) -> f64 {
    (1.0 - distance_km / max_distance_km).max(0.0)
}
