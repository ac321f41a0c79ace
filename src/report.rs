//! Post-hoc summary of an allocation round.

use std::fmt;

use serde::Serialize;

use crate::v2g::{Allocation, AllocationStatus, Direction};

/// Aggregate figures derived from a complete [`Allocation`].
///
/// Computed from the result rows so reported totals always match them.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationReport {
    pub direction: Direction,
    pub status: AllocationStatus,
    /// Vehicles in the fleet snapshot.
    pub fleet_size: usize,
    /// Vehicles passing the eligibility filter.
    pub eligible_count: usize,
    /// Eligible vehicles with a positive contribution.
    pub participating_count: usize,
    /// Magnitude of the requested delta (kWh).
    pub requested_kwh: f64,
    /// Sum of contributions (kWh).
    pub delivered_kwh: f64,
    /// Energy left unallocated by saturated packs (kWh).
    pub shortfall_kwh: f64,
    /// `delivered / requested` in percent (100 when nothing was requested).
    pub delivered_pct: f64,
    /// Mean battery level of eligible vehicles after the round (percent).
    pub mean_final_battery_pct: f64,
}

impl AllocationReport {
    /// Builds the report for `allocation` over a fleet of `fleet_size` vehicles.
    pub fn from_allocation(allocation: &Allocation, fleet_size: usize) -> Self {
        let delivered_kwh = allocation.delivered_kwh();
        let participating_count = allocation
            .results
            .iter()
            .filter(|r| r.energy_contribution_kwh > 0.0)
            .count();

        let delivered_pct = if allocation.requested_kwh > 0.0 {
            100.0 * delivered_kwh / allocation.requested_kwh
        } else {
            100.0
        };

        let mean_final_battery_pct = if allocation.eligible.is_empty() {
            0.0
        } else {
            allocation
                .eligible
                .iter()
                .map(|e| e.final_battery_percentage)
                .sum::<f64>()
                / allocation.eligible.len() as f64
        };

        Self {
            direction: allocation.direction,
            status: allocation.status,
            fleet_size,
            eligible_count: allocation.eligible.len(),
            participating_count,
            requested_kwh: allocation.requested_kwh,
            delivered_kwh,
            shortfall_kwh: allocation.shortfall_kwh(),
            delivered_pct,
            mean_final_battery_pct,
        }
    }
}

impl fmt::Display for AllocationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- V2G Allocation Report ---")?;
        writeln!(f, "Direction:             {}", self.direction)?;
        if self.status == AllocationStatus::NoEligibleWeight {
            writeln!(f, "Status:                no eligible vehicle with positive weight")?;
        }
        writeln!(f, "Fleet size:            {}", self.fleet_size)?;
        writeln!(f, "Eligible vehicles:     {}", self.eligible_count)?;
        writeln!(f, "Participating:         {}", self.participating_count)?;
        writeln!(f, "Requested energy:      {:.3} kWh", self.requested_kwh)?;
        writeln!(f, "Delivered energy:      {:.3} kWh", self.delivered_kwh)?;
        writeln!(f, "Shortfall:             {:.3} kWh", self.shortfall_kwh)?;
        writeln!(f, "Delivered share:       {:.1}%", self.delivered_pct)?;
        write!(f, "Mean final battery:    {:.1}%", self.mean_final_battery_pct)
    }
}
