//! Vehicle-to-grid allocation of an energy delta across a fleet.

mod allocator;
pub mod types;

pub use allocator::{allocate, battery_bias, distance_multiplier, is_eligible};
pub use types::{
    Allocation, AllocationParams, AllocationResult, AllocationStatus, Direction, EligibleVehicle,
};
