//! API request and response bodies.

use serde::{Deserialize, Serialize};

use crate::forecast::{ForecastResponse, GapWindow};
use crate::report::AllocationReport;
use crate::v2g::Allocation;

/// Body of `POST /allocate`.
#[derive(Debug, Deserialize)]
pub struct AllocateRequest {
    /// Signed energy delta (kWh; negative = shortfall).
    pub delta_kwh: f64,
}

/// Allocation plus its summary.
#[derive(Debug, Serialize)]
pub struct AllocationResponse {
    pub allocation: Allocation,
    pub report: AllocationReport,
}

/// Body of `POST /dispatch`: two responses of the forecast service for one site.
#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    /// Forecast initialised at midnight.
    pub day_ahead: ForecastResponse,
    /// Forecast initialised now.
    pub rolling: ForecastResponse,
    /// Integration window; defaults to three quarter-hourly points.
    #[serde(default)]
    pub window: GapWindow,
}

/// Result of `POST /dispatch`.
#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    /// Rolling minus day-ahead energy over the window (kWh).
    pub delta_kwh: f64,
    /// Settlement value of the delta.
    pub value: f64,
    pub allocation: Allocation,
    pub report: AllocationReport,
}

/// Error body returned with 4xx status codes.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
