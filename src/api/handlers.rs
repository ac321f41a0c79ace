//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use super::AppState;
use super::types::{
    AllocateRequest, AllocationResponse, DispatchRequest, DispatchResponse, ErrorResponse,
};
use crate::config::ScenarioConfig;
use crate::error::V2gError;
use crate::fleet::Vehicle;
use crate::forecast::energy_gap_kwh;
use crate::runner::allocate_over;
use crate::settlement::value_generated;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(err: V2gError) -> ApiError {
    tracing::warn!(%err, "rejected request");
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Returns the scenario configuration.
///
/// `GET /scenario` → 200 + `ScenarioConfig` JSON
pub async fn get_scenario(State(state): State<Arc<AppState>>) -> Json<ScenarioConfig> {
    Json(state.scenario.clone())
}

/// Returns the generated fleet.
///
/// `GET /fleet` → 200 + `Vec<Vehicle>` JSON
pub async fn get_fleet(State(state): State<Arc<AppState>>) -> Json<Vec<Vehicle>> {
    Json(state.fleet.clone())
}

/// Allocates a posted delta over the fleet.
///
/// `POST /allocate {"delta_kwh": -120.0}` → 200 + `AllocationResponse`
/// Invalid delta → 400 + `ErrorResponse`
pub async fn post_allocate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AllocateRequest>,
) -> Result<Json<AllocationResponse>, ApiError> {
    let (allocation, report) =
        allocate_over(&state.scenario, &state.fleet, req.delta_kwh).map_err(bad_request)?;
    Ok(Json(AllocationResponse { allocation, report }))
}

/// Derives the delta from two forecasts, prices it, and allocates it.
///
/// `POST /dispatch` → 200 + `DispatchResponse`
/// Too few predictions → 400 + `ErrorResponse`
pub async fn post_dispatch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DispatchRequest>,
) -> Result<Json<DispatchResponse>, ApiError> {
    let delta_kwh = energy_gap_kwh(&req.day_ahead, &req.rolling, &req.window).map_err(bad_request)?;
    let value = value_generated(delta_kwh, &state.scenario.settlement);
    let (allocation, report) =
        allocate_over(&state.scenario, &state.fleet, delta_kwh).map_err(bad_request)?;
    Ok(Json(DispatchResponse {
        delta_kwh,
        value,
        allocation,
        report,
    }))
}
