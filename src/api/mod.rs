//! REST API over a generated fleet.
//!
//! Endpoints:
//! - `GET /scenario` — scenario configuration
//! - `GET /fleet` — the generated vehicles
//! - `POST /allocate` — allocate a posted delta over the fleet
//! - `POST /dispatch` — derive the delta from two forecasts, price and allocate it

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::config::ScenarioConfig;
use crate::fleet::Vehicle;

pub use types::{AllocateRequest, AllocationResponse, DispatchRequest, DispatchResponse, ErrorResponse};

/// Immutable application state shared across all request handlers.
///
/// Built once from the scenario and wrapped in `Arc`; handlers only read it.
pub struct AppState {
    /// Scenario the fleet was generated from.
    pub scenario: ScenarioConfig,
    /// Generated fleet snapshot.
    pub fleet: Vec<Vehicle>,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/scenario", get(handlers::get_scenario))
        .route("/fleet", get(handlers::get_fleet))
        .route("/allocate", post(handlers::post_allocate))
        .route("/dispatch", post(handlers::post_dispatch))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
