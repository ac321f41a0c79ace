//! Solar forecast payloads and the energy gap between two forecasts.
//!
//! The forecast service itself is external; these types mirror its request
//! and response bodies so callers can exchange them as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{V2gError, ensure_finite};

/// PV site descriptor accepted by the forecast service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PvSite {
    pub latitude: f64,
    pub longitude: f64,
    /// Installed peak capacity (kWp).
    pub capacity_kwp: f64,
    #[serde(default)]
    pub inverter_type: String,
}

/// Body of a forecast request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub site: PvSite,
    /// Forecast initialisation time (ISO-8601, UTC).
    pub timestamp: DateTime<Utc>,
}

impl ForecastRequest {
    /// Day-ahead request: initialised at midnight UTC of `now`'s day.
    pub fn day_ahead(site: PvSite, now: DateTime<Utc>) -> Self {
        let midnight = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map_or(now, |t| t.and_utc());
        Self {
            site,
            timestamp: midnight,
        }
    }

    /// Rolling request: initialised at `now`.
    pub fn rolling(site: PvSite, now: DateTime<Utc>) -> Self {
        Self {
            site,
            timestamp: now,
        }
    }
}

/// One time-indexed prediction. Fields other than `power_kw` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted PV output (kW).
    pub power_kw: f64,
}

/// Body of a forecast response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    /// Time the forecast was generated, as reported by the service.
    pub timestamp: String,
    pub predictions: Vec<Prediction>,
}

impl ForecastResponse {
    fn power_kw(&self) -> impl Iterator<Item = f64> + '_ {
        self.predictions.iter().map(|p| p.power_kw)
    }
}

/// Integration window for [`energy_gap_kwh`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GapWindow {
    /// Number of leading predictions to integrate (>= 2).
    pub points: usize,
    /// Spacing between predictions (hours, > 0).
    pub step_hours: f64,
}

impl Default for GapWindow {
    fn default() -> Self {
        Self {
            points: 3,
            step_hours: 0.25,
        }
    }
}

/// Trapezoidal energy (kWh) of evenly spaced power samples.
fn trapezoid_kwh(values: &[f64], step_hours: f64) -> f64 {
    values
        .windows(2)
        .map(|pair| (pair[0] + pair[1]) * 0.5 * step_hours)
        .sum()
}

/// Energy difference between the rolling and the day-ahead forecast (kWh).
///
/// Both forecasts are aligned by position: the first `window.points`
/// predictions of each are integrated with the trapezoid rule. A negative
/// result means the site now expects less energy than planned, i.e. the
/// fleet should discharge.
///
/// # Errors
///
/// Returns [`V2gError::InvalidArgument`] if the window is malformed or either
/// forecast holds fewer than `window.points` predictions.
pub fn energy_gap_kwh(
    day_ahead: &ForecastResponse,
    rolling: &ForecastResponse,
    window: &GapWindow,
) -> Result<f64, V2gError> {
    if window.points < 2 {
        return Err(V2gError::invalid("points", "must be >= 2"));
    }
    ensure_finite("step_hours", window.step_hours)?;
    if window.step_hours <= 0.0 {
        return Err(V2gError::invalid("step_hours", "must be > 0"));
    }

    let take = |field: &'static str, forecast: &ForecastResponse| {
        let values: Vec<f64> = forecast.power_kw().take(window.points).collect();
        if values.len() < window.points {
            return Err(V2gError::invalid(
                field,
                format!(
                    "needs at least {} predictions, got {}",
                    window.points,
                    values.len()
                ),
            ));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(V2gError::invalid(
                field,
                format!("power_kw must be finite, got {bad}"),
            ));
        }
        Ok(values)
    };

    let planned = trapezoid_kwh(&take("day_ahead", day_ahead)?, window.step_hours);
    let current = trapezoid_kwh(&take("rolling", rolling)?, window.step_hours);
    Ok(current - planned)
}
