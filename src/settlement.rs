//! Imbalance settlement value of a forecast delta.

use serde::{Deserialize, Serialize};

use crate::error::{V2gError, ensure_finite};

/// Commercial terms for valuing a delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettlementTerms {
    /// Energy price (currency per kWh).
    pub price_per_kwh: f64,
    /// Tolerance band below the forecast that is covered by the EV fleet (kWh).
    pub buffer_kwh: f64,
    /// Multiplier on the price for energy missing beyond the buffer.
    pub penalty_multiplier: f64,
    /// Premium paid to EV owners on buffered energy, as a fraction of price.
    pub ev_premium: f64,
}

impl Default for SettlementTerms {
    fn default() -> Self {
        Self {
            price_per_kwh: 0.1,
            buffer_kwh: 0.05,
            penalty_multiplier: 2.0,
            ev_premium: 0.2,
        }
    }
}

impl SettlementTerms {
    /// Rejects negative or non-finite terms.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), V2gError> {
        for (field, value) in [
            ("price_per_kwh", self.price_per_kwh),
            ("buffer_kwh", self.buffer_kwh),
            ("penalty_multiplier", self.penalty_multiplier),
            ("ev_premium", self.ev_premium),
        ] {
            ensure_finite(field, value)?;
            if value < 0.0 {
                return Err(V2gError::invalid(field, "must be >= 0"));
            }
        }
        Ok(())
    }
}

/// Value generated by a delta of `delta_kwh` under `terms`.
///
/// - Surplus (`delta > 0`): the buffer is sold at the energy price.
/// - Shortfall inside the buffer: the EV fleet covers the gap at a premium.
/// - Shortfall beyond the buffer: the buffer terms plus
///   `penalty_multiplier * price` on the remainder.
pub fn value_generated(delta_kwh: f64, terms: &SettlementTerms) -> f64 {
    let SettlementTerms {
        price_per_kwh: price,
        buffer_kwh: buffer,
        penalty_multiplier: fine,
        ev_premium: ev,
    } = *terms;

    if delta_kwh < -buffer {
        -(1.0 + ev) * price * buffer + buffer * price + fine * price * (-delta_kwh - buffer)
    } else if delta_kwh <= 0.0 {
        -(buffer + delta_kwh) * (1.0 + ev) * price + buffer * price
    } else {
        price * buffer
    }
}
