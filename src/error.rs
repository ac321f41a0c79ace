//! Error type shared by the fleet, allocation, forecast and settlement modules.

use thiserror::Error;

/// Errors returned by the pure V2G operations.
///
/// Every variant is raised at the boundary of an operation, before any
/// sampling or arithmetic takes place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum V2gError {
    /// An input parameter violates its documented constraint.
    #[error("invalid argument `{field}`: {message}")]
    InvalidArgument {
        /// Name of the offending parameter (e.g., `"max_radius_km"`).
        field: &'static str,
        /// Human-readable constraint description.
        message: String,
    },
}

impl V2gError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            message: message.into(),
        }
    }

    /// Name of the parameter that was rejected.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidArgument { field, .. } => field,
        }
    }

    /// The violated constraint, without the field name.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument { message, .. } => message,
        }
    }
}

/// Rejects NaN and infinite values for `field`.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<(), V2gError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(V2gError::invalid(field, format!("must be finite, got {value}")))
    }
}
