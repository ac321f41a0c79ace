//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ensure_finite;
use crate::fleet::{self, FleetParams};
use crate::settlement::SettlementTerms;
use crate::v2g::AllocationParams;

/// Top-level scenario configuration parsed from TOML.
///
/// All tables have defaults matching the `oxford` preset. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::oxford`] for the built-in default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Synthetic fleet generation parameters.
    #[serde(default)]
    pub fleet: FleetParams,
    /// Allocation round parameters.
    #[serde(default)]
    pub allocation: AllocationConfig,
    /// Imbalance settlement terms.
    #[serde(default)]
    pub settlement: SettlementTerms,
}

/// Allocation round parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllocationConfig {
    /// Signed energy delta to allocate (kWh; negative = shortfall).
    pub delta_kwh: f64,
    /// Usable pack size of every vehicle (kWh).
    pub battery_capacity_kwh: f64,
    /// Eligibility radius around the center (km).
    pub max_distance_km: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        let params = AllocationParams::default();
        Self {
            delta_kwh: -250.0,
            battery_capacity_kwh: params.battery_capacity_kwh,
            max_distance_km: params.max_distance_km,
        }
    }
}

impl AllocationConfig {
    /// Allocator parameters of this table.
    pub fn params(&self) -> AllocationParams {
        AllocationParams {
            battery_capacity_kwh: self.battery_capacity_kwh,
            max_distance_km: self.max_distance_km,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"fleet.max_radius_km"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the default scenario: 1000 cars around a solar farm near Oxford.
    pub fn oxford() -> Self {
        Self {
            fleet: FleetParams::default(),
            allocation: AllocationConfig::default(),
            settlement: SettlementTerms::default(),
        }
    }

    /// Returns the dense-urban preset: many cars packed close to the site.
    pub fn dense_urban() -> Self {
        Self {
            fleet: FleetParams {
                count: 3000,
                max_radius_km: 12.0,
                min_battery: 15.0,
                max_battery: 90.0,
                trip_probability: 0.25,
                ..FleetParams::default()
            },
            allocation: AllocationConfig {
                delta_kwh: -600.0,
                max_distance_km: 8.0,
                ..AllocationConfig::default()
            },
            settlement: SettlementTerms::default(),
        }
    }

    /// Returns the midday-surplus preset: solar over-delivers and cars soak it up.
    pub fn midday_surplus() -> Self {
        Self {
            fleet: FleetParams {
                min_battery: 25.0,
                max_battery: 70.0,
                trip_probability: 0.05,
                ..FleetParams::default()
            },
            allocation: AllocationConfig {
                delta_kwh: 400.0,
                battery_capacity_kwh: 60.0,
                ..AllocationConfig::default()
            },
            settlement: SettlementTerms {
                price_per_kwh: 0.08,
                ..SettlementTerms::default()
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["oxford", "dense_urban", "midday_surplus"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "oxford" => Ok(Self::oxford()),
            "dense_urban" => Ok(Self::dense_urban()),
            "midday_surplus" => Ok(Self::midday_surplus()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all tables and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Each table defers
    /// to the library validator for its section.
    pub fn validate(&self) -> Vec<ConfigError> {
        let allocation = ensure_finite("delta_kwh", self.allocation.delta_kwh)
            .and_then(|()| self.allocation.params().validate());
        [
            ("fleet", fleet::validate(&self.fleet)),
            ("allocation", allocation),
            ("settlement", self.settlement.validate()),
        ]
        .into_iter()
        .filter_map(|(table, result)| {
            result.err().map(|e| ConfigError {
                field: format!("{table}.{}", e.field()),
                message: e.message().to_string(),
            })
        })
        .collect()
    }
}
