use std::f64::consts::TAU;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use super::geo;
use super::types::{FleetParams, Vehicle};
use crate::error::{V2gError, ensure_finite};

/// Generates a reproducible synthetic fleet from `params.seed`.
///
/// Two calls with identical parameters return identical fleets.
///
/// # Errors
///
/// Returns [`V2gError::InvalidArgument`] if any parameter is out of range.
/// Validation happens before any random draw.
pub fn generate(params: &FleetParams) -> Result<Vec<Vehicle>, V2gError> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    generate_with_rng(params, &mut rng)
}

/// Generates a fleet drawing from the supplied random source.
///
/// `params.seed` is ignored; the caller owns seeding. Values are drawn
/// column by column: every battery level, then every radius, then every trip
/// flag, then every bearing.
///
/// # Errors
///
/// Returns [`V2gError::InvalidArgument`] if any parameter is out of range.
pub fn generate_with_rng<R: Rng + ?Sized>(
    params: &FleetParams,
    rng: &mut R,
) -> Result<Vec<Vehicle>, V2gError> {
    validate(params)?;

    let n = params.count;
    let batteries: Vec<f64> = (0..n)
        .map(|_| rng.random_range(params.min_battery..=params.max_battery))
        .collect();
    let radii: Vec<f64> = (0..n)
        .map(|_| rng.random_range(params.min_radius_km..=params.max_radius_km))
        .collect();
    let trips: Vec<bool> = (0..n)
        .map(|_| rng.random_bool(params.trip_probability))
        .collect();
    let bearings: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..TAU)).collect();

    let fleet: Vec<Vehicle> = (0..n)
        .map(|i| {
            let (latitude, longitude) =
                geo::project(params.center_lat, params.center_lon, radii[i], bearings[i]);
            Vehicle {
                id: format!("Car_{}", i + 1),
                battery_percentage: batteries[i],
                distance_km: radii[i],
                trip_scheduled: trips[i],
                latitude,
                longitude,
            }
        })
        .collect();

    debug!(
        count = fleet.len(),
        with_trip = fleet.iter().filter(|v| v.trip_scheduled).count(),
        "generated fleet"
    );
    Ok(fleet)
}

/// Checks generator parameters without drawing anything.
///
/// # Errors
///
/// Returns the first violated constraint.
pub fn validate(params: &FleetParams) -> Result<(), V2gError> {
    ensure_finite("center_lat", params.center_lat)?;
    ensure_finite("center_lon", params.center_lon)?;
    ensure_finite("min_radius_km", params.min_radius_km)?;
    ensure_finite("max_radius_km", params.max_radius_km)?;
    ensure_finite("min_battery", params.min_battery)?;
    ensure_finite("max_battery", params.max_battery)?;
    ensure_finite("trip_probability", params.trip_probability)?;

    if params.center_lat.abs() >= 90.0 {
        return Err(V2gError::invalid(
            "center_lat",
            format!("must be strictly between -90 and 90, got {}", params.center_lat),
        ));
    }
    if params.min_radius_km < 0.0 {
        return Err(V2gError::invalid("min_radius_km", "must be >= 0"));
    }
    if params.min_radius_km > params.max_radius_km {
        return Err(V2gError::invalid(
            "min_radius_km",
            format!(
                "must be <= max_radius_km ({} > {})",
                params.min_radius_km, params.max_radius_km
            ),
        ));
    }
    if !(0.0..=100.0).contains(&params.min_battery) {
        return Err(V2gError::invalid("min_battery", "must be in [0, 100]"));
    }
    if !(0.0..=100.0).contains(&params.max_battery) {
        return Err(V2gError::invalid("max_battery", "must be in [0, 100]"));
    }
    if params.min_battery > params.max_battery {
        return Err(V2gError::invalid(
            "min_battery",
            format!(
                "must be <= max_battery ({} > {})",
                params.min_battery, params.max_battery
            ),
        ));
    }
    if !(0.0..=1.0).contains(&params.trip_probability) {
        return Err(V2gError::invalid(
            "trip_probability",
            format!("must be in [0.0, 1.0], got {}", params.trip_probability),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn params(count: usize) -> FleetParams {
        FleetParams {
            count,
            ..FleetParams::default()
        }
    }

    #[test]
    fn deterministic_for_same_seed() {
        let a = generate(&params(200)).unwrap();
        let b = generate(&params(200)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate(&params(50)).unwrap();
        let b = generate(&FleetParams {
            seed: 7,
            ..params(50)
        })
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn exact_count_and_unique_ids() {
        let fleet = generate(&params(321)).unwrap();
        assert_eq!(fleet.len(), 321);
        let ids: HashSet<&str> = fleet.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids.len(), 321);
        assert_eq!(fleet[0].id, "Car_1");
        assert_eq!(fleet[320].id, "Car_321");
    }

    #[test]
    fn empty_fleet_is_valid() {
        assert!(generate(&params(0)).unwrap().is_empty());
    }

    #[test]
    fn values_within_bounds() {
        let p = FleetParams {
            count: 500,
            min_radius_km: 2.0,
            max_radius_km: 5.0,
            min_battery: 35.0,
            max_battery: 60.0,
            ..FleetParams::default()
        };
        for v in generate(&p).unwrap() {
            assert!((35.0..=60.0).contains(&v.battery_percentage), "{v}");
            assert!((2.0..=5.0).contains(&v.distance_km), "{v}");
        }
    }

    #[test]
    fn degenerate_ranges_yield_constants() {
        let p = FleetParams {
            count: 10,
            min_radius_km: 3.0,
            max_radius_km: 3.0,
            min_battery: 55.0,
            max_battery: 55.0,
            ..FleetParams::default()
        };
        for v in generate(&p).unwrap() {
            assert_eq!(v.battery_percentage, 55.0);
            assert_eq!(v.distance_km, 3.0);
        }
    }

    #[test]
    fn trip_probability_extremes() {
        let none = generate(&FleetParams {
            trip_probability: 0.0,
            ..params(100)
        })
        .unwrap();
        assert!(none.iter().all(|v| !v.trip_scheduled));

        let all = generate(&FleetParams {
            trip_probability: 1.0,
            ..params(100)
        })
        .unwrap();
        assert!(all.iter().all(|v| v.trip_scheduled));
    }

    #[test]
    fn positions_lie_on_projected_circle() {
        let p = params(100);
        let lon_scale = geo::km_per_deg_lon(p.center_lat);
        for v in generate(&p).unwrap() {
            let dy = (v.latitude - p.center_lat) * geo::KM_PER_DEG_LAT;
            let dx = (v.longitude - p.center_lon) * lon_scale;
            assert!((dx.hypot(dy) - v.distance_km).abs() < 1e-6, "{v}");
        }
    }

    #[test]
    fn injected_rng_is_used() {
        let p = params(20);
        let mut rng = StdRng::seed_from_u64(p.seed);
        let injected = generate_with_rng(&p, &mut rng).unwrap();
        assert_eq!(injected, generate(&p).unwrap());
    }

    #[test]
    fn rejects_inverted_radius() {
        let err = generate(&FleetParams {
            min_radius_km: 10.0,
            max_radius_km: 5.0,
            ..params(10)
        })
        .unwrap_err();
        assert_eq!(err.field(), "min_radius_km");
    }

    #[test]
    fn rejects_inverted_battery() {
        let err = generate(&FleetParams {
            min_battery: 80.0,
            max_battery: 40.0,
            ..params(10)
        })
        .unwrap_err();
        assert_eq!(err.field(), "min_battery");
    }

    #[test]
    fn rejects_battery_above_full() {
        let err = generate(&FleetParams {
            max_battery: 120.0,
            ..params(10)
        })
        .unwrap_err();
        assert_eq!(err.field(), "max_battery");
    }

    #[test]
    fn rejects_bad_probability() {
        for p in [-0.1, 1.5, f64::NAN] {
            let err = generate(&FleetParams {
                trip_probability: p,
                ..params(10)
            })
            .unwrap_err();
            assert_eq!(err.field(), "trip_probability");
        }
    }

    #[test]
    fn rejects_polar_center() {
        let err = generate(&FleetParams {
            center_lat: 90.0,
            ..params(10)
        })
        .unwrap_err();
        assert_eq!(err.field(), "center_lat");
    }
}
