//! Flat-earth projection around a reference point.

/// Kilometres per degree of latitude used by the local projection.
pub const KM_PER_DEG_LAT: f64 = 111.0;

/// Mean Earth radius (km) for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per degree of longitude at `center_lat`.
pub fn km_per_deg_lon(center_lat: f64) -> f64 {
    KM_PER_DEG_LAT * center_lat.to_radians().cos()
}

/// Projects a polar offset onto the tangent plane at `(center_lat, center_lon)`.
///
/// `bearing_rad` is measured from north: the latitude offset uses its cosine
/// and the longitude offset its sine.
///
/// # Returns
///
/// `(latitude, longitude)` in degrees.
pub fn project(center_lat: f64, center_lon: f64, radius_km: f64, bearing_rad: f64) -> (f64, f64) {
    let lat = center_lat + radius_km * bearing_rad.cos() / KM_PER_DEG_LAT;
    let lon = center_lon + radius_km * bearing_rad.sin() / km_per_deg_lon(center_lat);
    (lat, lon)
}

/// Haversine distance in km between two coordinates in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn north_offset_moves_latitude_only() {
        let (lat, lon) = project(51.752, -1.2577, 11.1, 0.0);
        assert!((lat - 51.852).abs() < 1e-9);
        assert!((lon - -1.2577).abs() < 1e-9);
    }

    #[test]
    fn east_offset_scales_with_latitude() {
        let (lat, lon) = project(60.0, 0.0, 55.5, FRAC_PI_2);
        assert!((lat - 60.0).abs() < 1e-9);
        // cos(60 deg) = 0.5, so 55.5 km spans one degree of longitude
        assert!((lon - 1.0).abs() < 1e-9);
    }

    #[test]
    fn haversine_close_to_projection_for_short_ranges() {
        for &bearing in &[0.0, 0.7, FRAC_PI_2, PI, 4.0, 5.5] {
            let (lat, lon) = project(51.752, -1.2577, 25.0, bearing);
            let d = haversine_km(51.752, -1.2577, lat, lon);
            assert!((d - 25.0).abs() / 25.0 < 0.01, "bearing {bearing}: {d} km");
        }
    }

    #[test]
    fn haversine_zero_for_same_point() {
        assert_eq!(haversine_km(10.0, 20.0, 10.0, 20.0), 0.0);
    }
}
