use crate::config::constant::{EARTH_RADIUS_KM, ROAD_WINDINESS_FACTOR};
use crate::domain::types::Location;

/// Estimated road distance in km: haversine great-circle distance scaled by the
/// road windiness factor. Identical points yield exactly 0.
pub fn distance(a: &Location, b: &Location) -> f64 {
    haversine_km(a.coords(), b.coords()) * ROAD_WINDINESS_FACTOR
}

/// Great-circle distance between two `(lat, lon)` pairs in degrees.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    if from == to {
        return 0.0;
    }
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    // Absolute deltas keep the result bit-identical under argument swap.
    let delta_lat = (lat2 - lat1).abs().to_radians();
    let delta_lon = (lon2 - lon1).abs().to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(id: &str, lat: f64, lon: f64) -> Location {
        Location::new(id, lat, lon).unwrap()
    }

    #[test]
    fn identical_points_are_zero() {
        let a = loc("A", 13.7563, 100.5018);
        assert_eq!(distance(&a, &a), 0.0);
        let poles = loc("N", 90.0, 0.0);
        assert_eq!(distance(&poles, &loc("N2", 90.0, 0.0)), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = loc("A", 13.72, 100.55);
        let b = loc("B", 13.80, 100.45);
        assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn one_degree_of_latitude() {
        // 1 degree along a meridian is ~111.19 km great-circle.
        let km = haversine_km((0.0, 0.0), (1.0, 0.0));
        assert!((km - 111.195).abs() < 0.01, "got {km}");
        let road = distance(&loc("A", 0.0, 0.0), &loc("B", 1.0, 0.0));
        assert!((road - km * 1.4).abs() < 1e-9);
    }

    #[test]
    fn antipodal_points_stay_finite() {
        let km = haversine_km((0.0, 0.0), (0.0, 180.0));
        assert!(km.is_finite());
        assert!((km - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }
}
