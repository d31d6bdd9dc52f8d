//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// Out-of-range input is not rejected; the formula is applied as-is.
///
/// # Example
/// ```
/// use pharmloc_geo::{distance_km, Coordinate};
///
/// let conakry = Coordinate::new(9.509, -13.712);
/// assert_eq!(distance_km(&conakry, &conakry), 0.0);
/// ```
#[inline]
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    distance_with_radius(a, b, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two coordinates in meters.
#[inline]
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    distance_with_radius(a, b, EARTH_RADIUS_M)
}

#[inline]
fn distance_with_radius(a: &Coordinate, b: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = a.to_radians();
    let (lat2, lon2) = b.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let h = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    radius * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CONAKRY: Coordinate = Coordinate::new(9.509, -13.712);
    const KANKAN: Coordinate = Coordinate::new(10.3854, -9.3057);
    const DAKAR: Coordinate = Coordinate::new(14.7167, -17.4677);
    const PARIS: Coordinate = Coordinate::new(48.8566, 2.3522);

    #[test]
    fn test_conakry_shifted_by_a_tenth_of_a_degree() {
        let shifted = Coordinate::new(CONAKRY.latitude + 0.1, CONAKRY.longitude);
        let distance = distance_km(&CONAKRY, &shifted);
        assert!((distance - 11.1).abs() <= 0.111, "Conakry+0.1°: {}", distance);
    }

    #[test]
    fn test_conakry_to_dakar() {
        let distance = distance_km(&CONAKRY, &DAKAR);
        // Expected: ~708 km
        assert!((distance - 708.0).abs() < 10.0, "Conakry-Dakar: {}", distance);
    }

    #[test]
    fn test_conakry_to_paris() {
        let distance = distance_km(&CONAKRY, &PARIS);
        // Expected: ~4,625 km
        assert!((distance - 4625.0).abs() < 25.0, "Conakry-Paris: {}", distance);
    }

    #[test]
    fn test_same_point_zero_distance() {
        assert_eq!(distance_km(&KANKAN, &KANKAN), 0.0);
    }

    #[test]
    fn test_antipodes_do_not_produce_nan() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let distance = distance_km(&a, &b);
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 0.001);
    }

    #[test]
    fn test_meters_conversion() {
        let km = distance_km(&CONAKRY, &KANKAN);
        let meters = distance_meters(&CONAKRY, &KANKAN);
        assert!((meters - km * 1000.0).abs() < 1.0);
    }

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng))
    }

    proptest! {
        #[test]
        fn prop_identity_is_zero(a in coordinate()) {
            prop_assert_eq!(distance_km(&a, &a), 0.0);
        }

        #[test]
        fn prop_symmetric_and_non_negative(a in coordinate(), b in coordinate()) {
            let ab = distance_km(&a, &b);
            let ba = distance_km(&b, &a);
            prop_assert!(ab >= 0.0);
            prop_assert!((ab - ba).abs() < 1e-9);
        }
    }
}
