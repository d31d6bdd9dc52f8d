//! Geolocation ranking for the pharmacy locator.
//!
//! This crate provides:
//! - Haversine distance calculations
//! - Distance labels for list and map views
//! - Stable proximity ranking that never drops entities
//! - Coordinate parsing from backend records (numeric fields, GeoJSON, WKT)
//! - The geolocation acquisition interface with its three failure kinds
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use pharmloc_geo::{distance_km, format_distance, Coordinate};
//!
//! let conakry = Coordinate::new(9.509, -13.712);
//! let kaloum = Coordinate::new(9.609, -13.712);
//!
//! let km = distance_km(&conakry, &kaloum);
//! assert!((km - 11.1).abs() < 0.111);
//! assert_eq!(format_distance(km), "11.1 km");
//! ```

mod error;
mod format;
mod haversine;
mod parse;
pub mod locate;
pub mod rank;
pub mod record;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::{GeoError, GeoErrorCode, Result};
pub use format::{format_distance, format_optional_distance, UNKNOWN_DISTANCE};
pub use haversine::{distance_km, distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use locate::{
    reference_coordinate, AccuracyLevel, AccuracyThresholds, FixedSource, LocationError,
    Position, PositionSource, UnavailableSource,
};
pub use parse::{
    coordinate_from_fields, parse_coordinate_value, parse_postgis_point, parse_wkt_point,
};
pub use rank::{nearest, rank_by_proximity, within_radius, GeoTagged, Ranked};
pub use record::{annotate_ranking, rank_records_json, GeoRecord};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "({latitude}, {longitude}) is outside [-90, 90] x [-180, 180]"
            )))
        }
    }

    /// Returns true if both values are finite and inside the WGS84 ranges.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(9.509, -13.712);
        assert_eq!(coord.latitude, 9.509);
        assert_eq!(coord.longitude, -13.712);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(Coordinate::try_new(9.5, -13.7).is_ok());

        let err = Coordinate::try_new(120.0, 0.0).unwrap_err();
        assert_eq!(err.code(), GeoErrorCode::InvalidCoordinate);
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (9.509, -13.712).into();
        assert_eq!(coord.latitude, 9.509);
    }
}
