//! Coordinate parsing for backend records.
//!
//! Pharmacy rows arrive with:
//! - `latitude` / `longitude` fields, as numbers or numeric strings
//! - or a PostGIS `location` column: `{"type": "Point", "coordinates": [lng, lat]}`
//!   or `POINT(lng lat)`
//!
//! Anything that cannot be read yields `None`; a partial pair counts as absent.

use crate::{Coordinate, GeoError, Result};
use serde_json::Value;

/// Reads a single coordinate component from a JSON value.
///
/// Accepts finite numbers and strings holding a finite number. `null`,
/// empty strings and anything else give `None`.
pub fn parse_coordinate_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()
        }
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Builds a coordinate from a latitude/longitude field pair.
///
/// # Example
/// ```
/// use pharmloc_geo::coordinate_from_fields;
/// use serde_json::json;
///
/// let coord = coordinate_from_fields(Some(&json!("9.509")), Some(&json!(-13.712))).unwrap();
/// assert_eq!(coord.latitude, 9.509);
///
/// // Half a coordinate is no coordinate.
/// assert!(coordinate_from_fields(Some(&json!(9.509)), None).is_none());
/// ```
pub fn coordinate_from_fields(
    latitude: Option<&Value>,
    longitude: Option<&Value>,
) -> Option<Coordinate> {
    let lat = parse_coordinate_value(latitude?)?;
    let lng = parse_coordinate_value(longitude?)?;
    let coord = Coordinate::new(lat, lng);
    coord.is_valid().then_some(coord)
}

/// Parse a PostGIS point from a JSON value.
///
/// # Returns
/// * `Some(Coordinate)` if parsing succeeds
/// * `None` if the value is null or cannot be parsed
///
/// # Example
/// ```
/// use pharmloc_geo::parse_postgis_point;
/// use serde_json::json;
///
/// // GeoJSON format
/// let geojson = json!({"type": "Point", "coordinates": [-13.712, 9.509]});
/// let coord = parse_postgis_point(&geojson).unwrap();
/// assert!((coord.latitude - 9.509).abs() < 0.0001);
///
/// // WKT format
/// let wkt = json!("POINT(-13.712 9.509)");
/// let coord = parse_postgis_point(&wkt).unwrap();
/// assert!((coord.latitude - 9.509).abs() < 0.0001);
/// ```
pub fn parse_postgis_point(value: &Value) -> Option<Coordinate> {
    let coord = match value {
        Value::Object(_) => {
            let coords = value.get("coordinates")?.as_array()?;
            if coords.len() < 2 {
                return None;
            }
            Coordinate::new(coords[1].as_f64()?, coords[0].as_f64()?)
        }
        Value::String(wkt) => parse_wkt_point(wkt).ok()?,
        _ => return None,
    };
    coord.is_valid().then_some(coord)
}

/// Parse a WKT POINT string.
///
/// Format: `POINT(longitude latitude)`
pub fn parse_wkt_point(wkt: &str) -> Result<Coordinate> {
    let inner = wkt
        .trim()
        .strip_prefix("POINT")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| {
            GeoError::InvalidWkt(format!("Expected POINT(lng lat), got: {}", wkt))
        })?;

    let mut parts = inner.split_whitespace();
    let (Some(lng), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(GeoError::InvalidWkt(format!(
            "Expected 2 coordinates, got: {}",
            inner.trim()
        )));
    };

    let lng: f64 = lng
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid longitude: {}", lng)))?;
    let lat: f64 = lat
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid latitude: {}", lat)))?;

    Ok(Coordinate::new(lat, lng))
}
