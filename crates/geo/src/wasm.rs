//! WASM bindings for the geo crate.
//!
//! The web front end calls these in-process from the search, list and map
//! pages.

use crate::record::rank_records_json;
use crate::{AccuracyLevel, AccuracyThresholds, Coordinate};
use wasm_bindgen::prelude::*;

/// Distance between two coordinates in kilometers.
#[wasm_bindgen(js_name = distanceKm)]
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let from = Coordinate::new(lat1, lng1);
    let to = Coordinate::new(lat2, lng2);
    crate::distance_km(&from, &to)
}

/// Distance label ("350 m", "4.2 km").
#[wasm_bindgen(js_name = formatDistance)]
pub fn format_distance(distance_km: f64) -> String {
    crate::format_distance(distance_km)
}

/// Rank backend pharmacy rows by proximity.
///
/// # Arguments
/// * `records_json` - JSON array of backend rows
/// * `has_reference` - false when the user position is unknown
/// * `user_lat` - User's latitude
/// * `user_lng` - User's longitude
///
/// # Returns
/// JSON array of the rows in ranked order, each with `distanceKm` and
/// `distanceLabel` added
#[wasm_bindgen(js_name = rankRecords)]
pub fn rank_records(
    records_json: &str,
    has_reference: bool,
    user_lat: f64,
    user_lng: f64,
) -> Result<String, JsValue> {
    let reference = has_reference.then(|| Coordinate::new(user_lat, user_lng));
    rank_records_json(records_json, reference.as_ref())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Accuracy label for a fix radius, using the default thresholds.
#[wasm_bindgen(js_name = accuracyLabel)]
pub fn accuracy_label(accuracy_meters: f64) -> String {
    AccuracyLevel::classify(accuracy_meters, &AccuracyThresholds::default())
        .label()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: &str = r#"[
        {"id": 1, "latitude": 9.545, "longitude": -13.7},
        {"id": 2},
        {"id": 3, "latitude": 9.518, "longitude": -13.7}
    ]"#;

    fn ids(json: &str) -> Vec<i64> {
        let rows: Vec<serde_json::Value> = serde_json::from_str(json).unwrap();
        rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_rank_records_with_reference() {
        let out = rank_records(ROWS, true, 9.5, -13.7).unwrap();
        assert_eq!(ids(&out), vec![3, 1, 2]);
    }

    #[test]
    fn test_rank_records_ignores_coordinates_without_reference() {
        // 0/0 would be a valid coordinate; the flag alone decides.
        let out = rank_records(ROWS, false, 0.0, 0.0).unwrap();
        assert_eq!(ids(&out), vec![1, 2, 3]);

        let rows: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert!(rows.iter().all(|r| r["distanceKm"].is_null()));
    }

    #[test]
    fn test_scalar_bindings() {
        assert_eq!(format_distance(0.35), "350 m");
        assert_eq!(distance_km(9.5, -13.7, 9.5, -13.7), 0.0);
        assert_eq!(accuracy_label(30.0), "Bonne");
    }
}
