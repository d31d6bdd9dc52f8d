//! Backend pharmacy rows as geo-tagged entities.

use crate::{
    coordinate_from_fields, format_optional_distance, parse_postgis_point, rank_by_proximity,
    Coordinate, GeoTagged, Ranked, Result,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names read from backend rows.
pub const LATITUDE_FIELD: &str = "latitude";
/// Longitude column.
pub const LONGITUDE_FIELD: &str = "longitude";
/// PostGIS point column, used when the numeric pair is missing.
pub const LOCATION_FIELD: &str = "location";
/// Field added by [`GeoRecord::annotated`] with the distance in km.
pub const DISTANCE_KM_FIELD: &str = "distanceKm";
/// Field added by [`GeoRecord::annotated`] with the display label.
pub const DISTANCE_LABEL_FIELD: &str = "distanceLabel";

/// An arbitrary JSON object from the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoRecord(pub Map<String, Value>);

impl GeoRecord {
    /// Wraps a JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Field lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A copy with `distanceKm` and `distanceLabel` added.
    pub fn annotated(&self, distance_km: Option<f64>) -> Self {
        let mut fields = self.0.clone();
        fields.insert(DISTANCE_KM_FIELD.to_string(), distance_km.into());
        fields.insert(
            DISTANCE_LABEL_FIELD.to_string(),
            Value::String(format_optional_distance(distance_km)),
        );
        Self(fields)
    }
}

impl GeoTagged for GeoRecord {
    fn coordinate(&self) -> Option<Coordinate> {
        coordinate_from_fields(self.get(LATITUDE_FIELD), self.get(LONGITUDE_FIELD))
            .or_else(|| self.get(LOCATION_FIELD).and_then(parse_postgis_point))
    }
}

impl From<Map<String, Value>> for GeoRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Flattens a ranking back into rows carrying `distanceKm` and `distanceLabel`.
pub fn annotate_ranking(ranked: &[Ranked<GeoRecord>]) -> Vec<GeoRecord> {
    ranked
        .iter()
        .map(|r| r.entity.annotated(r.distance_km))
        .collect()
}

/// Ranks a JSON array of backend rows and returns the annotated rows as JSON.
///
/// # Example
/// ```
/// use pharmloc_geo::{record::rank_records_json, Coordinate};
///
/// let rows = r#"[{"id": 1}, {"id": 2, "latitude": 9.51, "longitude": -13.7}]"#;
/// let out = rank_records_json(rows, Some(&Coordinate::new(9.5, -13.7))).unwrap();
///
/// let ranked: serde_json::Value = serde_json::from_str(&out).unwrap();
/// assert_eq!(ranked[0]["id"], 2);
/// assert_eq!(ranked[1]["distanceLabel"], "—");
/// ```
pub fn rank_records_json(json: &str, reference: Option<&Coordinate>) -> Result<String> {
    let records: Vec<GeoRecord> = serde_json::from_str(json)?;
    let ranked = rank_by_proximity(reference, &records);
    Ok(serde_json::to_string(&annotate_ranking(&ranked))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> GeoRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_numeric_string_columns() {
        let r = record(json!({"id": 7, "latitude": "9.52", "longitude": "-13.70"}));
        assert_eq!(r.coordinate(), Some(Coordinate::new(9.52, -13.70)));
    }

    #[test]
    fn test_location_column_fallback() {
        let r = record(json!({"id": 8, "location": "POINT(-13.70 9.52)"}));
        assert_eq!(r.coordinate(), Some(Coordinate::new(9.52, -13.70)));
    }

    #[test]
    fn test_partial_coordinates_are_absent() {
        let r = record(json!({"id": 9, "latitude": 9.52}));
        assert_eq!(r.coordinate(), None);
    }

    #[test]
    fn test_annotated_adds_fields_without_touching_source() {
        let r = record(json!({"id": 1, "name": "Pharmacie Camayenne"}));
        let a = r.annotated(Some(0.35));

        assert_eq!(a.get(DISTANCE_KM_FIELD), Some(&json!(0.35)));
        assert_eq!(a.get(DISTANCE_LABEL_FIELD), Some(&json!("350 m")));
        assert!(r.get(DISTANCE_KM_FIELD).is_none());

        let none = r.annotated(None);
        assert_eq!(none.get(DISTANCE_KM_FIELD), Some(&Value::Null));
    }

    fn ranked_rows(json: &str, reference: Option<&Coordinate>) -> Vec<Value> {
        let out = rank_records_json(json, reference).unwrap();
        serde_json::from_str(&out).unwrap()
    }

    const ROWS: &str = r#"[
        {"id": 1, "latitude": 9.545, "longitude": -13.7},
        {"id": 2, "name": "Pharmacie Centrale"},
        {"id": 3, "latitude": "9.518", "longitude": "-13.7"}
    ]"#;

    #[test]
    fn test_rank_records_json_with_reference() {
        let rows = ranked_rows(ROWS, Some(&Coordinate::new(9.5, -13.7)));

        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(rows[0][DISTANCE_LABEL_FIELD], "2.0 km");
        assert_eq!(rows[1][DISTANCE_LABEL_FIELD], "5.0 km");
    }

    #[test]
    fn test_rank_records_json_without_reference_keeps_order() {
        let rows = ranked_rows(ROWS, None);

        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(rows.iter().all(|r| r[DISTANCE_KM_FIELD].is_null()));
    }

    #[test]
    fn test_rank_records_json_marks_unlocated_rows() {
        let rows = ranked_rows(ROWS, Some(&Coordinate::new(9.5, -13.7)));

        let unlocated = &rows[2];
        assert_eq!(unlocated["name"], "Pharmacie Centrale");
        assert!(unlocated[DISTANCE_KM_FIELD].is_null());
        assert_eq!(unlocated[DISTANCE_LABEL_FIELD], crate::UNKNOWN_DISTANCE);
    }

    #[test]
    fn test_rank_records_json_rejects_malformed_input() {
        let err = rank_records_json("[{\"id\": 1}", None).unwrap_err();
        assert_eq!(err.code(), crate::GeoErrorCode::JsonParsing);

        let err = rank_records_json(r#"{"id": 1}"#, None).unwrap_err();
        assert_eq!(err.code(), crate::GeoErrorCode::JsonParsing);
    }

    #[test]
    fn test_annotate_ranking() {
        let rows: Vec<GeoRecord> =
            serde_json::from_value(json!([{"id": 1, "latitude": 9.5035, "longitude": -13.7}]))
                .unwrap();
        let ranked = rank_by_proximity(Some(&Coordinate::new(9.5, -13.7)), &rows);

        let annotated = annotate_ranking(&ranked);
        assert_eq!(annotated[0].get(DISTANCE_LABEL_FIELD), Some(&json!("390 m")));
    }

    #[test]
    fn test_rank_backend_rows() {
        let rows: Vec<GeoRecord> = serde_json::from_value(json!([
            {"id": 1, "latitude": 9.545, "longitude": -13.7},
            {"id": 2},
            {"id": 3, "latitude": "9.518", "longitude": "-13.7"}
        ]))
        .unwrap();

        let ranked = rank_by_proximity(Some(&Coordinate::new(9.5, -13.7)), &rows);
        let ids: Vec<_> = ranked.iter().map(|r| r.entity.get("id").cloned()).collect();
        assert_eq!(ids, vec![Some(json!(3)), Some(json!(1)), Some(json!(2))]);
    }
}
