//! Distance labels for list cards and map popups.

/// Placeholder rendered when no meaningful distance exists.
pub const UNKNOWN_DISTANCE: &str = "—";

/// Formats a distance in kilometers for display.
///
/// Below 1 km the value is shown in meters rounded to the nearest 10 m,
/// otherwise in kilometers with one decimal. `NaN`, infinite and negative
/// input render [`UNKNOWN_DISTANCE`].
///
/// # Example
/// ```
/// use pharmloc_geo::format_distance;
///
/// assert_eq!(format_distance(0.35), "350 m");
/// assert_eq!(format_distance(4.2), "4.2 km");
/// ```
pub fn format_distance(distance_km: f64) -> String {
    if !distance_km.is_finite() || distance_km < 0.0 {
        return UNKNOWN_DISTANCE.to_string();
    }

    if distance_km < 1.0 {
        let meters = (distance_km * 100.0).round() * 10.0;
        // 995 m and up round to 1000 m, which reads better as "1.0 km".
        if meters < 1000.0 {
            return format!("{} m", meters as u32);
        }
    }

    format!("{:.1} km", distance_km)
}

/// Formats an optional distance, rendering `None` as [`UNKNOWN_DISTANCE`].
pub fn format_optional_distance(distance_km: Option<f64>) -> String {
    distance_km.map_or_else(|| UNKNOWN_DISTANCE.to_string(), format_distance)
}
