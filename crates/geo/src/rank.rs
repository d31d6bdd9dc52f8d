//! Proximity ranking with optional parallelism.
//!
//! Used by the pharmacy search, the list view and the map view. Ranking
//! never drops an entity: those without a usable coordinate keep their
//! input order at the end of the list.

use crate::{distance_km, format_optional_distance, Coordinate};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Anything that may carry a location.
pub trait GeoTagged {
    /// The entity's coordinate, or `None` when it has no (complete) location.
    fn coordinate(&self) -> Option<Coordinate>;
}

impl GeoTagged for Coordinate {
    fn coordinate(&self) -> Option<Coordinate> {
        Some(*self)
    }
}

impl GeoTagged for Option<Coordinate> {
    fn coordinate(&self) -> Option<Coordinate> {
        *self
    }
}

/// An entity paired with its distance to the reference coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    /// The ranked entity
    pub entity: T,
    /// Distance in kilometers, `None` when either side has no coordinate
    pub distance_km: Option<f64>,
}

impl<T> Ranked<T> {
    /// Display label for the distance ("350 m", "4.2 km" or the placeholder).
    pub fn distance_label(&self) -> String {
        format_optional_distance(self.distance_km)
    }

    /// Unwraps the ranked entity.
    pub fn into_inner(self) -> T {
        self.entity
    }
}

/// Ranks entities by distance to `reference`, closest first.
///
/// With no reference (location not granted yet) the entities come back in
/// input order without distances. Entities without a coordinate sort after
/// every located one. The sort is stable, so ties keep their input order.
///
/// # Example
/// ```
/// use pharmloc_geo::{rank_by_proximity, Coordinate};
///
/// let user = Coordinate::new(9.5, -13.7);
/// let pharmacies = vec![
///     Some(Coordinate::new(9.55, -13.7)),
///     None,
///     Some(Coordinate::new(9.51, -13.7)),
/// ];
///
/// let ranked = rank_by_proximity(Some(&user), &pharmacies);
/// assert_eq!(ranked[0].entity, pharmacies[2]);
/// assert_eq!(ranked[2].distance_km, None);
/// ```
pub fn rank_by_proximity<T>(reference: Option<&Coordinate>, entities: &[T]) -> Vec<Ranked<T>>
where
    T: GeoTagged + Clone + Sync,
{
    let Some(origin) = usable_reference(reference) else {
        return entities
            .iter()
            .cloned()
            .map(|entity| Ranked { entity, distance_km: None })
            .collect();
    };

    let distances = distances_from(&origin, entities);
    let located = distances.iter().filter(|d| d.is_some()).count();

    let mut ranked: Vec<Ranked<T>> = entities
        .iter()
        .cloned()
        .zip(distances)
        .map(|(entity, distance_km)| Ranked { entity, distance_km })
        .collect();

    // slice::sort_by is stable
    ranked.sort_by(|a, b| compare_distance(a.distance_km, b.distance_km));

    debug!(
        total = ranked.len(),
        located,
        nearest_km = ?ranked.first().and_then(|r| r.distance_km),
        "Ranked by proximity"
    );

    ranked
}

/// The `limit` closest entries of the ranking.
pub fn nearest<T>(
    reference: Option<&Coordinate>,
    entities: &[T],
    limit: usize,
) -> Vec<Ranked<T>>
where
    T: GeoTagged + Clone + Sync,
{
    let mut ranked = rank_by_proximity(reference, entities);
    ranked.truncate(limit);
    ranked
}

/// Ranked entities no further than `radius_km` from the reference.
///
/// Unlike [`rank_by_proximity`] this is a filter: entities without a
/// distance are left out, and without a reference nothing qualifies.
pub fn within_radius<T>(
    reference: Option<&Coordinate>,
    entities: &[T],
    radius_km: f64,
) -> Vec<Ranked<T>>
where
    T: GeoTagged + Clone + Sync,
{
    let mut ranked = rank_by_proximity(reference, entities);
    ranked.retain(|r| r.distance_km.is_some_and(|d| d <= radius_km));
    ranked
}

fn usable_reference(reference: Option<&Coordinate>) -> Option<Coordinate> {
    let reference = *reference?;
    if reference.is_valid() {
        Some(reference)
    } else {
        warn!(
            latitude = reference.latitude,
            longitude = reference.longitude,
            "Ignoring invalid reference coordinate"
        );
        None
    }
}

fn distances_from<T: GeoTagged + Sync>(origin: &Coordinate, entities: &[T]) -> Vec<Option<f64>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        entities
            .par_iter()
            .map(|entity| distance_to(origin, entity))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        entities
            .iter()
            .map(|entity| distance_to(origin, entity))
            .collect()
    }
}

#[inline]
fn distance_to<T: GeoTagged>(origin: &Coordinate, entity: &T) -> Option<f64> {
    entity
        .coordinate()
        .filter(Coordinate::is_valid)
        .map(|coord| distance_km(origin, &coord))
}

/// Ascending by distance, `None` after every number.
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
