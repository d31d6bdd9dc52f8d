//! Geolocation acquisition interface.
//!
//! The device location API is an external collaborator. The core only needs a
//! single-shot request that yields a [`Position`] or one of three
//! [`LocationError`] kinds; every failure means "rank without a reference".

use crate::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

/// A position fix from the device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Radius of the 95% confidence circle, in meters
    pub accuracy_meters: f64,
}

impl Position {
    /// Creates a new position.
    pub const fn new(latitude: f64, longitude: f64, accuracy_meters: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters,
        }
    }

    /// The fix as a coordinate.
    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Classifies the fix accuracy.
    pub fn accuracy_level(&self, thresholds: &AccuracyThresholds) -> AccuracyLevel {
        AccuracyLevel::classify(self.accuracy_meters, thresholds)
    }
}

/// Why a position could not be obtained.
///
/// Codes match the platform geolocation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum LocationError {
    /// The user refused the location prompt
    #[error("Location permission denied")]
    PermissionDenied,
    /// The device could not determine a position
    #[error("Position unavailable")]
    PositionUnavailable,
    /// The platform gave up waiting for a fix
    #[error("Location request timed out")]
    Timeout,
}

impl LocationError {
    /// Platform error code (1, 2 or 3).
    pub fn code(&self) -> u16 {
        match self {
            LocationError::PermissionDenied => 1,
            LocationError::PositionUnavailable => 2,
            LocationError::Timeout => 3,
        }
    }

    /// Maps a platform error code back to its kind.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(LocationError::PermissionDenied),
            2 => Some(LocationError::PositionUnavailable),
            3 => Some(LocationError::Timeout),
            _ => None,
        }
    }
}

/// A single-shot source of the user's position.
///
/// Implementors may write `async fn current_position(&self)`. The future is
/// not required to be `Send`: browser sources hold JS handles and run on a
/// single-threaded executor.
pub trait PositionSource {
    /// Requests the current position once.
    fn current_position(&self) -> impl Future<Output = Result<Position, LocationError>>;
}

/// A source that always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedSource {
    position: Position,
}

impl FixedSource {
    /// Creates a source reporting `position`.
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

impl PositionSource for FixedSource {
    async fn current_position(&self) -> Result<Position, LocationError> {
        Ok(self.position)
    }
}

/// A source that always fails with the given kind.
#[derive(Debug, Clone, Copy)]
pub struct UnavailableSource {
    reason: LocationError,
}

impl UnavailableSource {
    /// Creates a source failing with `reason`.
    pub fn new(reason: LocationError) -> Self {
        Self { reason }
    }
}

impl PositionSource for UnavailableSource {
    async fn current_position(&self) -> Result<Position, LocationError> {
        Err(self.reason)
    }
}

/// Acquires the reference coordinate for ranking.
///
/// Every failure, and a fix with unusable values, gives `None` so callers
/// fall back to the unranked listing. No retries are attempted.
///
/// # Example
/// ```
/// use pharmloc_geo::{reference_coordinate, LocationError, UnavailableSource};
///
/// let denied = UnavailableSource::new(LocationError::PermissionDenied);
/// assert!(tokio_test::block_on(reference_coordinate(&denied)).is_none());
/// ```
pub async fn reference_coordinate<S: PositionSource>(source: &S) -> Option<Coordinate> {
    match source.current_position().await {
        Ok(position) => {
            let coord = position.coordinate();
            if coord.is_valid() {
                debug!(
                    latitude = position.latitude,
                    longitude = position.longitude,
                    accuracy_m = position.accuracy_meters,
                    "Acquired reference position"
                );
                Some(coord)
            } else {
                warn!(?position, "Discarding position outside WGS84 ranges");
                None
            }
        }
        Err(error) => {
            warn!(code = error.code(), %error, "No reference position, listing unranked");
            None
        }
    }
}

/// Fix accuracy thresholds in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccuracyThresholds {
    /// Below this the fix is [`AccuracyLevel::Excellent`]
    pub excellent_below_m: f64,
    /// Below this the fix is [`AccuracyLevel::Good`]
    pub good_below_m: f64,
    /// Below this the fix is [`AccuracyLevel::Fair`], otherwise [`AccuracyLevel::Poor`]
    pub fair_below_m: f64,
}

impl AccuracyThresholds {
    /// Cut-off for an excellent fix.
    pub const EXCELLENT_BELOW_M: f64 = 15.0;
    /// Cut-off for a good fix.
    pub const GOOD_BELOW_M: f64 = 50.0;
    /// Cut-off for a fair fix.
    pub const FAIR_BELOW_M: f64 = 150.0;
}

impl Default for AccuracyThresholds {
    fn default() -> Self {
        Self {
            excellent_below_m: Self::EXCELLENT_BELOW_M,
            good_below_m: Self::GOOD_BELOW_M,
            fair_below_m: Self::FAIR_BELOW_M,
        }
    }
}

/// Qualitative accuracy of a position fix, shown next to the "locate me" button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccuracyLevel {
    /// Within a few meters
    Excellent,
    /// Street-level
    Good,
    /// Neighbourhood-level
    Fair,
    /// Too coarse to trust, or not a number
    Poor,
}

impl AccuracyLevel {
    /// Classifies an accuracy radius.
    pub fn classify(accuracy_meters: f64, thresholds: &AccuracyThresholds) -> Self {
        if !accuracy_meters.is_finite() || accuracy_meters < 0.0 {
            AccuracyLevel::Poor
        } else if accuracy_meters < thresholds.excellent_below_m {
            AccuracyLevel::Excellent
        } else if accuracy_meters < thresholds.good_below_m {
            AccuracyLevel::Good
        } else if accuracy_meters < thresholds.fair_below_m {
            AccuracyLevel::Fair
        } else {
            AccuracyLevel::Poor
        }
    }

    /// UI label.
    pub fn label(&self) -> &'static str {
        match self {
            AccuracyLevel::Excellent => "Excellente",
            AccuracyLevel::Good => "Bonne",
            AccuracyLevel::Fair => "Moyenne",
            AccuracyLevel::Poor => "Faible",
        }
    }
}

impl fmt::Display for AccuracyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
