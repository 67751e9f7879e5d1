use serde::{Deserialize, Serialize};

use crate::math::Point2;

/// A geographic position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
    /// Meters above sea level. Often back-filled after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl Position {
    /// Creates a position without elevation.
    #[must_use]
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            elevation: None,
        }
    }

    /// Returns a copy with the given elevation.
    #[must_use]
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    /// `[longitude, latitude]`, the pair form used by persisted records.
    #[must_use]
    pub fn lng_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Longitude as `x`, latitude as `y`.
    #[must_use]
    pub fn to_point2(&self) -> Point2 {
        Point2::new(self.longitude, self.latitude)
    }

    /// Whether two positions share the same horizontal location.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn same_location(&self, other: &Position) -> bool {
        self.longitude == other.longitude && self.latitude == other.latitude
    }
}

impl From<[f64; 2]> for Position {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}
