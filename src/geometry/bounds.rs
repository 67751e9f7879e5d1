use serde::{Deserialize, Serialize};

use super::Position;

/// An axis-aligned longitude/latitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBounds {
    pub north_east: Position,
    pub south_west: Position,
}

impl GeoBounds {
    /// The smallest box containing both corners, in any order.
    #[must_use]
    pub fn from_corners(a: &Position, b: &Position) -> Self {
        Self {
            north_east: Position::new(a.longitude.max(b.longitude), a.latitude.max(b.latitude)),
            south_west: Position::new(a.longitude.min(b.longitude), a.latitude.min(b.latitude)),
        }
    }

    /// Longitude extent in degrees.
    #[must_use]
    pub fn lng_span(&self) -> f64 {
        self.north_east.longitude - self.south_west.longitude
    }

    /// Latitude extent in degrees.
    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.north_east.latitude - self.south_west.latitude
    }

    /// Closed ring NE → NW → SW → SE, suitable for a polygon primitive.
    #[must_use]
    pub fn ring(&self) -> Vec<Position> {
        let ne = self.north_east;
        let sw = self.south_west;
        vec![
            ne,
            Position::new(sw.longitude, ne.latitude),
            sw,
            Position::new(ne.longitude, sw.latitude),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn corners_normalize_order() {
        let b = GeoBounds::from_corners(&Position::new(11.0, 9.0), &Position::new(10.0, 10.0));
        assert_eq!(b.north_east, Position::new(11.0, 10.0));
        assert_eq!(b.south_west, Position::new(10.0, 9.0));
        assert_abs_diff_eq!(b.lng_span(), 1.0);
        assert_abs_diff_eq!(b.lat_span(), 1.0);
    }

    #[test]
    fn ring_has_four_corners() {
        let b = GeoBounds::from_corners(&Position::new(0.0, 0.0), &Position::new(2.0, 1.0));
        let ring = b.ring();
        assert_eq!(ring.len(), 4);
        assert!(ring.contains(&Position::new(0.0, 1.0)));
        assert!(ring.contains(&Position::new(2.0, 0.0)));
    }
}
