use std::fmt;

use serde::{Deserialize, Serialize};

use super::Position;
use crate::math::{polygon_area, total_distance};

slotmap::new_key_type! {
    /// Editor-local key of a drawing, valid whether or not it was persisted.
    pub struct DrawingKey;
}

/// Identifier assigned to a drawing by the persistence store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawingId(pub String);

impl fmt::Display for DrawingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The shape family of a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingKind {
    Waypoint,
    Line,
    Polygon,
    Measurement,
}

impl DrawingKind {
    /// Fewest points a finished drawing of this kind may carry.
    #[must_use]
    pub fn min_points(self) -> usize {
        match self {
            Self::Waypoint => 1,
            Self::Line | Self::Measurement => 2,
            Self::Polygon => 3,
        }
    }

    /// Name given to a drawing the user has not named.
    #[must_use]
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Waypoint => "Waypoint",
            Self::Line => "Line",
            Self::Polygon => "Polygon",
            Self::Measurement => "Measurement",
        }
    }
}

/// Unit attached to a drawing's measured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementUnit {
    Meters,
    Kilometers,
    SqMeters,
    Hectares,
}

/// Areas at or above this many square meters are reported in hectares.
const HECTARE_M2: f64 = 10_000.0;

/// A user-created annotation.
///
/// `id` is `None` until the drawing has been accepted by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub id: Option<DrawingId>,
    pub kind: DrawingKind,
    pub points: Vec<Position>,
    pub name: String,
    pub measurement_value: Option<f64>,
    pub measurement_unit: Option<MeasurementUnit>,
}

impl Drawing {
    /// Creates an unsaved drawing and derives its measurement from `points`.
    #[must_use]
    pub fn new(kind: DrawingKind, points: Vec<Position>) -> Self {
        let (measurement_value, measurement_unit) = match measure(kind, &points) {
            Some((value, unit)) => (Some(value), Some(unit)),
            None => (None, None),
        };
        Self {
            id: None,
            kind,
            name: kind.default_name().to_owned(),
            points,
            measurement_value,
            measurement_unit,
        }
    }
}

/// Length or area of `points` expressed in the unit a reader expects.
///
/// Lengths switch from meters to kilometers at 1000 m; areas switch from
/// square meters to hectares at one hectare. Values carry two decimals.
#[must_use]
pub fn measure(kind: DrawingKind, points: &[Position]) -> Option<(f64, MeasurementUnit)> {
    match kind {
        DrawingKind::Waypoint => None,
        DrawingKind::Line | DrawingKind::Measurement => {
            let meters = total_distance(points);
            Some(if meters < 1000.0 {
                (round2(meters), MeasurementUnit::Meters)
            } else {
                (round2(meters / 1000.0), MeasurementUnit::Kilometers)
            })
        }
        DrawingKind::Polygon => {
            let m2 = polygon_area(points);
            Some(if m2 < HECTARE_M2 {
                (round2(m2), MeasurementUnit::SqMeters)
            } else {
                (round2(m2 / HECTARE_M2), MeasurementUnit::Hectares)
            })
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn waypoint_has_no_measurement() {
        let d = Drawing::new(DrawingKind::Waypoint, vec![Position::new(-110.76, 43.48)]);
        assert_eq!(d.measurement_value, None);
        assert_eq!(d.measurement_unit, None);
        assert_eq!(d.name, "Waypoint");
    }

    #[test]
    fn long_line_reports_kilometers() {
        let d = Drawing::new(
            DrawingKind::Line,
            vec![Position::new(0.0, 0.0), Position::new(0.0, 0.01)],
        );
        assert_eq!(d.measurement_unit, Some(MeasurementUnit::Kilometers));
        assert_abs_diff_eq!(d.measurement_value.unwrap_or_default(), 1.11);
    }

    #[test]
    fn short_line_reports_meters() {
        let d = Drawing::new(
            DrawingKind::Measurement,
            vec![Position::new(0.0, 0.0), Position::new(0.0, 0.001)],
        );
        assert_eq!(d.measurement_unit, Some(MeasurementUnit::Meters));
        assert_abs_diff_eq!(d.measurement_value.unwrap_or_default(), 111.19, epsilon = 0.02);
    }

    #[test]
    fn polygon_area_units() {
        let small = Drawing::new(
            DrawingKind::Polygon,
            vec![
                Position::new(0.0, 0.0),
                Position::new(0.0005, 0.0),
                Position::new(0.0005, 0.0005),
            ],
        );
        assert_eq!(small.measurement_unit, Some(MeasurementUnit::SqMeters));

        let large = Drawing::new(
            DrawingKind::Polygon,
            vec![
                Position::new(0.0, 0.0),
                Position::new(0.01, 0.0),
                Position::new(0.01, 0.01),
                Position::new(0.0, 0.01),
            ],
        );
        assert_eq!(large.measurement_unit, Some(MeasurementUnit::Hectares));
        assert_abs_diff_eq!(large.measurement_value.unwrap_or_default(), 123.92, epsilon = 0.05);
    }

    #[test]
    fn min_points_per_kind() {
        assert_eq!(DrawingKind::Waypoint.min_points(), 1);
        assert_eq!(DrawingKind::Line.min_points(), 2);
        assert_eq!(DrawingKind::Measurement.min_points(), 2);
        assert_eq!(DrawingKind::Polygon.min_points(), 3);
    }
}
