use super::format::format_distance;
use crate::geometry::Position;
use crate::math::geodesic::midpoint;
use crate::math::{distance, total_distance};
use crate::overlay::{OverlayEntity, OverlayId};
use crate::render::{Geometry, Role, Style};

/// Distance label for one segment, anchored at its midpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentLabel {
    pub anchor: Position,
    pub meters: f64,
    pub text: String,
}

/// Everything a UI needs to draw path-measurement labels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathLabels {
    pub segments: Vec<SegmentLabel>,
    pub total_meters: f64,
    pub total_text: String,
}

/// Click-accumulated multi-point measurement.
///
/// Points are never finished automatically; they live until `clear`.
#[derive(Debug, Clone, Default)]
pub struct PathMeasurement {
    points: Vec<Position>,
}

impl PathMeasurement {
    /// Creates an empty measurement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a point.
    pub fn push(&mut self, position: Position) {
        self.points.push(position);
    }

    /// Removes the most recent point.
    pub fn undo(&mut self) -> Option<Position> {
        self.points.pop()
    }

    /// Removes all points.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// The accumulated points.
    #[must_use]
    pub fn points(&self) -> &[Position] {
        &self.points
    }

    /// Whether a measurement is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.points.is_empty()
    }

    /// Per-segment and running-total labels.
    #[must_use]
    pub fn labels(&self) -> PathLabels {
        let segments: Vec<SegmentLabel> = self
            .points
            .windows(2)
            .map(|w| {
                let meters = distance(&w[0], &w[1]);
                SegmentLabel {
                    anchor: midpoint(&w[0], &w[1]),
                    meters,
                    text: format_distance(meters),
                }
            })
            .collect();
        let total_meters = total_distance(&self.points);
        PathLabels {
            segments,
            total_meters,
            total_text: format_distance(total_meters),
        }
    }

    /// A polyline through every point plus a numbered marker per point.
    #[must_use]
    pub fn entities(&self) -> Vec<OverlayEntity> {
        let mut entities = Vec::with_capacity(self.points.len() + 1);
        if self.points.len() >= 2 {
            entities.push(OverlayEntity::new(
                OverlayId::MeasureLine,
                Geometry::Line(self.points.clone()),
                Style::new(Role::MeasurementLine),
            ));
        }
        entities.extend(self.points.iter().enumerate().map(|(i, p)| {
            OverlayEntity::new(
                OverlayId::MeasureVertex(i),
                Geometry::Point(*p),
                Style::new(Role::Vertex { ordinal: i + 1 }),
            )
        }));
        entities
    }
}
