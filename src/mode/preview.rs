use super::DrawingSession;
use crate::geometry::DrawingKind;
use crate::overlay::{OverlayEntity, OverlayId};
use crate::render::{Geometry, Role, Style};

/// Overlay entities showing a drawing in progress.
///
/// Every point gets a numbered vertex marker. Two or more points add a
/// line; a polygon with three or more points is shown filled instead.
#[must_use]
pub fn preview_entities(session: &DrawingSession) -> Vec<OverlayEntity> {
    let points = &session.points;
    let mut entities = Vec::with_capacity(points.len() + 1);

    let shape = match (session.kind, points.len()) {
        (DrawingKind::Waypoint, _) | (_, 0 | 1) => None,
        (DrawingKind::Polygon, n) if n >= 3 => Some(Geometry::Polygon(points.clone())),
        _ => Some(Geometry::Line(points.clone())),
    };
    if let Some(geometry) = shape {
        entities.push(OverlayEntity::new(
            OverlayId::PreviewShape,
            geometry,
            Style::new(Role::Preview(session.kind)),
        ));
    }

    entities.extend(points.iter().enumerate().map(|(i, p)| {
        OverlayEntity::new(
            OverlayId::PreviewVertex(i),
            Geometry::Point(*p),
            Style::new(Role::Vertex { ordinal: i + 1 }),
        )
    }));
    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;
    use crate::render::PrimitiveKind;

    fn session(kind: DrawingKind, n: usize) -> DrawingSession {
        #[allow(clippy::cast_precision_loss)]
        let points = (0..n).map(|i| Position::new(i as f64 * 0.01, 0.0)).collect();
        DrawingSession { kind, points }
    }

    fn shape_kind(entities: &[OverlayEntity]) -> Option<PrimitiveKind> {
        entities
            .iter()
            .find(|e| e.id == OverlayId::PreviewShape)
            .map(|e| e.geometry.kind())
    }

    #[test]
    fn single_point_is_a_marker() {
        let e = preview_entities(&session(DrawingKind::Line, 1));
        assert_eq!(e.len(), 1);
        assert_eq!(shape_kind(&e), None);
    }

    #[test]
    fn polygon_grows_from_line_to_fill() {
        let two = preview_entities(&session(DrawingKind::Polygon, 2));
        assert_eq!(shape_kind(&two), Some(PrimitiveKind::Line));
        let three = preview_entities(&session(DrawingKind::Polygon, 3));
        assert_eq!(shape_kind(&three), Some(PrimitiveKind::Polygon));
        assert_eq!(three.len(), 4);
    }

    #[test]
    fn line_keeps_markers() {
        let e = preview_entities(&session(DrawingKind::Measurement, 4));
        assert_eq!(shape_kind(&e), Some(PrimitiveKind::Line));
        assert_eq!(e.iter().filter(|e| matches!(e.id, OverlayId::PreviewVertex(_))).count(), 4);
    }
}
