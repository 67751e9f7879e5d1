use tracing::debug;

use super::model::{ControlPoint, Waypoint};
use crate::error::RouteError;
use crate::geometry::Position;
use crate::math::distance_2d::nearest_segment;
use crate::overlay::{OverlayEntity, OverlayId};
use crate::render::{Geometry, Role, Style};

/// Callback receiving the final path when line editing ends.
pub type PathCallback = Box<dyn FnMut(&[Position])>;

/// Splices a control point into a path at the segment nearest a click.
pub struct InsertControlPoint {
    at: Position,
}

impl InsertControlPoint {
    /// Creates a new `InsertControlPoint` operation for a click at `at`.
    #[must_use]
    pub fn new(at: Position) -> Self {
        Self { at }
    }

    /// Executes the operation on `path`.
    ///
    /// The nearest segment `i` (earliest on ties) receives the point at
    /// `i + 1`. Returns `None` when the path has no segment.
    pub fn execute(&self, path: &mut Vec<Position>) -> Option<ControlPoint> {
        let (segment, _) = nearest_segment(&self.at, path)?;
        let path_index = segment + 1;
        path.insert(path_index, self.at);
        Some(ControlPoint {
            path_index,
            position: self.at,
        })
    }
}

/// An insert-on-line editing session over a route path.
///
/// The session's path is the only source for the edit line until
/// [`LineEditSession::finish`] hands it back.
pub struct LineEditSession {
    path: Vec<Position>,
    waypoints: Vec<Waypoint>,
    corridor_width_px: f64,
    on_path_change: Option<PathCallback>,
}

impl std::fmt::Debug for LineEditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineEditSession")
            .field("path", &self.path)
            .field("waypoints", &self.waypoints.len())
            .field("corridor_width_px", &self.corridor_width_px)
            .finish_non_exhaustive()
    }
}

impl LineEditSession {
    /// Starts a session over `path`; `waypoints` are shown for reference.
    #[must_use]
    pub fn new(
        path: Vec<Position>,
        waypoints: Vec<Waypoint>,
        corridor_width_px: f64,
        on_path_change: PathCallback,
    ) -> Self {
        Self {
            path,
            waypoints,
            corridor_width_px,
            on_path_change: Some(on_path_change),
        }
    }

    #[must_use]
    pub fn path(&self) -> &[Position] {
        &self.path
    }

    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    #[must_use]
    pub fn corridor_width_px(&self) -> f64 {
        self.corridor_width_px
    }

    /// Inserts a control point at the segment nearest `at`.
    pub fn insert(&mut self, at: Position) -> Option<ControlPoint> {
        let inserted = InsertControlPoint::new(at).execute(&mut self.path)?;
        debug!(index = inserted.path_index, len = self.path.len(), "control point inserted");
        Some(inserted)
    }

    /// Moves control point `index`; no other index changes.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::PathIndexOutOfRange`] for a bad index.
    pub fn move_point(&mut self, index: usize, position: Position) -> Result<(), RouteError> {
        let len = self.path.len();
        let point = self
            .path
            .get_mut(index)
            .ok_or(RouteError::PathIndexOutOfRange { index, len })?;
        *point = position;
        Ok(())
    }

    /// The visible edit line.
    #[must_use]
    pub fn line_entity(&self) -> OverlayEntity {
        OverlayEntity::new(
            OverlayId::EditLine,
            Geometry::Line(self.path.clone()),
            Style::new(Role::RouteLine),
        )
    }

    /// The invisible click band beneath the edit line.
    #[must_use]
    pub fn corridor_entity(&self) -> OverlayEntity {
        OverlayEntity::new(
            OverlayId::HitCorridor,
            Geometry::Line(self.path.clone()),
            Style::new(Role::HitCorridor {
                width_px: self.corridor_width_px,
            }),
        )
    }

    /// The draggable marker for control point `index`.
    #[must_use]
    pub fn control_entity(&self, index: usize) -> Option<OverlayEntity> {
        self.path.get(index).map(|p| {
            OverlayEntity::new(
                OverlayId::ControlPoint(index),
                Geometry::Point(*p),
                Style::new(Role::ControlPoint).draggable(),
            )
        })
    }

    /// Everything drawn on the route-edit layer.
    #[must_use]
    pub fn entities(&self) -> Vec<OverlayEntity> {
        let mut entities = Vec::with_capacity(self.path.len() + 2);
        entities.push(self.corridor_entity());
        entities.push(self.line_entity());
        entities.extend((0..self.path.len()).filter_map(|i| self.control_entity(i)));
        entities
    }

    /// Ends the session, handing the final path to the callback exactly once.
    pub fn finish(mut self) -> Vec<Position> {
        if let Some(mut callback) = self.on_path_change.take() {
            callback(&self.path);
        }
        debug!(len = self.path.len(), "line editing finished");
        self.path
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn p(lng: f64, lat: f64) -> Position {
        Position::new(lng, lat)
    }

    #[test]
    fn click_nearest_second_segment_inserts_at_two() {
        let mut path = vec![p(0.0, 0.0), p(0.0, 10.0), p(0.0, 20.0)];
        let cp = InsertControlPoint::new(p(0.0, 15.0)).execute(&mut path).unwrap();
        assert_eq!(cp.path_index, 2);
        assert_eq!(path, vec![p(0.0, 0.0), p(0.0, 10.0), p(0.0, 15.0), p(0.0, 20.0)]);
    }

    #[test]
    fn shared_vertex_tie_goes_to_earlier_segment() {
        let mut path = vec![p(0.0, 0.0), p(0.0, 10.0), p(0.0, 20.0)];
        let cp = InsertControlPoint::new(p(1.0, 10.0)).execute(&mut path).unwrap();
        assert_eq!(cp.path_index, 1);
    }

    #[test]
    fn no_segment_no_insert() {
        let mut path = vec![p(0.0, 0.0)];
        assert!(InsertControlPoint::new(p(1.0, 1.0)).execute(&mut path).is_none());
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn session_hands_back_path_once() {
        let seen: Rc<RefCell<Vec<Vec<Position>>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let mut s = LineEditSession::new(
            vec![p(0.0, 0.0), p(0.0, 10.0)],
            Vec::new(),
            30.0,
            Box::new(move |path: &[Position]| sink.borrow_mut().push(path.to_vec())),
        );
        s.insert(p(0.1, 5.0)).unwrap();
        s.move_point(1, p(0.0, 4.0)).unwrap();
        assert_eq!(
            s.move_point(9, p(0.0, 0.0)),
            Err(RouteError::PathIndexOutOfRange { index: 9, len: 3 })
        );
        assert_eq!(s.entities().len(), 5);

        let path = s.finish();
        assert_eq!(path, vec![p(0.0, 0.0), p(0.0, 4.0), p(0.0, 10.0)]);
        assert_eq!(seen.borrow().as_slice(), &[path]);
    }
}
