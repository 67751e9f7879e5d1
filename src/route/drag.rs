use tracing::{debug, trace};

use crate::geometry::Position;

/// What a drag has captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// A waypoint of the displayed route, by index.
    Waypoint(usize),
    /// A control point of the line-edit session, by path index.
    ControlPoint(usize),
}

/// A drag in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragCapture {
    pub target: DragTarget,
    pub origin: Position,
    pub current: Position,
    /// Whether any move arrived between capture and release.
    pub moved: bool,
}

/// Exclusive pointer capture: at most one drag at a time, first capture wins.
#[derive(Debug, Default)]
pub struct DragState {
    capture: Option<DragCapture>,
}

impl DragState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures `target`. Returns `false`, changing nothing, if a drag is
    /// already in progress.
    pub fn begin(&mut self, target: DragTarget, at: Position) -> bool {
        if let Some(active) = &self.capture {
            debug!(?target, active = ?active.target, "drag ignored, capture held");
            return false;
        }
        self.capture = Some(DragCapture {
            target,
            origin: at,
            current: at,
            moved: false,
        });
        debug!(?target, "drag captured");
        true
    }

    /// Moves the captured target, returning it.
    pub fn update(&mut self, at: Position) -> Option<DragTarget> {
        let capture = self.capture.as_mut()?;
        capture.current = at;
        capture.moved = true;
        trace!(target = ?capture.target, "drag moved");
        Some(capture.target)
    }

    /// Releases the capture and returns what was dragged.
    pub fn end(&mut self) -> Option<DragCapture> {
        let capture = self.capture.take()?;
        debug!(target = ?capture.target, moved = capture.moved, "drag released");
        Some(capture)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.capture.is_some()
    }

    #[must_use]
    pub fn current(&self) -> Option<&DragCapture> {
        self.capture.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn first_capture_wins() {
        let mut d = DragState::new();
        let at = Position::new(1.0, 1.0);
        assert!(d.begin(DragTarget::Waypoint(0), at));
        assert!(!d.begin(DragTarget::Waypoint(1), at));
        assert_eq!(d.current().unwrap().target, DragTarget::Waypoint(0));
    }

    #[test]
    fn release_reports_movement() {
        let mut d = DragState::new();
        d.begin(DragTarget::ControlPoint(3), Position::new(0.0, 0.0));
        assert_eq!(d.update(Position::new(0.5, 0.5)), Some(DragTarget::ControlPoint(3)));
        let c = d.end().unwrap();
        assert!(c.moved);
        assert_eq!(c.current, Position::new(0.5, 0.5));
        assert!(!d.is_active());
        assert!(d.end().is_none());
        assert!(d.update(Position::new(1.0, 1.0)).is_none());
    }
}
