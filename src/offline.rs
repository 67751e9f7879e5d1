use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::geometry::{GeoBounds, Position};
use crate::overlay::{OverlayEntity, OverlayId};
use crate::render::{Geometry, Role, Style};

/// A committed offline region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineSelectionBounds {
    #[serde(flatten)]
    pub bounds: GeoBounds,
    /// Camera zoom when the selection was committed.
    pub zoom: f64,
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionOutcome {
    /// The pointer was never pressed, or never moved.
    NoDrag,
    /// The box was too small and has been discarded.
    Invalid,
    Committed(OfflineSelectionBounds),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Waiting,
    /// `kept` is the committed box a press landed on; it survives until
    /// the pointer actually moves.
    Dragging {
        start: Position,
        current: Option<Position>,
        kept: Option<OfflineSelectionBounds>,
    },
    Committed(OfflineSelectionBounds),
    /// The caller accepted the selection; further drags are ignored.
    Finished(OfflineSelectionBounds),
}

/// Rubber-band selection of a longitude/latitude box.
#[derive(Debug, Clone)]
pub struct OfflineSelector {
    min_span_deg: f64,
    phase: Phase,
    invalid_drag: bool,
}

impl OfflineSelector {
    /// Creates a selector rejecting boxes narrower than `min_span_deg` in
    /// either direction.
    #[must_use]
    pub fn new(min_span_deg: f64) -> Self {
        Self {
            min_span_deg,
            phase: Phase::Waiting,
            invalid_drag: false,
        }
    }

    /// Records the drag start. A committed box is replaced only once the
    /// pointer moves.
    pub fn pointer_down(&mut self, at: Position) {
        let kept = match self.phase {
            Phase::Finished(_) => return,
            Phase::Committed(s) => Some(s),
            Phase::Waiting | Phase::Dragging { .. } => None,
        };
        self.invalid_drag = false;
        self.phase = Phase::Dragging {
            start: at,
            current: None,
            kept,
        };
    }

    /// Tracks the drag. Returns the live box, if a drag is in progress.
    pub fn pointer_move(&mut self, at: Position) -> Option<GeoBounds> {
        let Phase::Dragging { start, current, kept } = &mut self.phase else {
            return None;
        };
        *current = Some(at);
        *kept = None;
        Some(GeoBounds::from_corners(start, &at))
    }

    /// Ends the drag, committing the box or discarding it.
    pub fn pointer_up(&mut self, at: Option<Position>, zoom: f64) -> SelectionOutcome {
        let Phase::Dragging { start, current, kept } = self.phase else {
            return SelectionOutcome::NoDrag;
        };
        let Some(current) = current else {
            self.phase = kept.map_or(Phase::Waiting, Phase::Committed);
            return SelectionOutcome::NoDrag;
        };
        let end = at.unwrap_or(current);
        let bounds = GeoBounds::from_corners(&start, &end);
        if bounds.lat_span() < self.min_span_deg || bounds.lng_span() < self.min_span_deg {
            warn!(
                lat_span = bounds.lat_span(),
                lng_span = bounds.lng_span(),
                "offline selection too small, discarded"
            );
            self.phase = Phase::Waiting;
            self.invalid_drag = true;
            return SelectionOutcome::Invalid;
        }
        let selection = OfflineSelectionBounds { bounds, zoom };
        debug!(?selection, "offline selection committed");
        self.phase = Phase::Committed(selection);
        SelectionOutcome::Committed(selection)
    }

    /// Abandons a drag in progress without raising the invalid flag. A
    /// committed box the pointer never moved off is kept.
    pub fn cancel_drag(&mut self) {
        if let Phase::Dragging { kept, .. } = self.phase {
            self.phase = kept.map_or(Phase::Waiting, Phase::Committed);
        }
    }

    /// Freezes the committed selection. Returns it, if any.
    pub fn finish(&mut self) -> Option<OfflineSelectionBounds> {
        let selection = self.bounds()?;
        self.phase = Phase::Finished(selection);
        Some(selection)
    }

    /// The committed selection, if any.
    #[must_use]
    pub fn bounds(&self) -> Option<OfflineSelectionBounds> {
        match self.phase {
            Phase::Committed(s) | Phase::Finished(s) | Phase::Dragging { kept: Some(s), .. } => Some(s),
            Phase::Waiting | Phase::Dragging { kept: None, .. } => None,
        }
    }

    /// Whether the last drag was discarded for being too small.
    #[must_use]
    pub fn invalid_drag(&self) -> bool {
        self.invalid_drag
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// The rectangle to draw, if any.
    #[must_use]
    pub fn entity(&self) -> Option<OverlayEntity> {
        let bounds = match self.phase {
            Phase::Dragging {
                start,
                current: Some(current),
                ..
            } => GeoBounds::from_corners(&start, &current),
            Phase::Committed(s) | Phase::Finished(s) | Phase::Dragging { kept: Some(s), .. } => s.bounds,
            Phase::Waiting | Phase::Dragging { current: None, kept: None, .. } => return None,
        };
        Some(OverlayEntity::new(
            OverlayId::OfflineRegion,
            Geometry::Polygon(bounds.ring()),
            Style::new(Role::OfflineRegion),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_span_is_discarded() {
        let mut s = OfflineSelector::new(0.001);
        let p = Position::new(5.0, 5.0);
        s.pointer_down(p);
        s.pointer_move(p);
        assert_eq!(s.pointer_up(Some(p), 8.0), SelectionOutcome::Invalid);
        assert!(s.invalid_drag());
        assert!(s.bounds().is_none());
        assert!(s.entity().is_none());
    }

    #[test]
    fn sub_threshold_drag_is_invalid() {
        let mut s = OfflineSelector::new(0.001);
        s.pointer_down(Position::new(10.0, 10.0));
        s.pointer_move(Position::new(10.0003, 10.0003));
        let outcome = s.pointer_up(Some(Position::new(10.0005, 10.0005)), 12.0);
        assert_eq!(outcome, SelectionOutcome::Invalid);
        assert!(s.invalid_drag());
    }

    #[test]
    fn one_degree_box_commits_with_zoom() {
        let mut s = OfflineSelector::new(0.001);
        s.pointer_down(Position::new(10.0, 10.0));
        let live = s.pointer_move(Position::new(10.5, 10.5)).unwrap();
        assert_abs_diff_eq!(live.lat_span(), 0.5);
        assert!(s.entity().is_some());

        let SelectionOutcome::Committed(sel) = s.pointer_up(Some(Position::new(11.0, 11.0)), 9.0)
        else {
            panic!("expected a committed selection");
        };
        assert_eq!(sel.bounds.north_east, Position::new(11.0, 11.0));
        assert_eq!(sel.bounds.south_west, Position::new(10.0, 10.0));
        assert_abs_diff_eq!(sel.zoom, 9.0);
        assert!(!s.invalid_drag());
        assert_eq!(s.bounds(), Some(sel));
        assert!(s.entity().is_some());
    }

    #[test]
    fn release_without_drag() {
        let mut s = OfflineSelector::new(0.001);
        assert_eq!(s.pointer_up(Some(Position::new(0.0, 0.0)), 1.0), SelectionOutcome::NoDrag);
        s.pointer_down(Position::new(0.0, 0.0));
        assert_eq!(s.pointer_up(None, 1.0), SelectionOutcome::NoDrag);
        assert!(!s.invalid_drag());
    }

    #[test]
    fn tap_keeps_committed_box() {
        let mut s = OfflineSelector::new(0.001);
        s.pointer_down(Position::new(0.0, 0.0));
        s.pointer_move(Position::new(1.0, 1.0));
        let SelectionOutcome::Committed(sel) = s.pointer_up(Some(Position::new(1.0, 1.0)), 6.0) else {
            panic!("expected a committed selection");
        };

        s.pointer_down(Position::new(0.5, 0.5));
        assert_eq!(s.bounds(), Some(sel));
        assert_eq!(s.pointer_up(Some(Position::new(0.5, 0.5)), 6.0), SelectionOutcome::NoDrag);
        assert_eq!(s.bounds(), Some(sel));
        assert!(s.entity().is_some());
        assert!(!s.invalid_drag());

        s.pointer_down(Position::new(0.5, 0.5));
        s.cancel_drag();
        assert_eq!(s.bounds(), Some(sel));
    }

    #[test]
    fn moving_off_a_committed_box_replaces_it() {
        let mut s = OfflineSelector::new(0.001);
        s.pointer_down(Position::new(0.0, 0.0));
        s.pointer_move(Position::new(1.0, 1.0));
        s.pointer_up(Some(Position::new(1.0, 1.0)), 6.0);

        s.pointer_down(Position::new(2.0, 2.0));
        s.pointer_move(Position::new(2.5, 2.5));
        assert!(s.bounds().is_none());
        let SelectionOutcome::Committed(sel) = s.pointer_up(Some(Position::new(4.0, 4.0)), 6.0) else {
            panic!("expected a committed selection");
        };
        assert_eq!(sel.bounds.south_west, Position::new(2.0, 2.0));
    }

    #[test]
    fn finished_selection_ignores_new_drags() {
        let mut s = OfflineSelector::new(0.001);
        s.pointer_down(Position::new(0.0, 0.0));
        s.pointer_up(Some(Position::new(1.0, 1.0)), 5.0);
        let frozen = s.finish().unwrap();
        s.pointer_down(Position::new(3.0, 3.0));
        assert!(s.pointer_move(Position::new(4.0, 4.0)).is_none());
        assert_eq!(s.bounds(), Some(frozen));
    }

    #[test]
    fn serializes_camel_case() {
        let sel = OfflineSelectionBounds {
            bounds: GeoBounds::from_corners(&Position::new(0.0, 0.0), &Position::new(1.0, 1.0)),
            zoom: 7.0,
        };
        let json = serde_json::to_value(sel).unwrap();
        assert_eq!(json["northEast"]["longitude"], 1.0);
        assert_eq!(json["zoom"], 7.0);
    }
}
