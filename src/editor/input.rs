use std::time::Instant;

use tracing::{debug, trace, warn};

use super::elevation::ElevationTarget;
use super::MapEditor;
use crate::error::WaymarkError;
use crate::geometry::Position;
use crate::math::ScreenPoint;
use crate::measurement::HoldEvent;
use crate::mode::{DrawingMode, PointAdded};
use crate::offline::SelectionOutcome;
use crate::overlay::{Layer, OverlayId};
use crate::persistence::DrawingStore;
use crate::picking::{FindNearest, LineHit};
use crate::render::{Projection, Renderer};
use crate::route::DragTarget;

/// Pointer, click and touch handlers. Each returns whether the editor
/// consumed the event; unconsumed events belong to the camera.
impl<R: Renderer, S: DrawingStore> MapEditor<R, S> {
    /// A click (press and release without a drag).
    pub fn on_click(&mut self, screen: ScreenPoint) -> bool {
        if std::mem::take(&mut self.suppress_click) {
            trace!("click after drag suppressed");
            return true;
        }
        if self.drag.is_active() {
            return false;
        }
        match self.modes.mode() {
            DrawingMode::Waypoint | DrawingMode::Line | DrawingMode::Polygon | DrawingMode::Measurement => {
                self.add_drawing_point(screen)
            }
            DrawingMode::RouteEdit => self.insert_on_line(screen),
            DrawingMode::OfflineSelect => false,
            DrawingMode::Idle if self.measurements.path_enabled() => self.add_measurement_point(screen),
            DrawingMode::Idle => self.pick_drawing(screen),
        }
    }

    /// A button went down: may start a drag.
    pub fn on_pointer_down(&mut self, screen: ScreenPoint) -> bool {
        self.suppress_click = false;
        let Some(world) = self.unproject(screen) else {
            return false;
        };
        match self.modes.mode() {
            DrawingMode::OfflineSelect => {
                self.offline.pointer_down(world);
                true
            }
            DrawingMode::RouteEdit => {
                let radius = self.config.pick_radius_px;
                let hit = match (self.overlay.renderer(), &self.line_edit) {
                    (Some(renderer), Some(session)) => FindNearest::new(screen, radius)
                        .execute(renderer, session.path().iter().copied().enumerate()),
                    _ => None,
                };
                hit.is_some_and(|i| self.begin_drag(DragTarget::ControlPoint(i), world))
            }
            DrawingMode::Idle => {
                let radius = self.config.pick_radius_px;
                let hit = match (self.overlay.renderer(), &self.route) {
                    (Some(renderer), Some(display)) if display.editable() => {
                        FindNearest::new(screen, radius).execute(renderer, display.waypoint_candidates())
                    }
                    _ => None,
                };
                hit.is_some_and(|i| self.begin_drag(DragTarget::Waypoint(i), world))
            }
            _ => false,
        }
    }

    /// The pointer moved: advances a drag or an offline selection.
    pub fn on_pointer_move(&mut self, screen: ScreenPoint) -> bool {
        if let Some(capture) = self.drag.current() {
            let target = capture.target;
            // Off-globe positions leave the drag where it was.
            if let Some(world) = self.unproject(screen) {
                self.drag.update(world);
                self.show_drag(target, world);
            }
            return true;
        }
        if self.modes.mode() == DrawingMode::OfflineSelect && self.offline.is_dragging() {
            if let Some(world) = self.unproject(screen) {
                self.offline.pointer_move(world);
                self.refresh_offline_region();
            }
            return true;
        }
        false
    }

    /// The button went up: ends a drag or an offline selection.
    pub fn on_pointer_up(&mut self, screen: ScreenPoint) -> bool {
        if let Some(capture) = self.drag.end() {
            self.set_camera_enabled(true);
            if capture.moved {
                self.suppress_click = true;
            }
            match capture.target {
                DragTarget::Waypoint(index) => {
                    if capture.moved {
                        self.commit_waypoint_drag(index, capture.current);
                    }
                    self.refresh_route_layer();
                }
                DragTarget::ControlPoint(index) => {
                    if let Some(entity) = self.line_edit.as_ref().and_then(|s| s.control_entity(index)) {
                        self.overlay.upsert(entity);
                    }
                }
            }
            return true;
        }
        if self.modes.mode() == DrawingMode::OfflineSelect {
            let world = self.unproject(screen);
            let zoom = self.overlay.renderer().map_or(0.0, Projection::current_zoom);
            let outcome = self.offline.pointer_up(world, zoom);
            self.refresh_offline_region();
            return outcome != SelectionOutcome::NoDrag;
        }
        false
    }

    /// The platform took the pointer away mid-gesture.
    ///
    /// A waypoint drag snaps back; control-point moves already applied are
    /// kept. The camera is re-enabled either way.
    pub fn on_capture_lost(&mut self) {
        if let Some(capture) = self.drag.end() {
            warn!(target = ?capture.target, "pointer capture lost during drag");
            match capture.target {
                DragTarget::Waypoint(_) => self.refresh_route_layer(),
                DragTarget::ControlPoint(index) => {
                    if let Some(entity) = self.line_edit.as_ref().and_then(|s| s.control_entity(index)) {
                        self.overlay.upsert(entity);
                    }
                }
            }
        }
        if self.offline.is_dragging() {
            self.offline.cancel_drag();
            self.refresh_offline_region();
        }
        if self.modes.mode() != DrawingMode::OfflineSelect {
            self.set_camera_enabled(true);
        }
    }

    /// Fingers touched down.
    pub fn on_touch_start(&mut self, touches: &[ScreenPoint], now: Instant) -> bool {
        if !self.hold_gestures_active() {
            return false;
        }
        let event = self.measurements.hold.touch_start(touches, now);
        self.apply_hold_event(event)
    }

    /// Fingers moved.
    pub fn on_touch_move(&mut self, touches: &[ScreenPoint]) -> bool {
        if !self.hold_gestures_active() {
            return false;
        }
        let event = self.measurements.hold.touch_move(touches, self.overlay.renderer());
        self.apply_hold_event(event)
    }

    /// All fingers lifted.
    pub fn on_touch_end(&mut self, now: Instant) -> bool {
        if !self.hold_gestures_active() {
            return false;
        }
        let event = self.measurements.hold.touch_end(now);
        self.apply_hold_event(event)
    }

    /// Fires due timers. Call at or after [`MapEditor::next_deadline`].
    pub fn tick(&mut self, now: Instant) {
        if !self.measurements.hold_enabled() {
            return;
        }
        let event = self.measurements.hold.tick(now, self.overlay.renderer());
        self.apply_hold_event(event);
    }

    /// When [`MapEditor::tick`] next has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.measurements.hold_enabled() {
            self.measurements.hold.next_deadline()
        } else {
            None
        }
    }
}

impl<R: Renderer, S: DrawingStore> MapEditor<R, S> {
    pub(super) fn unproject(&self, screen: ScreenPoint) -> Option<Position> {
        self.overlay.renderer()?.unproject(screen)
    }

    fn hold_gestures_active(&self) -> bool {
        self.measurements.hold_enabled() && self.modes.mode() == DrawingMode::Idle
    }

    fn apply_hold_event(&mut self, event: HoldEvent) -> bool {
        match event {
            HoldEvent::Unchanged => false,
            HoldEvent::Armed | HoldEvent::Disarmed => true,
            HoldEvent::Activated
            | HoldEvent::Updated
            | HoldEvent::Pinched
            | HoldEvent::Frozen
            | HoldEvent::Cleared => {
                self.refresh_measurement();
                true
            }
        }
    }

    fn begin_drag(&mut self, target: DragTarget, world: Position) -> bool {
        if !self.drag.begin(target, world) {
            return false;
        }
        self.set_camera_enabled(false);
        let marker = match target {
            DragTarget::Waypoint(index) => self.route.as_ref().and_then(|d| d.waypoint_entity(index, None)),
            DragTarget::ControlPoint(index) => self.line_edit.as_ref().and_then(|s| s.control_entity(index)),
        };
        if let Some(mut marker) = marker {
            marker.style = marker.style.emphasized();
            self.overlay.upsert(marker);
        }
        true
    }

    /// Draws the captured marker at `world`, emphasized. A control point
    /// also moves in the session path and redraws the line.
    fn show_drag(&mut self, target: DragTarget, world: Position) {
        match target {
            DragTarget::Waypoint(index) => {
                let entity = self
                    .route
                    .as_ref()
                    .and_then(|d| d.waypoint_entity(index, Some(world)));
                if let Some(mut entity) = entity {
                    entity.style = entity.style.emphasized();
                    self.overlay.upsert(entity);
                }
            }
            DragTarget::ControlPoint(index) => {
                let Some(session) = self.line_edit.as_mut() else {
                    return;
                };
                if session.move_point(index, world).is_err() {
                    return;
                }
                let line = session.line_entity();
                let corridor = session.corridor_entity();
                let marker = session.control_entity(index);
                self.overlay.upsert(corridor);
                self.overlay.upsert(line);
                if let Some(mut marker) = marker {
                    marker.style = marker.style.emphasized();
                    self.overlay.upsert(marker);
                }
            }
        }
    }

    fn commit_waypoint_drag(&mut self, index: usize, world: Position) {
        let speed = self.config.average_speed_kmh;
        let Some(display) = self.route.as_mut() else {
            return;
        };
        if let Err(e) = display.commit_drag(index, world, speed) {
            warn!(error = %e, "waypoint drag dropped");
            return;
        }
        if let Some(waypoint) = display.route().waypoints.get(index) {
            self.elevation
                .request(ElevationTarget::RouteWaypoint(waypoint.id), waypoint.position);
        }
    }

    fn add_drawing_point(&mut self, screen: ScreenPoint) -> bool {
        let Some(world) = self.unproject(screen) else {
            trace!("click off the globe ignored");
            return false;
        };
        let Some(added) = self.modes.push_point(world) else {
            return false;
        };
        let index = self.modes.session().map_or(0, |s| s.points.len() - 1);
        self.elevation.request(ElevationTarget::SessionPoint(index), world);
        match added {
            PointAdded::Appended { count } => {
                trace!(count, "drawing point added");
                self.refresh_preview();
            }
            PointAdded::Complete => match self.finish_drawing() {
                Ok(_) => {}
                Err(WaymarkError::Persistence(e)) => self.persistence_error = Some(e),
                Err(e) => warn!(error = %e, "auto-finish failed"),
            },
        }
        true
    }

    fn add_measurement_point(&mut self, screen: ScreenPoint) -> bool {
        let Some(world) = self.unproject(screen) else {
            return false;
        };
        self.measurements.path.push(world);
        self.refresh_measurement();
        true
    }

    fn insert_on_line(&mut self, screen: ScreenPoint) -> bool {
        let radius = self.config.pick_radius_px;
        let (Some(renderer), Some(session)) = (self.overlay.renderer(), self.line_edit.as_mut()) else {
            return false;
        };
        let on_marker = FindNearest::new(screen, radius)
            .execute(renderer, session.path().iter().copied().enumerate())
            .is_some();
        if on_marker {
            return true;
        }
        if !LineHit::new(screen, session.corridor_width_px()).execute(renderer, session.path()) {
            return false;
        }
        let Some(world) = renderer.unproject(screen) else {
            return false;
        };
        if session.insert(world).is_none() {
            return false;
        }
        let entities = session.entities();
        self.overlay.rebuild(Layer::RouteEdit, entities, None);
        true
    }

    fn pick_drawing(&mut self, screen: ScreenPoint) -> bool {
        let radius = self.config.pick_radius_px;
        let Some(renderer) = self.overlay.renderer() else {
            return false;
        };
        let candidates = self
            .drawings
            .iter()
            .flat_map(|(key, d)| d.points.iter().map(move |p| (key, *p)));
        let Some(key) = FindNearest::new(screen, radius).execute(renderer, candidates) else {
            return false;
        };
        debug!(?key, "drawing picked");
        self.select_drawing(Some(key));
        true
    }

    pub(super) fn refresh_offline_region(&mut self) {
        match self.offline.entity() {
            Some(entity) => self.overlay.upsert(entity),
            None => self.overlay.remove(&OverlayId::OfflineRegion),
        }
    }
}
