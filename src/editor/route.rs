use tracing::{debug, warn};

use super::elevation::ElevationTarget;
use super::MapEditor;
use crate::error::{ModeError, Result, RouteError};
use crate::geometry::Position;
use crate::mode::{DrawingMode, Transition};
use crate::overlay::{Layer, OverlayEntity, OverlayId};
use crate::persistence::DrawingStore;
use crate::render::{Geometry, Renderer, Role, Style};
use crate::route::{DragTarget, LineEditSession, PathCallback, Route, RouteCallbacks, RouteDisplay, Waypoint};

impl<R: Renderer, S: DrawingStore> MapEditor<R, S> {
    /// Shows `route`, replacing any route already shown. With `editable`,
    /// waypoints can be dragged and `callbacks` hear about edits.
    pub fn display_route(&mut self, route: Route, editable: bool, callbacks: RouteCallbacks) {
        self.release_waypoint_drag();
        self.drop_route_elevations();
        debug!(name = %route.name, waypoints = route.waypoints.len(), editable, "route displayed");
        self.route = Some(RouteDisplay::new(route, editable, callbacks));
        self.refresh_route_layer();
    }

    /// Removes the shown route and hands it back.
    pub fn clear_route(&mut self) -> Option<Route> {
        self.release_waypoint_drag();
        self.drop_route_elevations();
        let display = self.route.take()?;
        self.refresh_route_layer();
        Some(display.into_route())
    }

    /// The shown route.
    #[must_use]
    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref().map(RouteDisplay::route)
    }

    /// Replaces the shown route's line, e.g. with a router's answer to a
    /// waypoint drag.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NoRoute`] when no route is shown.
    pub fn set_route_path(&mut self, path: Vec<Position>) -> Result<()> {
        let speed = self.config.average_speed_kmh;
        let display = self.route.as_mut().ok_or(RouteError::NoRoute)?;
        display.route_mut().set_path(path, speed);
        self.refresh_route_layer();
        Ok(())
    }

    /// Renames waypoint `index` of the shown route.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] without a route or for a bad index.
    pub fn rename_route_waypoint(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        let display = self.route.as_mut().ok_or(RouteError::NoRoute)?;
        display.route_mut().rename_waypoint(index, name)?;
        Ok(())
    }

    /// Deletes waypoint `index` of the shown route.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] without a route or for a bad index.
    pub fn delete_route_waypoint(&mut self, index: usize) -> Result<Waypoint> {
        self.release_waypoint_drag();
        let speed = self.config.average_speed_kmh;
        let display = self.route.as_mut().ok_or(RouteError::NoRoute)?;
        let removed = display.delete_waypoint(index, speed)?;
        let removed_id = removed.id;
        self.elevation.retarget(|t| match t {
            ElevationTarget::RouteWaypoint(id) if id == removed_id => None,
            other => Some(other),
        });
        self.refresh_route_layer();
        Ok(removed)
    }

    /// Saves the shown route and records the id the store assigned.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NoRoute`], [`RouteError::TooFewWaypoints`], or
    /// the store's error.
    pub fn save_route(&mut self) -> Result<String> {
        let display = self.route.as_mut().ok_or(RouteError::NoRoute)?;
        let record = display.route().to_record()?;
        let id = self
            .store
            .save_route(&record)
            .inspect_err(|e| warn!(error = %e, "route save failed"))?;
        display.route_mut().id = Some(id.clone());
        debug!(%id, "route saved");
        Ok(id)
    }

    /// Starts insert-on-line editing of `path`.
    ///
    /// Until [`MapEditor::disable_draw_route_mode`], the editor's copy of
    /// the path is what gets drawn. `waypoints` are shown as fixed markers.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::InvalidTransition`] unless the editor is idle.
    pub fn enable_draw_route_mode(
        &mut self,
        path: Vec<Position>,
        waypoints: Vec<Waypoint>,
        on_path_change: PathCallback,
    ) -> Result<Transition> {
        let current = self.modes.mode();
        if current != DrawingMode::Idle {
            return Err(ModeError::InvalidTransition {
                from: current,
                to: DrawingMode::RouteEdit,
            }
            .into());
        }
        self.release_waypoint_drag();
        let transition = self.modes.start(DrawingMode::RouteEdit)?;
        self.disable_measurement();
        self.suppress_click = false;
        let session = LineEditSession::new(path, waypoints, self.config.corridor_width_px, on_path_change);
        self.overlay.rebuild(Layer::RouteEdit, session.entities(), None);
        self.overlay.rebuild(Layer::Route, reference_markers(session.waypoints()), None);
        self.line_edit = Some(session);
        Ok(transition)
    }

    /// Ends insert-on-line editing: removes the corridor and control
    /// points and hands the final path to the session callback once.
    /// Returns that path, or `None` if no session was active.
    pub fn disable_draw_route_mode(&mut self) -> Option<Vec<Position>> {
        if self.drag.current().is_some_and(|c| matches!(c.target, DragTarget::ControlPoint(_))) {
            self.drag.end();
            self.set_camera_enabled(true);
        }
        let session = self.line_edit.take()?;
        if self.modes.mode() == DrawingMode::RouteEdit {
            self.modes.cancel();
        }
        self.overlay.remove_layer(Layer::RouteEdit);
        self.refresh_route_layer();
        Some(session.finish())
    }

    /// The path of the active line-edit session.
    #[must_use]
    pub fn draw_route_path(&self) -> Option<&[Position]> {
        self.line_edit.as_ref().map(LineEditSession::path)
    }
}

impl<R: Renderer, S: DrawingStore> MapEditor<R, S> {
    pub(super) fn refresh_route_layer(&mut self) {
        let entities = self.route.as_ref().map(RouteDisplay::entities).unwrap_or_default();
        self.overlay.rebuild(Layer::Route, entities, None);
    }

    fn release_waypoint_drag(&mut self) {
        if self.drag.current().is_some_and(|c| matches!(c.target, DragTarget::Waypoint(_))) {
            self.drag.end();
            self.set_camera_enabled(true);
        }
    }

    fn drop_route_elevations(&mut self) {
        self.elevation.retarget(|t| match t {
            ElevationTarget::RouteWaypoint(_) => None,
            other => Some(other),
        });
    }
}

/// Fixed markers for the waypoints shown during line editing.
fn reference_markers(waypoints: &[Waypoint]) -> Vec<OverlayEntity> {
    waypoints
        .iter()
        .enumerate()
        .map(|(i, w)| {
            OverlayEntity::new(
                OverlayId::RouteWaypoint(i),
                Geometry::Point(w.position),
                Style::new(Role::RouteWaypoint { ordinal: i + 1 }),
            )
        })
        .collect()
}
