use tracing::debug;

use super::model::{Route, Waypoint};
use crate::error::RouteError;
use crate::geometry::Position;
use crate::overlay::{OverlayEntity, OverlayId};
use crate::render::{Geometry, Role, Style};

/// Called after a waypoint drag ends: `(index, new_position, all_waypoints)`.
pub type WaypointDraggedFn = Box<dyn FnMut(usize, Position, &[Waypoint])>;

/// Called after a waypoint is deleted: `(index, remaining_waypoints)`.
pub type WaypointDeletedFn = Box<dyn FnMut(usize, &[Waypoint])>;

/// Callbacks bound to one displayed route.
#[derive(Default)]
pub struct RouteCallbacks {
    pub on_waypoint_dragged: Option<WaypointDraggedFn>,
    pub on_waypoint_deleted: Option<WaypointDeletedFn>,
}

impl RouteCallbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_waypoint_dragged(mut self, f: impl FnMut(usize, Position, &[Waypoint]) + 'static) -> Self {
        self.on_waypoint_dragged = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_waypoint_deleted(mut self, f: impl FnMut(usize, &[Waypoint]) + 'static) -> Self {
        self.on_waypoint_deleted = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for RouteCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteCallbacks")
            .field("on_waypoint_dragged", &self.on_waypoint_dragged.is_some())
            .field("on_waypoint_deleted", &self.on_waypoint_deleted.is_some())
            .finish()
    }
}

/// A route on screen, optionally with draggable waypoints.
#[derive(Debug)]
pub struct RouteDisplay {
    route: Route,
    editable: bool,
    callbacks: RouteCallbacks,
}

impl RouteDisplay {
    #[must_use]
    pub fn new(route: Route, editable: bool, callbacks: RouteCallbacks) -> Self {
        Self {
            route,
            editable,
            callbacks,
        }
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn route_mut(&mut self) -> &mut Route {
        &mut self.route
    }

    #[must_use]
    pub fn editable(&self) -> bool {
        self.editable
    }

    /// Hands the route back to the caller.
    #[must_use]
    pub fn into_route(self) -> Route {
        self.route
    }

    /// Waypoints as pick candidates.
    pub fn waypoint_candidates(&self) -> impl Iterator<Item = (usize, Position)> + '_ {
        self.route.waypoints.iter().map(|w| (w.order_index, w.position))
    }

    /// The rendered route line.
    #[must_use]
    pub fn line_entity(&self) -> OverlayEntity {
        OverlayEntity::new(
            OverlayId::RouteLine,
            Geometry::Line(self.route.path_coordinates.clone()),
            Style::new(Role::RouteLine),
        )
    }

    /// The marker for waypoint `index`, placed at `at` when given.
    #[must_use]
    pub fn waypoint_entity(&self, index: usize, at: Option<Position>) -> Option<OverlayEntity> {
        let waypoint = self.route.waypoints.get(index)?;
        let mut style = Style::new(Role::RouteWaypoint { ordinal: index + 1 });
        if self.editable {
            style = style.draggable();
        }
        Some(OverlayEntity::new(
            OverlayId::RouteWaypoint(index),
            Geometry::Point(at.unwrap_or(waypoint.position)),
            style,
        ))
    }

    /// Everything drawn on the route layer.
    #[must_use]
    pub fn entities(&self) -> Vec<OverlayEntity> {
        let mut entities = Vec::with_capacity(self.route.waypoints.len() + 1);
        if self.route.path_coordinates.len() >= 2 {
            entities.push(self.line_entity());
        }
        entities.extend((0..self.route.waypoints.len()).filter_map(|i| self.waypoint_entity(i, None)));
        entities
    }

    /// Commits a finished drag: moves the waypoint, redraws the path and
    /// notifies the caller.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::WaypointOutOfRange`] for a bad index.
    pub fn commit_drag(
        &mut self,
        index: usize,
        position: Position,
        average_speed_kmh: f64,
    ) -> Result<(), RouteError> {
        self.route.move_waypoint(index, position, average_speed_kmh)?;
        debug!(index, "route waypoint moved");
        if let Some(callback) = self.callbacks.on_waypoint_dragged.as_mut() {
            callback(index, position, &self.route.waypoints);
        }
        Ok(())
    }

    /// Deletes waypoint `index` and notifies the caller.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::WaypointOutOfRange`] for a bad index.
    pub fn delete_waypoint(&mut self, index: usize, average_speed_kmh: f64) -> Result<Waypoint, RouteError> {
        let removed = self.route.remove_waypoint(index, average_speed_kmh)?;
        debug!(index, remaining = self.route.waypoints.len(), "route waypoint deleted");
        if let Some(callback) = self.callbacks.on_waypoint_deleted.as_mut() {
            callback(index, &self.route.waypoints);
        }
        Ok(removed)
    }
}
