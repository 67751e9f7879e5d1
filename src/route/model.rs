use std::fmt;
use std::time::Duration;

use crate::config::DEFAULT_AVERAGE_SPEED_KMH;
use crate::error::RouteError;
use crate::geometry::Position;
use crate::math::total_distance;

/// Fewest waypoints a route may be saved with.
pub const MIN_ROUTE_WAYPOINTS: usize = 2;

/// Stable identity of a waypoint within its route, kept across deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaypointId(pub u64);

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wp{}", self.0)
    }
}

/// A named stop along a route.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub id: WaypointId,
    pub name: String,
    pub position: Position,
    /// Zero-based position in the route; always equals the list index.
    pub order_index: usize,
}

/// Totals derived from a route's rendered path.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteStats {
    /// Meters.
    pub total_distance: f64,
    /// Meters climbed, summed over consecutive points that both carry an
    /// elevation.
    pub elevation_gain: f64,
    /// Meters descended, same rule as `elevation_gain`.
    pub elevation_loss: f64,
    pub estimated_time: Duration,
}

impl RouteStats {
    /// Computes statistics over `path` at `average_speed_kmh`.
    #[must_use]
    pub fn compute(path: &[Position], average_speed_kmh: f64) -> Self {
        let total_distance = total_distance(path);
        let (elevation_gain, elevation_loss) = path
            .windows(2)
            .filter_map(|w| Some(w[1].elevation? - w[0].elevation?))
            .fold((0.0, 0.0), |(gain, loss), delta| {
                if delta > 0.0 {
                    (gain + delta, loss)
                } else {
                    (gain, loss - delta)
                }
            });
        let meters_per_second = average_speed_kmh * 1000.0 / 3600.0;
        let estimated_time = if meters_per_second > 0.0 {
            Duration::try_from_secs_f64(total_distance / meters_per_second).unwrap_or_default()
        } else {
            Duration::ZERO
        };
        Self {
            total_distance,
            elevation_gain,
            elevation_loss,
            estimated_time,
        }
    }
}

/// A point spliced into a route's path while editing its line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub path_index: usize,
    pub position: Position,
}

/// An ordered list of waypoints plus the line drawn through them.
///
/// `path_coordinates` is what gets rendered. It may come from an external
/// router and is consumed as-is; editing waypoints resets it to the
/// straight line through the waypoints until the caller supplies a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Store-assigned identifier; `None` until saved.
    pub id: Option<String>,
    pub name: String,
    pub waypoints: Vec<Waypoint>,
    pub path_coordinates: Vec<Position>,
    pub stats: RouteStats,
    next_id: u64,
}

impl Route {
    /// Creates a route through `waypoints`, given as `(name, position)`
    /// pairs. The path starts as the straight line through them.
    #[must_use]
    pub fn new<I, N>(name: impl Into<String>, waypoints: I) -> Self
    where
        I: IntoIterator<Item = (N, Position)>,
        N: Into<String>,
    {
        let mut route = Self {
            id: None,
            name: name.into(),
            waypoints: Vec::new(),
            path_coordinates: Vec::new(),
            stats: RouteStats::default(),
            next_id: 0,
        };
        for (name, position) in waypoints {
            route.push_waypoint(name, position);
        }
        route.reset_path(DEFAULT_AVERAGE_SPEED_KMH);
        route
    }

    /// Appends a waypoint and returns its id. The path is not touched.
    pub fn push_waypoint(&mut self, name: impl Into<String>, position: Position) -> WaypointId {
        let id = WaypointId(self.next_id);
        self.next_id += 1;
        self.waypoints.push(Waypoint {
            id,
            name: name.into(),
            position,
            order_index: self.waypoints.len(),
        });
        id
    }

    /// Waypoint positions in order.
    #[must_use]
    pub fn waypoint_positions(&self) -> Vec<Position> {
        self.waypoints.iter().map(|w| w.position).collect()
    }

    /// Index of the waypoint with `id`.
    #[must_use]
    pub fn index_of(&self, id: WaypointId) -> Option<usize> {
        self.waypoints.iter().position(|w| w.id == id)
    }

    /// Replaces the rendered path and recomputes the statistics.
    pub fn set_path(&mut self, path: Vec<Position>, average_speed_kmh: f64) {
        self.path_coordinates = path;
        self.recompute_stats(average_speed_kmh);
    }

    /// Redraws the path as the straight line through the waypoints.
    pub fn reset_path(&mut self, average_speed_kmh: f64) {
        let path = self.waypoint_positions();
        self.set_path(path, average_speed_kmh);
    }

    /// Recomputes [`RouteStats`] from the current path.
    pub fn recompute_stats(&mut self, average_speed_kmh: f64) {
        self.stats = RouteStats::compute(&self.path_coordinates, average_speed_kmh);
    }

    /// Moves waypoint `index` and redraws the path through the waypoints.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::WaypointOutOfRange`] for a bad index.
    pub fn move_waypoint(
        &mut self,
        index: usize,
        position: Position,
        average_speed_kmh: f64,
    ) -> Result<(), RouteError> {
        let len = self.waypoints.len();
        let waypoint = self
            .waypoints
            .get_mut(index)
            .ok_or(RouteError::WaypointOutOfRange { index, len })?;
        waypoint.position = position;
        self.reset_path(average_speed_kmh);
        Ok(())
    }

    /// Removes waypoint `index`, renumbers the rest and redraws the path.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::WaypointOutOfRange`] for a bad index.
    pub fn remove_waypoint(
        &mut self,
        index: usize,
        average_speed_kmh: f64,
    ) -> Result<Waypoint, RouteError> {
        let len = self.waypoints.len();
        if index >= len {
            return Err(RouteError::WaypointOutOfRange { index, len });
        }
        let removed = self.waypoints.remove(index);
        for (i, w) in self.waypoints.iter_mut().enumerate().skip(index) {
            w.order_index = i;
        }
        self.reset_path(average_speed_kmh);
        Ok(removed)
    }

    /// Renames waypoint `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::WaypointOutOfRange`] for a bad index.
    pub fn rename_waypoint(&mut self, index: usize, name: impl Into<String>) -> Result<(), RouteError> {
        let len = self.waypoints.len();
        let waypoint = self
            .waypoints
            .get_mut(index)
            .ok_or(RouteError::WaypointOutOfRange { index, len })?;
        waypoint.name = name.into();
        Ok(())
    }

    /// Sets the elevation of waypoint `id` if it still sits at `at`.
    /// Returns whether anything changed.
    pub fn set_waypoint_elevation(&mut self, id: WaypointId, at: &Position, elevation: f64) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let waypoint = &mut self.waypoints[index];
        if !waypoint.position.same_location(at) {
            return false;
        }
        waypoint.position.elevation = Some(elevation);
        if let Some(p) = self.path_coordinates.get_mut(index) {
            if p.same_location(at) {
                p.elevation = Some(elevation);
            }
        }
        true
    }

    /// Checks that the route can be saved.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::TooFewWaypoints`] below two waypoints.
    pub fn validate(&self) -> Result<(), RouteError> {
        if self.waypoints.len() < MIN_ROUTE_WAYPOINTS {
            return Err(RouteError::TooFewWaypoints {
                required: MIN_ROUTE_WAYPOINTS,
                actual: self.waypoints.len(),
            });
        }
        Ok(())
    }
}
