mod display;
mod drag;
mod insert;
mod model;

pub use display::{RouteCallbacks, RouteDisplay, WaypointDeletedFn, WaypointDraggedFn};
pub use drag::{DragCapture, DragState, DragTarget};
pub use insert::{InsertControlPoint, LineEditSession, PathCallback};
pub use model::{ControlPoint, Route, RouteStats, Waypoint, WaypointId, MIN_ROUTE_WAYPOINTS};
