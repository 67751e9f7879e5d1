use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::drawing::checked_position;
use crate::error::{PersistenceError, Result};
use crate::geometry::Position;
use crate::route::{Route, RouteStats};

/// A route as exchanged with the store.
///
/// `path_coordinates` and `waypoint_coordinates` are independent JSON
/// documents. Path entries are `[lng, lat]` or `[lng, lat, elevation]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub path_coordinates: String,
    pub waypoint_coordinates: String,
    #[serde(default)]
    pub total_distance: f64,
    #[serde(default)]
    pub elevation_gain: f64,
    #[serde(default)]
    pub elevation_loss: f64,
    /// Seconds.
    #[serde(default)]
    pub estimated_time: u64,
}

/// One entry of `waypoint_coordinates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointEntry {
    pub name: String,
    pub lng_lat: [f64; 2],
    #[serde(default)]
    pub elevation: Option<f64>,
}

impl Route {
    /// Encodes the route for saving.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RouteError::TooFewWaypoints`] below two
    /// waypoints, or a JSON error.
    pub fn to_record(&self) -> Result<RouteRecord> {
        self.validate()?;
        let path: Vec<Vec<f64>> = self
            .path_coordinates
            .iter()
            .map(|p| {
                let mut v = p.lng_lat().to_vec();
                v.extend(p.elevation);
                v
            })
            .collect();
        let waypoints: Vec<WaypointEntry> = self
            .waypoints
            .iter()
            .map(|w| WaypointEntry {
                name: w.name.clone(),
                lng_lat: w.position.lng_lat(),
                elevation: w.position.elevation,
            })
            .collect();
        Ok(RouteRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            path_coordinates: serde_json::to_string(&path).map_err(PersistenceError::from)?,
            waypoint_coordinates: serde_json::to_string(&waypoints).map_err(PersistenceError::from)?,
            total_distance: self.stats.total_distance,
            elevation_gain: self.stats.elevation_gain,
            elevation_loss: self.stats.elevation_loss,
            estimated_time: self.stats.estimated_time.as_secs(),
        })
    }

    /// Decodes a stored route. Stored statistics are kept as-is.
    ///
    /// # Errors
    ///
    /// Returns a persistence error for malformed coordinates and
    /// [`crate::error::RouteError::TooFewWaypoints`] below two waypoints.
    pub fn from_record(record: &RouteRecord) -> Result<Self> {
        let entries: Vec<WaypointEntry> =
            serde_json::from_str(&record.waypoint_coordinates).map_err(PersistenceError::from)?;
        let raw_path: Vec<Vec<f64>> =
            serde_json::from_str(&record.path_coordinates).map_err(PersistenceError::from)?;

        let mut waypoints = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut position = checked_position(entry.lng_lat)?;
            position.elevation = entry.elevation;
            waypoints.push((entry.name, position));
        }
        let path = raw_path
            .into_iter()
            .map(|v| match v.as_slice() {
                [lng, lat] => checked_position([*lng, *lat]),
                [lng, lat, ele] => checked_position([*lng, *lat]).map(|p| p.with_elevation(*ele)),
                _ => Err(PersistenceError::InvalidCoordinates(format!(
                    "path entry has {} values",
                    v.len()
                ))),
            })
            .collect::<std::result::Result<Vec<Position>, _>>()?;

        let mut route = Route::new(record.name.clone(), waypoints);
        route.validate()?;
        route.id.clone_from(&record.id);
        route.path_coordinates = path;
        route.stats = RouteStats {
            total_distance: record.total_distance,
            elevation_gain: record.elevation_gain,
            elevation_loss: record.elevation_loss,
            estimated_time: Duration::from_secs(record.estimated_time),
        };
        Ok(route)
    }
}
