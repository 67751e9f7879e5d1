use thiserror::Error;

use crate::geometry::DrawingKind;
use crate::mode::DrawingMode;

/// Top-level error type for the Waymark editing engine.
#[derive(Debug, Error)]
pub enum WaymarkError {
    #[error(transparent)]
    Mode(#[from] ModeError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to drawing-mode transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("cannot start {to:?} while {from:?} is active")]
    InvalidTransition { from: DrawingMode, to: DrawingMode },

    #[error("{kind:?} needs at least {required} points, has {actual}")]
    InsufficientPoints {
        kind: DrawingKind,
        required: usize,
        actual: usize,
    },

    #[error("{0:?} does not produce a drawing")]
    NotDrawing(DrawingMode),
}

/// Errors related to route editing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("a route needs at least {required} waypoints, has {actual}")]
    TooFewWaypoints { required: usize, actual: usize },

    #[error("waypoint index {index} out of range (len {len})")]
    WaypointOutOfRange { index: usize, len: usize },

    #[error("path index {index} out of range (len {len})")]
    PathIndexOutOfRange { index: usize, len: usize },

    #[error("no route is displayed")]
    NoRoute,
}

/// Errors raised at the persistence boundary.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("store rejected the request: {0}")]
    Rejected(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("invalid measurement value: {0}")]
    InvalidMeasurement(String),

    #[error("drawing is not known to this editor")]
    UnknownDrawing,
}

/// Errors related to editor configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("pinch threshold ({pinch}) must exceed stationary threshold ({stationary})")]
    ThresholdOrder { pinch: f64, stationary: f64 },
}

/// Convenience type alias for results using [`WaymarkError`].
pub type Result<T> = std::result::Result<T, WaymarkError>;
