pub mod distance_2d;
pub mod geodesic;
pub mod polygon_2d;

pub use geodesic::{distance, polygon_area, segment_distances, total_distance};

/// 2D point type, used for screen-space pixels and planar lon/lat math.
pub type Point2 = nalgebra::Point2<f64>;

/// A position on screen, in pixels.
pub type ScreenPoint = Point2;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Mean Earth radius used for great-circle distances, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Length of one degree of latitude, in meters.
pub const METERS_PER_DEGREE: f64 = 111_320.0;
