use super::polygon_2d::signed_area_2d;
use super::{Point2, EARTH_RADIUS_M, METERS_PER_DEGREE};
use crate::geometry::Position;

/// Great-circle (haversine) distance between two positions, in meters.
///
/// Elevation is ignored.
#[must_use]
pub fn distance(a: &Position, b: &Position) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Distances between each consecutive pair of points, in meters.
#[must_use]
pub fn segment_distances(points: &[Position]) -> Vec<f64> {
    points.windows(2).map(|w| distance(&w[0], &w[1])).collect()
}

/// Length of the polyline through `points`, in meters.
#[must_use]
pub fn total_distance(points: &[Position]) -> f64 {
    segment_distances(points).iter().sum()
}

/// Approximate area enclosed by `points`, in square meters.
///
/// Shoelace on raw degrees, scaled by the length of a degree of latitude
/// and of longitude at the mean latitude. Returns 0 for fewer than three
/// points.
#[must_use]
pub fn polygon_area(points: &[Position]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean_lat = points.iter().map(|p| p.latitude).sum::<f64>() / points.len() as f64;
    let ring: Vec<Point2> = points.iter().map(Position::to_point2).collect();
    let lng_scale = METERS_PER_DEGREE * mean_lat.to_radians().cos();
    signed_area_2d(&ring).abs() * METERS_PER_DEGREE * lng_scale
}

/// Midpoint of two positions in degree space, used to anchor labels.
#[must_use]
pub fn midpoint(a: &Position, b: &Position) -> Position {
    Position::new(
        (a.longitude + b.longitude) / 2.0,
        (a.latitude + b.latitude) / 2.0,
    )
}
