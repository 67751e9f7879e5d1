use super::Point2;
use crate::geometry::Position;

/// Returns the minimum distance from point `p` to the segment `a`→`b`.
#[must_use]
pub fn point_to_segment_dist(p: Point2, a: Point2, b: Point2) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (p - a).norm();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Perpendicular distance from `p` to the segment `seg_start`→`seg_end`,
/// measured in raw longitude/latitude degrees.
///
/// Only meaningful for ranking segments against each other, not as a
/// physical distance.
#[must_use]
pub fn point_to_segment_distance(p: &Position, seg_start: &Position, seg_end: &Position) -> f64 {
    point_to_segment_dist(p.to_point2(), seg_start.to_point2(), seg_end.to_point2())
}

/// Distance from `p` to the nearest segment of an open polyline.
///
/// Returns `None` for fewer than two vertices.
#[must_use]
pub fn point_to_polyline_dist(p: Point2, vertices: &[Point2]) -> Option<f64> {
    vertices
        .windows(2)
        .map(|w| point_to_segment_dist(p, w[0], w[1]))
        .reduce(f64::min)
}

/// Index of the segment of `path` nearest to `p`, together with its distance.
///
/// Ties resolve to the earliest segment.
#[must_use]
pub fn nearest_segment(p: &Position, path: &[Position]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, w) in path.windows(2).enumerate() {
        let d = point_to_segment_distance(p, &w[0], &w[1]);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn pt(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn segment_dist_perpendicular_projection() {
        // Point (1, 1) to segment (0,0)→(2,0). Closest at (1,0), dist = 1.
        let d = point_to_segment_dist(pt(1.0, 1.0), pt(0.0, 0.0), pt(2.0, 0.0));
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_endpoint_closest() {
        let d = point_to_segment_dist(pt(-1.0, 0.0), pt(0.0, 0.0), pt(2.0, 0.0));
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_on_segment() {
        let d = point_to_segment_dist(pt(1.0, 0.0), pt(0.0, 0.0), pt(2.0, 0.0));
        assert!(d.abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_degenerate() {
        // Zero-length segment: distance is point-to-point.
        let d = point_to_segment_dist(pt(3.0, 4.0), pt(0.0, 0.0), pt(0.0, 0.0));
        assert!((d - 5.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn position_segment_distance_uses_degrees() {
        let d = point_to_segment_distance(
            &Position::new(1.0, 5.0),
            &Position::new(0.0, 0.0),
            &Position::new(0.0, 10.0),
        );
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn polyline_dist_picks_closest_segment() {
        let verts = [pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0)];
        let d = point_to_polyline_dist(pt(12.0, 5.0), &verts).unwrap();
        assert!((d - 2.0).abs() < TOL, "d={d}");
        assert!(point_to_polyline_dist(pt(0.0, 0.0), &verts[..1]).is_none());
    }

    #[test]
    fn nearest_segment_on_vertical_path() {
        let path = [
            Position::new(0.0, 0.0),
            Position::new(0.0, 10.0),
            Position::new(0.0, 20.0),
        ];
        let (i, d) = nearest_segment(&Position::new(0.0, 15.0), &path).unwrap();
        assert_eq!(i, 1);
        assert!(d.abs() < TOL);
    }

    #[test]
    fn nearest_segment_tie_prefers_first() {
        let path = [
            Position::new(0.0, 0.0),
            Position::new(0.0, 10.0),
            Position::new(0.0, 20.0),
        ];
        // Exactly on the shared vertex: both segments at distance 0.
        let (i, _) = nearest_segment(&Position::new(0.0, 10.0), &path).unwrap();
        assert_eq!(i, 0);
        assert!(nearest_segment(&Position::new(0.0, 0.0), &path[..1]).is_none());
    }
}
