use crate::geometry::Position;
use crate::math::distance_2d::point_to_polyline_dist;
use crate::math::ScreenPoint;
use crate::render::Projection;

/// Finds the candidate nearest to a screen point within a pixel radius.
pub struct FindNearest {
    screen: ScreenPoint,
    radius_px: f64,
}

impl FindNearest {
    /// Creates a new `FindNearest` query.
    #[must_use]
    pub fn new(screen: ScreenPoint, radius_px: f64) -> Self {
        Self { screen, radius_px }
    }

    /// Executes the query.
    ///
    /// Candidates that do not project are skipped. Equal distances resolve
    /// to the earliest candidate. A disposed projection finds nothing.
    pub fn execute<K, P, I>(&self, projection: &P, candidates: I) -> Option<K>
    where
        P: Projection + ?Sized,
        I: IntoIterator<Item = (K, Position)>,
    {
        if projection.is_disposed() {
            return None;
        }
        let mut best: Option<(K, f64)> = None;
        for (id, position) in candidates {
            let Some(screen) = projection.project(&position) else {
                continue;
            };
            let d = (screen - self.screen).norm();
            if d > self.radius_px {
                continue;
            }
            if best.as_ref().is_none_or(|(_, bd)| d < *bd) {
                best = Some((id, d));
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Tests whether a screen point falls inside the band around a polyline.
pub struct LineHit {
    screen: ScreenPoint,
    half_width_px: f64,
}

impl LineHit {
    /// Creates a new `LineHit` query for a band `width_px` wide.
    #[must_use]
    pub fn new(screen: ScreenPoint, width_px: f64) -> Self {
        Self {
            screen,
            half_width_px: width_px / 2.0,
        }
    }

    /// Executes the query. Vertices that do not project are dropped.
    pub fn execute<P: Projection + ?Sized>(&self, projection: &P, path: &[Position]) -> bool {
        if projection.is_disposed() {
            return false;
        }
        let projected: Vec<ScreenPoint> = path.iter().filter_map(|p| projection.project(p)).collect();
        point_to_polyline_dist(self.screen, &projected).is_some_and(|d| d <= self.half_width_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{HeadlessRenderer, Viewport};

    fn renderer() -> HeadlessRenderer {
        HeadlessRenderer::new(Viewport::new(Position::new(0.0, 0.0), 10.0, 800.0, 600.0))
    }

    fn screen_of(r: &HeadlessRenderer, p: Position) -> ScreenPoint {
        r.project(&p).unwrap_or_else(|| ScreenPoint::new(-1.0, -1.0))
    }

    #[test]
    fn exact_hit_returns_candidate() {
        let r = renderer();
        let target = Position::new(0.01, 0.01);
        let found = FindNearest::new(screen_of(&r, target), 10.0)
            .execute(&r, [(7u32, Position::new(0.2, 0.2)), (3, target)]);
        assert_eq!(found, Some(3));
    }

    #[test]
    fn nothing_within_radius() {
        let r = renderer();
        let found = FindNearest::new(ScreenPoint::new(400.0, 300.0), 5.0)
            .execute(&r, [(1u32, Position::new(0.1, 0.1))]);
        assert_eq!(found, None);
    }

    #[test]
    fn ties_resolve_to_first() {
        let r = renderer();
        let p = Position::new(0.0, 0.0);
        let found = FindNearest::new(ScreenPoint::new(400.0, 300.0), 5.0)
            .execute(&r, [("a", p), ("b", p)]);
        assert_eq!(found, Some("a"));
    }

    #[test]
    fn unprojectable_candidates_are_skipped() {
        let r = renderer();
        let found = FindNearest::new(ScreenPoint::new(400.0, 300.0), 1e9)
            .execute(&r, [(1u32, Position::new(90.0, 0.0)), (2, Position::new(0.05, 0.0))]);
        assert_eq!(found, Some(2));
    }

    #[test]
    fn disposed_finds_nothing() {
        let mut r = renderer();
        r.dispose();
        let found = FindNearest::new(ScreenPoint::new(400.0, 300.0), 50.0)
            .execute(&r, [(1u32, Position::new(0.0, 0.0))]);
        assert_eq!(found, None);
    }

    #[test]
    fn line_band_hit_and_miss() {
        let r = renderer();
        let path = [Position::new(-0.1, 0.0), Position::new(0.1, 0.0)];
        assert!(LineHit::new(ScreenPoint::new(400.0, 305.0), 20.0).execute(&r, &path));
        assert!(!LineHit::new(ScreenPoint::new(400.0, 320.0), 20.0).execute(&r, &path));
        assert!(!LineHit::new(ScreenPoint::new(400.0, 300.0), 20.0).execute(&r, &path[..1]));
    }
}
