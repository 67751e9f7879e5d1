use slotmap::SlotMap;
use tracing::trace;

use super::{Geometry, PrimitiveHandle, Projection, Renderer, Style};
use crate::geometry::Position;
use crate::math::ScreenPoint;

/// An equirectangular camera over a fixed-size screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// World position at the center of the screen.
    pub center: Position,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
    /// Rows above this pixel show sky and cannot be unprojected.
    pub horizon_px: f64,
}

impl Viewport {
    /// Creates a viewport with no sky.
    #[must_use]
    pub fn new(center: Position, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
            horizon_px: 0.0,
        }
    }

    /// Screen pixels per degree at the current zoom (256 px tiles).
    #[must_use]
    pub fn pixels_per_degree(&self) -> f64 {
        256.0 * self.zoom.exp2() / 360.0
    }

    fn on_screen(&self, p: ScreenPoint) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }
}

/// A primitive as held by [`HeadlessRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessPrimitive {
    pub geometry: Geometry,
    pub style: Style,
}

/// A renderer adapter with no display, for server-side use and tests.
#[derive(Debug)]
pub struct HeadlessRenderer {
    viewport: Viewport,
    primitives: SlotMap<PrimitiveHandle, HeadlessPrimitive>,
    camera_enabled: bool,
    disposed: bool,
}

impl HeadlessRenderer {
    /// Creates a renderer looking through `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            primitives: SlotMap::with_key(),
            camera_enabled: true,
            disposed: false,
        }
    }

    /// Returns the current viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Moves the camera.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Returns a primitive by handle.
    #[must_use]
    pub fn primitive(&self, handle: PrimitiveHandle) -> Option<&HeadlessPrimitive> {
        self.primitives.get(handle)
    }

    /// Iterates over all live primitives.
    pub fn primitives(&self) -> impl Iterator<Item = (PrimitiveHandle, &HeadlessPrimitive)> {
        self.primitives.iter()
    }

    /// Number of live primitives.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Whether pan/zoom/rotate/tilt are currently allowed.
    #[must_use]
    pub fn camera_enabled(&self) -> bool {
        self.camera_enabled
    }

    /// Simulates the map being torn down underneath the editor.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.primitives.clear();
    }
}

impl Projection for HeadlessRenderer {
    fn project(&self, world: &Position) -> Option<ScreenPoint> {
        if self.disposed {
            return None;
        }
        let vp = &self.viewport;
        let ppd = vp.pixels_per_degree();
        let screen = ScreenPoint::new(
            vp.width / 2.0 + (world.longitude - vp.center.longitude) * ppd,
            vp.height / 2.0 - (world.latitude - vp.center.latitude) * ppd,
        );
        vp.on_screen(screen).then_some(screen)
    }

    fn unproject(&self, screen: ScreenPoint) -> Option<Position> {
        let vp = &self.viewport;
        if self.disposed || !vp.on_screen(screen) || screen.y < vp.horizon_px {
            return None;
        }
        let ppd = vp.pixels_per_degree();
        let latitude = vp.center.latitude - (screen.y - vp.height / 2.0) / ppd;
        if !(-90.0..=90.0).contains(&latitude) {
            return None;
        }
        Some(Position::new(
            vp.center.longitude + (screen.x - vp.width / 2.0) / ppd,
            latitude,
        ))
    }

    fn current_zoom(&self) -> f64 {
        self.viewport.zoom
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Renderer for HeadlessRenderer {
    fn add_primitive(&mut self, geometry: &Geometry, style: &Style) -> Option<PrimitiveHandle> {
        if self.disposed {
            return None;
        }
        let handle = self.primitives.insert(HeadlessPrimitive {
            geometry: geometry.clone(),
            style: *style,
        });
        trace!(?handle, kind = ?geometry.kind(), "primitive added");
        Some(handle)
    }

    fn update_primitive(&mut self, handle: PrimitiveHandle, geometry: &Geometry) {
        if let Some(prim) = self.primitives.get_mut(handle) {
            prim.geometry = geometry.clone();
        }
    }

    fn remove_primitive(&mut self, handle: PrimitiveHandle) {
        self.primitives.remove(handle);
    }

    fn set_camera_interaction_enabled(&mut self, enabled: bool) {
        self.camera_enabled = enabled;
    }
}
