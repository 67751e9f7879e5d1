//! The capability surface the editor needs from a map rendering library.
//!
//! The editor never touches SDK types directly; each rendering library gets
//! an adapter implementing [`Renderer`]. [`HeadlessRenderer`] is the adapter
//! used off-screen and in tests.

mod headless;
mod style;

pub use headless::{HeadlessPrimitive, HeadlessRenderer, Viewport};
pub use style::{Role, Style};

use crate::geometry::Position;
use crate::math::ScreenPoint;

slotmap::new_key_type! {
    /// Handle to a primitive owned by a renderer.
    pub struct PrimitiveHandle;
}

/// Shape family of a rendered primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Point,
    Line,
    Polygon,
}

/// World-space geometry handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Position),
    Line(Vec<Position>),
    /// Open ring; the renderer closes it.
    Polygon(Vec<Position>),
}

impl Geometry {
    /// The primitive family this geometry renders as.
    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Point(_) => PrimitiveKind::Point,
            Self::Line(_) => PrimitiveKind::Line,
            Self::Polygon(_) => PrimitiveKind::Polygon,
        }
    }

    /// All vertices, in order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        match self {
            Self::Point(p) => std::slice::from_ref(p),
            Self::Line(pts) | Self::Polygon(pts) => pts,
        }
    }
}

/// Conversion between world positions and screen pixels.
pub trait Projection {
    /// World → screen. `None` when off-screen or behind the camera.
    fn project(&self, world: &Position) -> Option<ScreenPoint>;

    /// Screen → world. `None` when nothing is under the pixel (e.g. sky).
    fn unproject(&self, screen: ScreenPoint) -> Option<Position>;

    /// Current camera zoom level.
    fn current_zoom(&self) -> f64;

    /// Whether the underlying map has been torn down.
    fn is_disposed(&self) -> bool {
        false
    }
}

/// Primitive lifecycle and camera control on top of [`Projection`].
pub trait Renderer: Projection {
    /// Adds a primitive, returning its handle, or `None` if the renderer
    /// refused it.
    fn add_primitive(&mut self, geometry: &Geometry, style: &Style) -> Option<PrimitiveHandle>;

    /// Replaces the geometry of an existing primitive.
    fn update_primitive(&mut self, handle: PrimitiveHandle, geometry: &Geometry);

    /// Removes a primitive. Unknown handles are ignored.
    fn remove_primitive(&mut self, handle: PrimitiveHandle);

    /// Enables or suspends pan, zoom, rotate and tilt.
    fn set_camera_interaction_enabled(&mut self, enabled: bool);
}
