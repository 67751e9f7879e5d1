use crate::geometry::DrawingKey;
use crate::render::{Geometry, Style};

/// Groups of overlay entities that are cleared and rebuilt together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Drawings,
    Preview,
    Route,
    RouteEdit,
    Measurement,
    OfflineRegion,
}

/// Logical identity of an overlay entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayId {
    Drawing(DrawingKey),
    PreviewShape,
    PreviewVertex(usize),
    RouteLine,
    RouteWaypoint(usize),
    HitCorridor,
    ControlPoint(usize),
    EditLine,
    MeasureLine,
    MeasureVertex(usize),
    HoldLine,
    OfflineRegion,
}

impl OverlayId {
    /// The layer this entity is cleared with.
    #[must_use]
    pub fn layer(&self) -> Layer {
        match self {
            Self::Drawing(_) => Layer::Drawings,
            Self::PreviewShape | Self::PreviewVertex(_) => Layer::Preview,
            Self::RouteLine | Self::RouteWaypoint(_) => Layer::Route,
            Self::HitCorridor | Self::ControlPoint(_) | Self::EditLine => Layer::RouteEdit,
            Self::MeasureLine | Self::MeasureVertex(_) | Self::HoldLine => Layer::Measurement,
            Self::OfflineRegion => Layer::OfflineRegion,
        }
    }
}

/// A logical entity: identity, world geometry and presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEntity {
    pub id: OverlayId,
    pub geometry: Geometry,
    pub style: Style,
}

impl OverlayEntity {
    /// Creates a new overlay entity.
    #[must_use]
    pub fn new(id: OverlayId, geometry: Geometry, style: Style) -> Self {
        Self {
            id,
            geometry,
            style,
        }
    }
}
