use crate::geometry::DrawingKind;

/// What a primitive represents. Adapters map roles to concrete paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Role {
    /// A finished drawing.
    Drawing(DrawingKind),
    /// The outline or line of a drawing still being built.
    Preview(DrawingKind),
    /// A numbered vertex marker (1-based).
    Vertex { ordinal: usize },
    RouteLine,
    /// A user-placed route waypoint (1-based).
    RouteWaypoint { ordinal: usize },
    /// Invisible, wide clickable band beneath the route line.
    HitCorridor { width_px: f64 },
    ControlPoint,
    MeasurementLine,
    /// Filled rectangle with a dashed outline.
    OfflineRegion,
}

/// Presentation flags attached to every primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub role: Role,
    /// Selected or being dragged.
    pub emphasized: bool,
    pub draggable: bool,
}

impl Style {
    /// A plain, non-interactive style.
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            role,
            emphasized: false,
            draggable: false,
        }
    }

    /// Marks the primitive as draggable.
    #[must_use]
    pub fn draggable(mut self) -> Self {
        self.draggable = true;
        self
    }

    /// Returns the emphasized variant of this style.
    #[must_use]
    pub fn emphasized(mut self) -> Self {
        self.emphasized = true;
        self
    }
}
