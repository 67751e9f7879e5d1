mod preview;

pub use preview::preview_entities;

use tracing::debug;

use crate::error::ModeError;
use crate::geometry::{Drawing, DrawingKind, Position};

/// The interaction mode. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawingMode {
    #[default]
    Idle,
    Waypoint,
    Line,
    Polygon,
    Measurement,
    RouteEdit,
    OfflineSelect,
}

impl DrawingMode {
    /// The kind of drawing this mode produces, if any.
    #[must_use]
    pub fn drawing_kind(self) -> Option<DrawingKind> {
        match self {
            Self::Waypoint => Some(DrawingKind::Waypoint),
            Self::Line => Some(DrawingKind::Line),
            Self::Polygon => Some(DrawingKind::Polygon),
            Self::Measurement => Some(DrawingKind::Measurement),
            Self::Idle | Self::RouteEdit | Self::OfflineSelect => None,
        }
    }
}

/// Outcome of [`ModeMachine::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The requested mode is now active.
    Started(DrawingMode),
    /// The requested mode was already active and has been switched off.
    ToggledOff(DrawingMode),
}

/// Outcome of appending a point to the in-progress drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointAdded {
    /// The point was appended; the drawing now has `count` points.
    Appended { count: usize },
    /// The drawing is complete and should be finished right away.
    Complete,
}

/// Points collected so far for a drawing not yet finished.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSession {
    pub kind: DrawingKind,
    pub points: Vec<Position>,
}

impl DrawingSession {
    fn new(kind: DrawingKind) -> Self {
        Self {
            kind,
            points: Vec::new(),
        }
    }
}

/// Mode state plus the drawing being built in it.
///
/// The session exists exactly when the mode produces drawings, so "one
/// mode at a time" and "no stray drawing state" hold by construction.
#[derive(Debug, Default)]
pub struct ModeMachine {
    mode: DrawingMode,
    session: Option<DrawingSession>,
}

impl ModeMachine {
    /// Creates a machine in [`DrawingMode::Idle`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active mode.
    #[must_use]
    pub fn mode(&self) -> DrawingMode {
        self.mode
    }

    /// The drawing in progress, if the active mode produces one.
    #[must_use]
    pub fn session(&self) -> Option<&DrawingSession> {
        self.session.as_ref()
    }

    /// Starts `mode`.
    ///
    /// Starting the active mode again switches it off; starting
    /// [`DrawingMode::Idle`] cancels whatever is active.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::InvalidTransition`] if a different mode is
    /// already active.
    pub fn start(&mut self, mode: DrawingMode) -> Result<Transition, ModeError> {
        if mode == DrawingMode::Idle || mode == self.mode {
            let previous = self.cancel();
            return Ok(Transition::ToggledOff(previous));
        }
        if self.mode != DrawingMode::Idle {
            return Err(ModeError::InvalidTransition {
                from: self.mode,
                to: mode,
            });
        }
        self.mode = mode;
        self.session = mode.drawing_kind().map(DrawingSession::new);
        debug!(?mode, "mode started");
        Ok(Transition::Started(mode))
    }

    /// Returns to idle, discarding any drawing in progress. Returns the
    /// mode that was active.
    pub fn cancel(&mut self) -> DrawingMode {
        let previous = std::mem::take(&mut self.mode);
        if let Some(session) = self.session.take() {
            debug!(?previous, discarded = session.points.len(), "drawing cancelled");
        } else if previous != DrawingMode::Idle {
            debug!(?previous, "mode cancelled");
        }
        previous
    }

    /// Appends a point to the drawing in progress.
    ///
    /// Returns `None` when the active mode does not collect points.
    pub fn push_point(&mut self, position: Position) -> Option<PointAdded> {
        let session = self.session.as_mut()?;
        session.points.push(position);
        if session.kind == DrawingKind::Waypoint {
            return Some(PointAdded::Complete);
        }
        Some(PointAdded::Appended {
            count: session.points.len(),
        })
    }

    /// Drops the most recent point of the drawing in progress.
    pub fn undo_last_point(&mut self) -> Option<Position> {
        self.session.as_mut()?.points.pop()
    }

    /// Back-fills the elevation of point `index` of the drawing in
    /// progress, if it still sits at `at`.
    pub fn set_point_elevation(&mut self, index: usize, at: &Position, elevation: f64) -> bool {
        let Some(point) = self
            .session
            .as_mut()
            .and_then(|s| s.points.get_mut(index))
            .filter(|p| p.same_location(at))
        else {
            return false;
        };
        point.elevation = Some(elevation);
        true
    }

    /// Ends the drawing in progress and returns it, leaving the machine idle.
    ///
    /// A drawing with no points is treated as a cancel and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::NotDrawing`] if the active mode produces no
    /// drawings, and [`ModeError::InsufficientPoints`] if the drawing has
    /// some points but fewer than its kind needs; the drawing is kept so
    /// the user can continue.
    pub fn finish(&mut self) -> Result<Option<Drawing>, ModeError> {
        let Some(session) = self.session.as_ref() else {
            return Err(ModeError::NotDrawing(self.mode));
        };
        if session.points.is_empty() {
            self.cancel();
            return Ok(None);
        }
        let required = session.kind.min_points();
        if session.points.len() < required {
            return Err(ModeError::InsufficientPoints {
                kind: session.kind,
                required,
                actual: session.points.len(),
            });
        }
        self.mode = DrawingMode::Idle;
        let session = self.session.take();
        Ok(session.map(|s| Drawing::new(s.kind, s.points)))
    }
}
