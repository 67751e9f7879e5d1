use std::time::Instant;

use tracing::{debug, trace};

use super::format::format_distance;
use crate::config::EditorConfig;
use crate::geometry::Position;
use crate::math::{distance, ScreenPoint};
use crate::overlay::{OverlayEntity, OverlayId};
use crate::render::{Geometry, Projection, Role, Style};

/// What a hold-measurement input did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldEvent {
    /// Nothing visible changed.
    Unchanged,
    /// Two fingers landed; the hold timer is running.
    Armed,
    /// A finger moved before the timer fired; the timer was cancelled.
    Disarmed,
    /// The timer fired and measuring began.
    Activated,
    /// The live measurement moved.
    Updated,
    /// Finger separation changed like a pinch; measuring stopped.
    Pinched,
    /// Fingers lifted; the last distance stays on screen for a while.
    Frozen,
    /// The frozen measurement expired.
    Cleared,
}

#[derive(Debug, Clone, PartialEq)]
enum HoldState {
    Idle,
    Pending {
        start: [ScreenPoint; 2],
        separation: f64,
        deadline: Instant,
    },
    Active {
        fingers: [ScreenPoint; 2],
        separation: f64,
        points: [Position; 2],
    },
    Frozen {
        points: [Position; 2],
        until: Instant,
    },
}

/// Two-finger stationary-hold measurement.
///
/// Timers are plain deadlines owned by this value: the hold deadline while
/// pending and the expiry while frozen. [`HoldMeasurement::tick`] fires
/// them; [`HoldMeasurement::reset`] drops them.
#[derive(Debug, Clone)]
pub struct HoldMeasurement {
    config: EditorConfig,
    state: HoldState,
}

fn separation(fingers: &[ScreenPoint; 2]) -> f64 {
    (fingers[1] - fingers[0]).norm()
}

fn two(touches: &[ScreenPoint]) -> Option<[ScreenPoint; 2]> {
    match touches {
        [a, b] => Some([*a, *b]),
        _ => None,
    }
}

impl HoldMeasurement {
    /// Creates an idle hold measurement.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            state: HoldState::Idle,
        }
    }

    /// Touches went down. Only exactly two fingers arm the timer.
    pub fn touch_start(&mut self, touches: &[ScreenPoint], now: Instant) -> HoldEvent {
        let Some(start) = two(touches) else {
            return self.abandon_gesture();
        };
        self.state = HoldState::Pending {
            start,
            separation: separation(&start),
            deadline: now + self.config.hold_duration(),
        };
        trace!("hold armed");
        HoldEvent::Armed
    }

    /// Touches moved.
    pub fn touch_move<P: Projection + ?Sized>(
        &mut self,
        touches: &[ScreenPoint],
        projection: Option<&P>,
    ) -> HoldEvent {
        let Some(current) = two(touches) else {
            return self.abandon_gesture();
        };
        let pinch = self.config.pinch_threshold_px;
        match &mut self.state {
            HoldState::Pending {
                start, separation: sep0, ..
            } => {
                if (separation(&current) - *sep0).abs() > pinch {
                    debug!("pinch before hold fired");
                    self.state = HoldState::Idle;
                    return HoldEvent::Pinched;
                }
                let stationary = self.config.stationary_threshold_px;
                let moved = start
                    .iter()
                    .zip(&current)
                    .any(|(a, b)| (*b - *a).norm() > stationary);
                if moved {
                    trace!("hold disarmed by movement");
                    self.state = HoldState::Idle;
                    return HoldEvent::Disarmed;
                }
                HoldEvent::Unchanged
            }
            HoldState::Active {
                fingers,
                separation: sep0,
                points,
            } => {
                if (separation(&current) - *sep0).abs() > pinch {
                    debug!("pinch during hold measurement");
                    self.state = HoldState::Idle;
                    return HoldEvent::Pinched;
                }
                *fingers = current;
                match projection.and_then(|p| unproject_both(p, &current)) {
                    Some(world) => {
                        *points = world;
                        HoldEvent::Updated
                    }
                    None => HoldEvent::Unchanged,
                }
            }
            HoldState::Idle | HoldState::Frozen { .. } => HoldEvent::Unchanged,
        }
    }

    /// All fingers lifted.
    pub fn touch_end(&mut self, now: Instant) -> HoldEvent {
        match self.state {
            HoldState::Pending { .. } => {
                self.state = HoldState::Idle;
                HoldEvent::Disarmed
            }
            HoldState::Active { points, .. } => {
                self.state = HoldState::Frozen {
                    points,
                    until: now + self.config.freeze_duration(),
                };
                debug!(meters = distance(&points[0], &points[1]), "hold measurement frozen");
                HoldEvent::Frozen
            }
            HoldState::Idle | HoldState::Frozen { .. } => HoldEvent::Unchanged,
        }
    }

    /// Fires any deadline that has passed.
    ///
    /// Activation needs both fingers to unproject; if either cannot, the
    /// hold is dropped without measuring.
    pub fn tick<P: Projection + ?Sized>(&mut self, now: Instant, projection: Option<&P>) -> HoldEvent {
        match &self.state {
            HoldState::Pending {
                start,
                separation,
                deadline,
            } if now >= *deadline => {
                let fingers = *start;
                let separation = *separation;
                match projection.and_then(|p| unproject_both(p, &fingers)) {
                    Some(points) => {
                        self.state = HoldState::Active {
                            fingers,
                            separation,
                            points,
                        };
                        debug!("hold measurement activated");
                        HoldEvent::Activated
                    }
                    None => {
                        self.state = HoldState::Idle;
                        HoldEvent::Disarmed
                    }
                }
            }
            HoldState::Frozen { until, .. } if now >= *until => {
                self.state = HoldState::Idle;
                HoldEvent::Cleared
            }
            _ => HoldEvent::Unchanged,
        }
    }

    /// Cancels every timer and forgets any measurement.
    pub fn reset(&mut self) {
        self.state = HoldState::Idle;
    }

    /// The next instant at which [`HoldMeasurement::tick`] has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            HoldState::Pending { deadline, .. } => Some(deadline),
            HoldState::Frozen { until, .. } => Some(until),
            HoldState::Idle | HoldState::Active { .. } => None,
        }
    }

    /// Whether the fingers are currently measuring.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, HoldState::Active { .. })
    }

    /// The measured endpoints, live or frozen.
    #[must_use]
    pub fn points(&self) -> Option<[Position; 2]> {
        match self.state {
            HoldState::Active { points, .. } | HoldState::Frozen { points, .. } => Some(points),
            HoldState::Idle | HoldState::Pending { .. } => None,
        }
    }

    /// Distance between the endpoints, in meters.
    #[must_use]
    pub fn meters(&self) -> Option<f64> {
        self.points().map(|[a, b]| distance(&a, &b))
    }

    /// Formatted distance text.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.meters().map(format_distance)
    }

    /// The measurement line, if there is one to show.
    #[must_use]
    pub fn entities(&self) -> Vec<OverlayEntity> {
        self.points()
            .map(|[a, b]| {
                OverlayEntity::new(
                    OverlayId::HoldLine,
                    Geometry::Line(vec![a, b]),
                    Style::new(Role::MeasurementLine),
                )
            })
            .into_iter()
            .collect()
    }

    /// A finger was added or removed mid-gesture.
    fn abandon_gesture(&mut self) -> HoldEvent {
        match self.state {
            HoldState::Pending { .. } => {
                self.state = HoldState::Idle;
                HoldEvent::Disarmed
            }
            HoldState::Active { .. } => {
                self.state = HoldState::Idle;
                HoldEvent::Pinched
            }
            HoldState::Idle | HoldState::Frozen { .. } => HoldEvent::Unchanged,
        }
    }
}

fn unproject_both<P: Projection + ?Sized>(
    projection: &P,
    fingers: &[ScreenPoint; 2],
) -> Option<[Position; 2]> {
    Some([
        projection.unproject(fingers[0])?,
        projection.unproject(fingers[1])?,
    ])
}
