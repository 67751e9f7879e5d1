use std::collections::HashMap;

use crate::geometry::{DrawingKey, Position};
use crate::route::WaypointId;

/// Identifies one elevation lookup handed to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElevationRequestId(pub u64);

/// A position whose elevation the caller should look up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationRequest {
    pub id: ElevationRequestId,
    pub position: Position,
}

/// Where an answered elevation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElevationTarget {
    /// Point `index` of the drawing in progress.
    SessionPoint(usize),
    /// Point `index` of a finished drawing.
    Drawing { key: DrawingKey, index: usize },
    RouteWaypoint(WaypointId),
}

/// Outstanding lookups: queued until drained, then in flight until
/// answered or dropped.
#[derive(Debug, Default)]
pub(crate) struct ElevationQueue {
    next_id: u64,
    queued: Vec<ElevationRequest>,
    targets: HashMap<ElevationRequestId, (ElevationTarget, Position)>,
}

impl ElevationQueue {
    pub(crate) fn request(&mut self, target: ElevationTarget, position: Position) -> ElevationRequestId {
        let id = ElevationRequestId(self.next_id);
        self.next_id += 1;
        self.queued.push(ElevationRequest { id, position });
        self.targets.insert(id, (target, position));
        id
    }

    pub(crate) fn drain(&mut self) -> Vec<ElevationRequest> {
        std::mem::take(&mut self.queued)
    }

    /// Removes and returns the target of `id`, if it is still wanted.
    pub(crate) fn resolve(&mut self, id: ElevationRequestId) -> Option<(ElevationTarget, Position)> {
        self.targets.remove(&id)
    }

    /// Rewrites or forgets targets. `f` returning `None` drops the request.
    pub(crate) fn retarget(&mut self, mut f: impl FnMut(ElevationTarget) -> Option<ElevationTarget>) {
        self.targets.retain(|_, (target, _)| match f(*target) {
            Some(t) => {
                *target = t;
                true
            }
            None => false,
        });
        let targets = &self.targets;
        self.queued.retain(|r| targets.contains_key(&r.id));
    }

    /// Forgets lookups for the drawing in progress.
    pub(crate) fn drop_session_points(&mut self) {
        self.retarget(|t| match t {
            ElevationTarget::SessionPoint(_) => None,
            other => Some(other),
        });
    }

    pub(crate) fn clear(&mut self) {
        self.queued.clear();
        self.targets.clear();
    }

    pub(crate) fn pending(&self) -> usize {
        self.targets.len()
    }
}
