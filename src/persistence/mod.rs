mod drawing;
mod route;

pub use drawing::DrawingRecord;
pub use route::{RouteRecord, WaypointEntry};

use std::collections::BTreeMap;

use crate::error::PersistenceError;
use crate::geometry::DrawingId;

/// A backend that accepts finished drawings and routes.
///
/// Calls are made once per finish, drag-end or delete; the editor never
/// retries.
pub trait DrawingStore {
    /// Saves a drawing and returns the identifier the store assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the drawing.
    fn save_drawing(&mut self, record: &DrawingRecord) -> Result<DrawingId, PersistenceError>;

    /// Deletes a drawing. Returns whether the store knew it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not be reached.
    fn delete_drawing(&mut self, id: &DrawingId) -> Result<bool, PersistenceError>;

    /// Saves a route and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the route.
    fn save_route(&mut self, record: &RouteRecord) -> Result<String, PersistenceError>;
}

/// An in-process store, for headless use and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    drawings: BTreeMap<String, DrawingRecord>,
    routes: BTreeMap<String, RouteRecord>,
    next_id: u64,
    reject_reason: Option<String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail with `reason`, or succeed again
    /// with `None`.
    pub fn set_rejecting(&mut self, reason: Option<&str>) {
        self.reject_reason = reason.map(str::to_owned);
    }

    #[must_use]
    pub fn drawing(&self, id: &DrawingId) -> Option<&DrawingRecord> {
        self.drawings.get(&id.0)
    }

    #[must_use]
    pub fn drawing_count(&self) -> usize {
        self.drawings.len()
    }

    #[must_use]
    pub fn route(&self, id: &str) -> Option<&RouteRecord> {
        self.routes.get(id)
    }

    fn check(&self) -> Result<(), PersistenceError> {
        match &self.reject_reason {
            Some(reason) => Err(PersistenceError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }

    fn allocate(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

impl DrawingStore for MemoryStore {
    fn save_drawing(&mut self, record: &DrawingRecord) -> Result<DrawingId, PersistenceError> {
        self.check()?;
        let id = match &record.id {
            Some(id) => id.clone(),
            None => DrawingId(self.allocate("drawing")),
        };
        let mut stored = record.clone();
        stored.id = Some(id.clone());
        self.drawings.insert(id.0.clone(), stored);
        Ok(id)
    }

    fn delete_drawing(&mut self, id: &DrawingId) -> Result<bool, PersistenceError> {
        self.check()?;
        Ok(self.drawings.remove(&id.0).is_some())
    }

    fn save_route(&mut self, record: &RouteRecord) -> Result<String, PersistenceError> {
        self.check()?;
        let id = match &record.id {
            Some(id) => id.clone(),
            None => self.allocate("route"),
        };
        let mut stored = record.clone();
        stored.id = Some(id.clone());
        self.routes.insert(id.clone(), stored);
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Drawing, DrawingKind, Position};

    #[test]
    fn assigns_ids_and_deletes() {
        let mut store = MemoryStore::new();
        let d = Drawing::new(DrawingKind::Waypoint, vec![Position::new(1.0, 2.0)]);
        let id = store.save_drawing(&DrawingRecord::from_drawing(&d).unwrap()).unwrap();
        assert_eq!(id, DrawingId("drawing-1".into()));
        assert_eq!(store.drawing(&id).unwrap().id.as_ref(), Some(&id));
        assert!(store.delete_drawing(&id).unwrap());
        assert!(!store.delete_drawing(&id).unwrap());
    }

    #[test]
    fn rejecting_store_fails() {
        let mut store = MemoryStore::new();
        store.set_rejecting(Some("offline"));
        let d = Drawing::new(DrawingKind::Waypoint, vec![Position::new(1.0, 2.0)]);
        let err = store.save_drawing(&DrawingRecord::from_drawing(&d).unwrap()).unwrap_err();
        assert!(matches!(err, PersistenceError::Rejected(ref r) if r == "offline"));
        assert_eq!(store.drawing_count(), 0);
    }
}
