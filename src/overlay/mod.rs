mod entity;

pub use entity::{Layer, OverlayEntity, OverlayId};

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::geometry::Position;
use crate::render::{Geometry, PrimitiveHandle, Renderer, Style};

#[derive(Debug, Clone)]
struct Entry {
    handle: PrimitiveHandle,
    geometry: Geometry,
    style: Style,
}

/// Owns the mapping from [`OverlayId`] to rendered primitive.
///
/// Every operation is a no-op while the renderer is missing or disposed.
/// Entries whose primitive could not be created are never recorded, so the
/// set of tracked ids always equals the set of live primitives.
#[derive(Debug)]
pub struct OverlayManager<R> {
    renderer: Option<R>,
    entries: HashMap<OverlayId, Entry>,
}

impl<R: Renderer> OverlayManager<R> {
    /// Creates a manager drawing into `renderer`.
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self {
            renderer: Some(renderer),
            entries: HashMap::new(),
        }
    }

    /// Creates a manager with no renderer attached.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            renderer: None,
            entries: HashMap::new(),
        }
    }

    /// The renderer, if attached and not disposed.
    #[must_use]
    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref().filter(|r| !r.is_disposed())
    }

    /// Mutable access to the renderer, if attached and not disposed.
    pub fn renderer_mut(&mut self) -> Option<&mut R> {
        self.renderer.as_mut().filter(|r| !r.is_disposed())
    }

    /// Adds an entity, replacing any entity already tracked under its id.
    pub fn add(&mut self, entity: OverlayEntity) {
        self.remove(&entity.id);
        let Some(renderer) = self.renderer_mut() else {
            return;
        };
        if let Some(handle) = renderer.add_primitive(&entity.geometry, &entity.style) {
            trace!(id = ?entity.id, "overlay added");
            self.entries.insert(
                entity.id,
                Entry {
                    handle,
                    geometry: entity.geometry,
                    style: entity.style,
                },
            );
        }
    }

    /// Moves a point entity. Other entity kinds are left untouched.
    pub fn update_position(&mut self, id: &OverlayId, position: Position) {
        if let Some(Geometry::Point(_)) = self.entries.get(id).map(|e| &e.geometry) {
            self.update_geometry(id, Geometry::Point(position));
        }
    }

    /// Replaces the geometry of a tracked entity.
    pub fn update_geometry(&mut self, id: &OverlayId, geometry: Geometry) {
        let Some(renderer) = self.renderer.as_mut().filter(|r| !r.is_disposed()) else {
            return;
        };
        if let Some(entry) = self.entries.get_mut(id) {
            renderer.update_primitive(entry.handle, &geometry);
            entry.geometry = geometry;
        }
    }

    /// Adds the entity if untracked, otherwise updates its geometry.
    pub fn upsert(&mut self, entity: OverlayEntity) {
        match self.entries.get(&entity.id) {
            Some(entry) if entry.style == entity.style => {
                self.update_geometry(&entity.id, entity.geometry);
            }
            _ => self.add(entity),
        }
    }

    /// Removes one entity.
    pub fn remove(&mut self, id: &OverlayId) {
        if let Some(entry) = self.entries.remove(id) {
            if let Some(renderer) = self.renderer_mut() {
                renderer.remove_primitive(entry.handle);
            }
        }
    }

    /// Removes every entity on `layer`.
    pub fn remove_layer(&mut self, layer: Layer) {
        let ids: Vec<OverlayId> = self.ids_in(layer).collect();
        for id in &ids {
            self.remove(id);
        }
    }

    /// Removes every entity on every layer.
    pub fn remove_all(&mut self) {
        let ids: Vec<OverlayId> = self.entries.keys().copied().collect();
        for id in &ids {
            self.remove(id);
        }
    }

    /// Clears `layer` and redraws it from `entities`; the entity whose id
    /// equals `selected` is drawn emphasized.
    pub fn rebuild(
        &mut self,
        layer: Layer,
        entities: impl IntoIterator<Item = OverlayEntity>,
        selected: Option<OverlayId>,
    ) {
        self.remove_layer(layer);
        let mut count = 0usize;
        for mut entity in entities {
            if Some(entity.id) == selected {
                entity.style = entity.style.emphasized();
            }
            self.add(entity);
            count += 1;
        }
        debug!(?layer, count, ?selected, "overlay layer rebuilt");
    }

    /// Whether `id` is currently rendered.
    #[must_use]
    pub fn contains(&self, id: &OverlayId) -> bool {
        self.entries.contains_key(id)
    }

    /// The primitive handle behind `id`.
    #[must_use]
    pub fn handle(&self, id: &OverlayId) -> Option<PrimitiveHandle> {
        self.entries.get(id).map(|e| e.handle)
    }

    /// The geometry last pushed for `id`.
    #[must_use]
    pub fn geometry(&self, id: &OverlayId) -> Option<&Geometry> {
        self.entries.get(id).map(|e| &e.geometry)
    }

    /// The style `id` was drawn with.
    #[must_use]
    pub fn style(&self, id: &OverlayId) -> Option<&Style> {
        self.entries.get(id).map(|e| &e.style)
    }

    /// All tracked ids on `layer`.
    pub fn ids_in(&self, layer: Layer) -> impl Iterator<Item = OverlayId> + '_ {
        self.entries.keys().copied().filter(move |id| id.layer() == layer)
    }

    /// Number of tracked entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::render::{HeadlessRenderer, Role, Viewport};
    use std::collections::HashSet;

    fn manager() -> OverlayManager<HeadlessRenderer> {
        OverlayManager::new(HeadlessRenderer::new(Viewport::new(
            Position::new(0.0, 0.0),
            10.0,
            800.0,
            600.0,
        )))
    }

    fn vertex(i: usize, lng: f64) -> OverlayEntity {
        OverlayEntity::new(
            OverlayId::PreviewVertex(i),
            Geometry::Point(Position::new(lng, 0.0)),
            Style::new(Role::Vertex { ordinal: i + 1 }),
        )
    }

    /// Tracked handles must match the renderer's live primitives exactly.
    fn assert_no_orphans(m: &OverlayManager<HeadlessRenderer>) {
        let tracked: HashSet<_> = m.entries.values().map(|e| e.handle).collect();
        let live: HashSet<_> = m.renderer().unwrap().primitives().map(|(h, _)| h).collect();
        assert_eq!(tracked, live);
    }

    #[test]
    fn add_replaces_same_id() {
        let mut m = manager();
        m.add(vertex(0, 0.0));
        m.add(vertex(0, 0.1));
        assert_eq!(m.len(), 1);
        assert_eq!(m.renderer().unwrap().primitive_count(), 1);
        assert_no_orphans(&m);
    }

    #[test]
    fn update_position_moves_points_only() {
        let mut m = manager();
        m.add(vertex(0, 0.0));
        m.add(OverlayEntity::new(
            OverlayId::PreviewShape,
            Geometry::Line(vec![Position::new(0.0, 0.0), Position::new(0.1, 0.0)]),
            Style::new(Role::Preview(crate::geometry::DrawingKind::Line)),
        ));

        m.update_position(&OverlayId::PreviewVertex(0), Position::new(0.2, 0.2));
        m.update_position(&OverlayId::PreviewShape, Position::new(0.2, 0.2));

        let h = m.handle(&OverlayId::PreviewVertex(0)).unwrap();
        let prim = m.renderer().unwrap().primitive(h).unwrap();
        assert_eq!(prim.geometry, Geometry::Point(Position::new(0.2, 0.2)));
        assert!(matches!(m.geometry(&OverlayId::PreviewShape), Some(Geometry::Line(_))));
    }

    #[test]
    fn rebuild_emphasizes_selected_and_leaves_other_layers() {
        let mut m = manager();
        m.add(OverlayEntity::new(
            OverlayId::OfflineRegion,
            Geometry::Polygon(vec![Position::new(0.0, 0.0)]),
            Style::new(Role::OfflineRegion),
        ));
        m.rebuild(Layer::Preview, (0..3).map(|i| vertex(i, 0.0)), None);
        m.rebuild(
            Layer::Preview,
            (0..2).map(|i| vertex(i, 0.0)),
            Some(OverlayId::PreviewVertex(1)),
        );

        assert_eq!(m.ids_in(Layer::Preview).count(), 2);
        assert!(m.contains(&OverlayId::OfflineRegion));
        assert!(m.style(&OverlayId::PreviewVertex(1)).unwrap().emphasized);
        assert!(!m.style(&OverlayId::PreviewVertex(0)).unwrap().emphasized);
        assert_no_orphans(&m);
    }

    #[test]
    fn remove_all_leaves_nothing() {
        let mut m = manager();
        for i in 0..5 {
            m.add(vertex(i, 0.0));
        }
        m.remove(&OverlayId::PreviewVertex(2));
        assert_eq!(m.len(), 4);
        m.remove_all();
        assert!(m.is_empty());
        assert_eq!(m.renderer().unwrap().primitive_count(), 0);
    }

    #[test]
    fn missing_renderer_is_a_no_op() {
        let mut m: OverlayManager<HeadlessRenderer> = OverlayManager::detached();
        m.add(vertex(0, 0.0));
        m.update_position(&OverlayId::PreviewVertex(0), Position::new(1.0, 1.0));
        m.rebuild(Layer::Preview, [vertex(1, 0.0)], None);
        m.remove_all();
        assert!(m.is_empty());
    }

    #[test]
    fn disposed_renderer_is_a_no_op() {
        let mut m = manager();
        m.add(vertex(0, 0.0));
        if let Some(r) = m.renderer.as_mut() {
            r.dispose();
        }
        assert!(m.renderer().is_none());
        m.add(vertex(1, 0.0));
        m.update_position(&OverlayId::PreviewVertex(0), Position::new(1.0, 1.0));
        m.remove_all();
        assert!(m.is_empty());
    }
}
