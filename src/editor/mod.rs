mod elevation;
mod input;
mod route;
mod selection;

pub use elevation::{ElevationRequest, ElevationRequestId};

use slotmap::SlotMap;
use tracing::{debug, warn};

use self::elevation::{ElevationQueue, ElevationTarget};
use crate::config::EditorConfig;
use crate::error::{ModeError, PersistenceError, Result};
use crate::geometry::{Drawing, DrawingKey, DrawingKind, Position};
use crate::measurement::{Measurements, PathLabels};
use crate::mode::{preview_entities, DrawingMode, DrawingSession, ModeMachine, Transition};
use crate::offline::OfflineSelector;
use crate::overlay::{Layer, OverlayEntity, OverlayId, OverlayManager};
use crate::persistence::{DrawingRecord, DrawingStore};
use crate::render::{Geometry, Renderer, Role, Style};
use crate::route::{DragState, LineEditSession, RouteDisplay};

/// Interactive drawing, measuring and route editing over one map.
pub struct MapEditor<R: Renderer, S: DrawingStore> {
    config: EditorConfig,
    overlay: OverlayManager<R>,
    store: S,
    modes: ModeMachine,
    drawings: SlotMap<DrawingKey, Drawing>,
    selected: Option<DrawingKey>,
    measurements: Measurements,
    route: Option<RouteDisplay>,
    line_edit: Option<LineEditSession>,
    drag: DragState,
    offline: OfflineSelector,
    elevation: ElevationQueue,
    /// The click synthesized after a drag that moved is swallowed.
    suppress_click: bool,
    persistence_error: Option<PersistenceError>,
}

impl<R: Renderer, S: DrawingStore> MapEditor<R, S> {
    /// Creates an editor drawing into `renderer` and saving to `store`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError`] if `config` does not validate.
    pub fn new(renderer: R, store: S, config: EditorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            overlay: OverlayManager::new(renderer),
            store,
            modes: ModeMachine::new(),
            drawings: SlotMap::with_key(),
            selected: None,
            measurements: Measurements::new(config),
            route: None,
            line_edit: None,
            drag: DragState::new(),
            offline: OfflineSelector::new(config.offline_min_span_deg),
            elevation: ElevationQueue::default(),
            suppress_click: false,
            persistence_error: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The renderer, unless it has been disposed.
    #[must_use]
    pub fn renderer(&self) -> Option<&R> {
        self.overlay.renderer()
    }

    pub fn renderer_mut(&mut self) -> Option<&mut R> {
        self.overlay.renderer_mut()
    }

    #[must_use]
    pub fn overlay(&self) -> &OverlayManager<R> {
        &self.overlay
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The active mode.
    #[must_use]
    pub fn mode(&self) -> DrawingMode {
        self.modes.mode()
    }

    /// The drawing being built, if any.
    #[must_use]
    pub fn current_drawing(&self) -> Option<&DrawingSession> {
        self.modes.session()
    }

    /// Starts a drawing mode, or switches it off if it is already active.
    ///
    /// [`DrawingMode::Idle`] cancels whatever is active and
    /// [`DrawingMode::OfflineSelect`] behaves like
    /// [`MapEditor::start_offline_selection`]. Starting a mode turns any
    /// measurement flow off.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::InvalidTransition`] while another mode is
    /// active, and [`ModeError::NotDrawing`] for [`DrawingMode::RouteEdit`],
    /// which needs a path and is entered through
    /// [`MapEditor::enable_draw_route_mode`].
    pub fn start_drawing_mode(&mut self, mode: DrawingMode) -> Result<Transition> {
        match mode {
            DrawingMode::Idle => return Ok(Transition::ToggledOff(self.cancel_drawing_mode())),
            DrawingMode::RouteEdit => return Err(ModeError::NotDrawing(mode).into()),
            DrawingMode::OfflineSelect => return self.start_offline_selection(),
            _ if mode == self.modes.mode() => {
                return Ok(Transition::ToggledOff(self.cancel_drawing_mode()));
            }
            _ => {}
        }
        let transition = self.modes.start(mode)?;
        self.disable_measurement();
        self.suppress_click = false;
        self.refresh_preview();
        Ok(transition)
    }

    /// Returns to idle from any mode, discarding all in-progress state.
    /// Returns the mode that was active.
    pub fn cancel_drawing_mode(&mut self) -> DrawingMode {
        match self.modes.mode() {
            DrawingMode::RouteEdit => {
                self.disable_draw_route_mode();
                DrawingMode::RouteEdit
            }
            DrawingMode::OfflineSelect => {
                self.cancel_offline_selection();
                DrawingMode::OfflineSelect
            }
            _ => {
                let previous = self.modes.cancel();
                self.elevation.drop_session_points();
                self.overlay.remove_layer(Layer::Preview);
                previous
            }
        }
    }

    /// Drops the most recent point of the drawing in progress.
    pub fn undo_last_point(&mut self) -> Option<Position> {
        let removed = self.modes.undo_last_point()?;
        let remaining = self.modes.session().map_or(0, |s| s.points.len());
        self.elevation.retarget(|t| match t {
            ElevationTarget::SessionPoint(i) if i >= remaining => None,
            other => Some(other),
        });
        self.refresh_preview();
        Some(removed)
    }

    /// Finishes the drawing in progress.
    ///
    /// A drawing with no points is cancelled and yields `Ok(None)`. A
    /// finished drawing stays on the map even if saving fails; it then has
    /// no id and the failure is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`ModeError`] if nothing finishable is in progress and a
    /// [`PersistenceError`] if the store rejects the drawing.
    pub fn finish_drawing(&mut self) -> Result<Option<Drawing>> {
        let Some(drawing) = self.modes.finish()? else {
            self.elevation.drop_session_points();
            self.overlay.remove_layer(Layer::Preview);
            return Ok(None);
        };
        self.overlay.remove_layer(Layer::Preview);
        let key = self.drawings.insert(drawing);
        self.elevation.retarget(|t| match t {
            ElevationTarget::SessionPoint(index) => Some(ElevationTarget::Drawing { key, index }),
            other => Some(other),
        });
        self.refresh_drawings();
        self.persist(key)?;
        Ok(self.drawings.get(key).cloned())
    }

    /// All finished drawings.
    pub fn drawings(&self) -> impl Iterator<Item = (DrawingKey, &Drawing)> {
        self.drawings.iter()
    }

    #[must_use]
    pub fn drawing(&self, key: DrawingKey) -> Option<&Drawing> {
        self.drawings.get(key)
    }

    /// Shows a drawing loaded from the store.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] if the record does not decode.
    pub fn load_drawing(&mut self, record: &DrawingRecord) -> Result<DrawingKey> {
        let drawing = record.to_drawing()?;
        let key = self.drawings.insert(drawing);
        self.refresh_drawings();
        Ok(key)
    }

    /// Deletes a drawing from the store and the map.
    ///
    /// Drawings never saved are removed locally. If the store fails the
    /// drawing stays.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::UnknownDrawing`] for an unknown key and
    /// the store's error if it fails.
    pub fn delete_drawing(&mut self, key: DrawingKey) -> Result<bool> {
        let drawing = self.drawings.get(key).ok_or(PersistenceError::UnknownDrawing)?;
        let known = match &drawing.id {
            Some(id) => self.store.delete_drawing(id).inspect_err(|e| {
                warn!(%id, error = %e, "drawing delete failed");
            })?,
            None => true,
        };
        self.drawings.remove(key);
        if self.selected == Some(key) {
            self.selected = None;
        }
        self.elevation.retarget(|t| match t {
            ElevationTarget::Drawing { key: k, .. } if k == key => None,
            other => Some(other),
        });
        self.refresh_drawings();
        debug!(?key, known, "drawing deleted");
        Ok(known)
    }

    /// Highlights one drawing, or none.
    pub fn select_drawing(&mut self, key: Option<DrawingKey>) {
        self.selected = key.filter(|k| self.drawings.contains_key(*k));
        self.refresh_drawings();
    }

    #[must_use]
    pub fn selected_drawing(&self) -> Option<DrawingKey> {
        self.selected
    }

    /// Takes the save failure of a drawing finished by a click, if any.
    pub fn take_persistence_error(&mut self) -> Option<PersistenceError> {
        self.persistence_error.take()
    }
}

impl<R: Renderer, S: DrawingStore> MapEditor<R, S> {
    /// Turns on two-finger hold measurement, leaving any drawing mode.
    pub fn enable_hold_measurement(&mut self) {
        self.cancel_drawing_mode();
        self.measurements.set_hold_enabled(true);
    }

    /// Turns on click-path measurement, leaving any drawing mode.
    pub fn enable_path_measurement(&mut self) {
        self.cancel_drawing_mode();
        self.measurements.set_path_enabled(true);
    }

    /// Turns both measurement flows off, cancelling their timers.
    pub fn disable_measurement(&mut self) {
        if self.measurements.any_enabled() {
            debug!("measurement disabled");
        }
        self.measurements.disable_all();
        self.overlay.remove_layer(Layer::Measurement);
    }

    #[must_use]
    pub fn hold_measurement_enabled(&self) -> bool {
        self.measurements.hold_enabled()
    }

    #[must_use]
    pub fn path_measurement_enabled(&self) -> bool {
        self.measurements.path_enabled()
    }

    /// Clears the measured path, keeping path measurement enabled.
    pub fn clear_path_measurement(&mut self) {
        self.measurements.path.clear();
        self.refresh_measurement();
    }

    /// Drops the last measured point.
    pub fn undo_measurement_point(&mut self) -> Option<Position> {
        let removed = self.measurements.path.undo()?;
        self.refresh_measurement();
        Some(removed)
    }

    /// Current distance text: the hold reading if one shows, otherwise the
    /// path total.
    #[must_use]
    pub fn measurement_label(&self) -> Option<String> {
        self.measurements.label_text()
    }

    /// Per-segment labels of the measured path.
    #[must_use]
    pub fn path_labels(&self) -> PathLabels {
        self.measurements.path.labels()
    }
}

impl<R: Renderer, S: DrawingStore> MapEditor<R, S> {
    /// Hands out queued elevation lookups.
    pub fn take_elevation_requests(&mut self) -> Vec<ElevationRequest> {
        self.elevation.drain()
    }

    /// Lookups handed out or queued and not yet answered.
    #[must_use]
    pub fn pending_elevation_requests(&self) -> usize {
        self.elevation.pending()
    }

    /// Answers an elevation lookup. Returns `false` if the point has since
    /// been removed or moved.
    pub fn apply_elevation(&mut self, id: ElevationRequestId, elevation: f64) -> bool {
        let Some((target, at)) = self.elevation.resolve(id) else {
            return false;
        };
        let applied = match target {
            ElevationTarget::SessionPoint(index) => self.modes.set_point_elevation(index, &at, elevation),
            ElevationTarget::Drawing { key, index } => {
                match self.drawings.get_mut(key).and_then(|d| d.points.get_mut(index)) {
                    Some(p) if p.same_location(&at) => {
                        p.elevation = Some(elevation);
                        true
                    }
                    _ => false,
                }
            }
            ElevationTarget::RouteWaypoint(waypoint) => self
                .route
                .as_mut()
                .is_some_and(|r| r.route_mut().set_waypoint_elevation(waypoint, &at, elevation)),
        };
        if !applied {
            debug!(?target, "stale elevation dropped");
        }
        applied
    }
}

impl<R: Renderer, S: DrawingStore> MapEditor<R, S> {
    /// Releases everything the editor holds on the map: timers, drag
    /// capture, line-edit session and primitives. The camera is always
    /// re-enabled. Safe to call more than once.
    pub fn teardown(&mut self) {
        self.measurements.disable_all();
        self.drag.end();
        if let Some(session) = self.line_edit.take() {
            session.finish();
        }
        self.modes.cancel();
        self.offline = OfflineSelector::new(self.config.offline_min_span_deg);
        self.elevation.clear();
        self.suppress_click = false;
        self.overlay.remove_all();
        self.set_camera_enabled(true);
        debug!("editor torn down");
    }
}

impl<R: Renderer, S: DrawingStore> MapEditor<R, S> {
    fn set_camera_enabled(&mut self, enabled: bool) {
        if let Some(renderer) = self.overlay.renderer_mut() {
            renderer.set_camera_interaction_enabled(enabled);
        }
    }

    fn persist(&mut self, key: DrawingKey) -> Result<()> {
        let Some(drawing) = self.drawings.get(key) else {
            return Err(PersistenceError::UnknownDrawing.into());
        };
        let saved = DrawingRecord::from_drawing(drawing).and_then(|r| self.store.save_drawing(&r));
        match saved {
            Ok(id) => {
                debug!(%id, kind = ?drawing.kind, "drawing saved");
                if let Some(d) = self.drawings.get_mut(key) {
                    d.id = Some(id);
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "drawing save failed, kept unsaved");
                Err(e.into())
            }
        }
    }

    fn refresh_preview(&mut self) {
        let entities = self.modes.session().map(preview_entities).unwrap_or_default();
        self.overlay.rebuild(Layer::Preview, entities, None);
    }

    fn refresh_drawings(&mut self) {
        let entities: Vec<OverlayEntity> = self
            .drawings
            .iter()
            .filter_map(|(key, d)| drawing_entity(key, d))
            .collect();
        let selected = self.selected.map(OverlayId::Drawing);
        self.overlay.rebuild(Layer::Drawings, entities, selected);
    }

    fn refresh_measurement(&mut self) {
        self.overlay.rebuild(Layer::Measurement, self.measurements.entities(), None);
    }
}

impl<R: Renderer, S: DrawingStore> Drop for MapEditor<R, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<R: Renderer, S: DrawingStore> std::fmt::Debug for MapEditor<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapEditor")
            .field("mode", &self.modes.mode())
            .field("drawings", &self.drawings.len())
            .field("overlays", &self.overlay.len())
            .field("dragging", &self.drag.is_active())
            .finish_non_exhaustive()
    }
}

/// How a finished drawing is drawn.
fn drawing_entity(key: DrawingKey, drawing: &Drawing) -> Option<OverlayEntity> {
    let geometry = match drawing.kind {
        DrawingKind::Waypoint => Geometry::Point(*drawing.points.first()?),
        DrawingKind::Line | DrawingKind::Measurement => Geometry::Line(drawing.points.clone()),
        DrawingKind::Polygon => Geometry::Polygon(drawing.points.clone()),
    };
    Some(OverlayEntity::new(
        OverlayId::Drawing(key),
        geometry,
        Style::new(Role::Drawing(drawing.kind)),
    ))
}
