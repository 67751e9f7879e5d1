use tracing::debug;

use super::MapEditor;
use crate::error::Result;
use crate::mode::{DrawingMode, Transition};
use crate::offline::{OfflineSelectionBounds, OfflineSelector};
use crate::overlay::Layer;
use crate::persistence::DrawingStore;
use crate::render::Renderer;

impl<R: Renderer, S: DrawingStore> MapEditor<R, S> {
    /// Enters offline-region selection, or leaves it if already active.
    /// The camera stays still while selecting so drags draw the box.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ModeError::InvalidTransition`] while another
    /// mode is active.
    pub fn start_offline_selection(&mut self) -> Result<Transition> {
        if self.modes.mode() == DrawingMode::OfflineSelect {
            self.cancel_offline_selection();
            return Ok(Transition::ToggledOff(DrawingMode::OfflineSelect));
        }
        let transition = self.modes.start(DrawingMode::OfflineSelect)?;
        self.disable_measurement();
        self.suppress_click = false;
        self.offline = OfflineSelector::new(self.config.offline_min_span_deg);
        self.set_camera_enabled(false);
        Ok(transition)
    }

    /// Leaves offline selection, discarding any box.
    pub fn cancel_offline_selection(&mut self) {
        if self.modes.mode() != DrawingMode::OfflineSelect {
            return;
        }
        self.leave_offline_selection();
        debug!("offline selection cancelled");
    }

    /// Freezes the committed box, keeping it drawn and the mode active.
    /// Returns the box, if one was committed.
    pub fn finish_offline_selection(&mut self) -> Option<OfflineSelectionBounds> {
        if self.modes.mode() != DrawingMode::OfflineSelect {
            return None;
        }
        self.offline.finish()
    }

    /// Leaves offline selection and returns the committed box, if any.
    pub fn complete_offline_selection(&mut self) -> Option<OfflineSelectionBounds> {
        if self.modes.mode() != DrawingMode::OfflineSelect {
            return None;
        }
        let bounds = self.offline.bounds();
        self.leave_offline_selection();
        debug!(?bounds, "offline selection completed");
        bounds
    }

    /// The committed box, if any.
    #[must_use]
    pub fn offline_bounds(&self) -> Option<OfflineSelectionBounds> {
        self.offline.bounds()
    }

    /// Whether the last selection drag was too small and discarded.
    #[must_use]
    pub fn offline_invalid_drag(&self) -> bool {
        self.offline.invalid_drag()
    }

    fn leave_offline_selection(&mut self) {
        self.modes.cancel();
        self.offline = OfflineSelector::new(self.config.offline_min_span_deg);
        self.overlay.remove_layer(Layer::OfflineRegion);
        self.set_camera_enabled(true);
    }
}
