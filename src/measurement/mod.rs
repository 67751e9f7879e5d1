mod format;
mod hold;
mod path;

pub use format::{format_distance, FEET_PER_METER, METERS_PER_MILE};
pub use hold::{HoldEvent, HoldMeasurement};
pub use path::{PathLabels, PathMeasurement, SegmentLabel};

use crate::config::EditorConfig;
use crate::overlay::OverlayEntity;

/// Both measurement flows and their enable flags.
#[derive(Debug, Clone)]
pub struct Measurements {
    pub hold: HoldMeasurement,
    pub path: PathMeasurement,
    hold_enabled: bool,
    path_enabled: bool,
}

impl Measurements {
    /// Creates both flows, disabled.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            hold: HoldMeasurement::new(config),
            path: PathMeasurement::new(),
            hold_enabled: false,
            path_enabled: false,
        }
    }

    #[must_use]
    pub fn hold_enabled(&self) -> bool {
        self.hold_enabled
    }

    #[must_use]
    pub fn path_enabled(&self) -> bool {
        self.path_enabled
    }

    /// Whether either flow is accepting gestures.
    #[must_use]
    pub fn any_enabled(&self) -> bool {
        self.hold_enabled || self.path_enabled
    }

    /// Turns the hold flow on or off. Turning it off drops its timers.
    pub fn set_hold_enabled(&mut self, enabled: bool) {
        self.hold_enabled = enabled;
        if !enabled {
            self.hold.reset();
        }
    }

    /// Turns the path flow on or off. Turning it off clears its points.
    pub fn set_path_enabled(&mut self, enabled: bool) {
        self.path_enabled = enabled;
        if !enabled {
            self.path.clear();
        }
    }

    /// Disables both flows and forgets all state.
    pub fn disable_all(&mut self) {
        self.set_hold_enabled(false);
        self.set_path_enabled(false);
    }

    /// Label text of the hold measurement if one is showing, otherwise the
    /// running total of the path.
    #[must_use]
    pub fn label_text(&self) -> Option<String> {
        self.hold.label().or_else(|| {
            self.path
                .is_active()
                .then(|| self.path.labels().total_text)
        })
    }

    /// Entities for the measurement layer.
    #[must_use]
    pub fn entities(&self) -> Vec<OverlayEntity> {
        let mut entities = self.path.entities();
        entities.extend(self.hold.entities());
        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;

    #[test]
    fn disabling_clears_state() {
        let mut m = Measurements::new(EditorConfig::default());
        m.set_path_enabled(true);
        m.path.push(Position::new(0.0, 0.0));
        m.path.push(Position::new(0.0, 0.001));
        assert!(m.any_enabled());
        assert_eq!(m.label_text().as_deref(), Some("111 m (365 ft)"));
        assert_eq!(m.entities().len(), 3);

        m.disable_all();
        assert!(!m.any_enabled());
        assert!(m.label_text().is_none());
        assert!(m.entities().is_empty());
    }
}
