use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Walking pace used for route time estimates unless configured otherwise.
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 5.0;

/// Tunables for gesture recognition, hit testing and route statistics.
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Radius for picking waypoints and control points, in pixels.
    pub pick_radius_px: f64,
    /// Width of the invisible click band along an editable route line.
    pub corridor_width_px: f64,
    /// How long two fingers must rest before a hold measurement starts.
    pub hold_duration_ms: u64,
    /// Change in finger separation that counts as a pinch.
    pub pinch_threshold_px: f64,
    /// Finger travel that breaks a stationary hold.
    pub stationary_threshold_px: f64,
    /// How long a finished hold measurement stays on screen.
    pub freeze_duration_ms: u64,
    /// Smallest latitude or longitude span of a valid offline selection.
    pub offline_min_span_deg: f64,
    /// Speed used to estimate route duration.
    pub average_speed_kmh: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pick_radius_px: 20.0,
            corridor_width_px: 30.0,
            hold_duration_ms: 400,
            pinch_threshold_px: 20.0,
            stationary_threshold_px: 10.0,
            freeze_duration_ms: 5_000,
            offline_min_span_deg: 0.001,
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }
}

impl EditorConfig {
    /// Sets the picking radius.
    #[must_use]
    pub fn with_pick_radius(mut self, px: f64) -> Self {
        self.pick_radius_px = px;
        self
    }

    /// Sets the route hit-corridor width.
    #[must_use]
    pub fn with_corridor_width(mut self, px: f64) -> Self {
        self.corridor_width_px = px;
        self
    }

    /// Sets the average speed used for time estimates.
    #[must_use]
    pub fn with_average_speed(mut self, kmh: f64) -> Self {
        self.average_speed_kmh = kmh;
        self
    }

    /// Hold duration as a [`Duration`].
    #[must_use]
    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_duration_ms)
    }

    /// Freeze duration as a [`Duration`].
    #[must_use]
    pub fn freeze_duration(&self) -> Duration {
        Duration::from_millis(self.freeze_duration_ms)
    }

    /// Checks that every threshold is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if a length, span or speed is not positive, or if a
    /// pinch could never be told apart from finger jitter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("pick_radius_px", self.pick_radius_px),
            ("corridor_width_px", self.corridor_width_px),
            ("pinch_threshold_px", self.pinch_threshold_px),
            ("stationary_threshold_px", self.stationary_threshold_px),
            ("offline_min_span_deg", self.offline_min_span_deg),
            ("average_speed_kmh", self.average_speed_kmh),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.pinch_threshold_px <= self.stationary_threshold_px {
            return Err(ConfigError::ThresholdOrder {
                pinch: self.pinch_threshold_px,
                stationary: self.stationary_threshold_px,
            });
        }
        Ok(())
    }
}
