//! Editor configuration.

use crate::shapes::SerializableColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid zoom bounds: min {min} must be positive and below max {max}")]
    ZoomBounds { min: f64, max: f64 },
    #[error("History limit must be at least 1")]
    HistoryLimit,
}

/// Tunable constants for the editor.
///
/// Every field has a default, so a partial JSON document only needs to
/// name the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Lowest zoom factor the viewport accepts.
    pub min_zoom: f64,
    /// Highest zoom factor the viewport accepts.
    pub max_zoom: f64,
    /// Ratio applied by zoom in/out.
    pub zoom_step: f64,
    /// Base of the exponential wheel zoom curve.
    pub wheel_zoom_base: f64,
    /// Screen padding reserved on each edge by fit-to-screen.
    pub fit_padding: f64,
    /// Snap distance for alignment guides, in screen pixels.
    pub snap_threshold: f64,
    /// Extra length added past both objects on a guide line.
    pub guide_margin: f64,
    /// Maximum number of undo snapshots kept.
    pub history_limit: usize,
    /// Offset applied to each successive paste.
    pub paste_offset: f64,
    /// Shapes smaller than this in both dimensions are discarded on release.
    pub min_shape_size: f64,
    /// Initial viewport width.
    pub viewport_width: f64,
    /// Initial viewport height.
    pub viewport_height: f64,
    /// Canvas background color.
    pub background: SerializableColor,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 5.0,
            zoom_step: 1.2,
            wheel_zoom_base: 0.999,
            fit_padding: 40.0,
            snap_threshold: 5.0,
            guide_margin: 20.0,
            history_limit: 50,
            paste_offset: 20.0,
            min_shape_size: 3.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
            background: SerializableColor::new(0xf0, 0xf0, 0xf0, 255),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the rest of the editor relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom;
        if !(ordered && self.max_zoom.is_finite()) {
            return Err(ConfigError::ZoomBounds {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if self.history_limit == 0 {
            return Err(ConfigError::HistoryLimit);
        }
        Ok(())
    }
}
