//! Rectangle payload.

use super::Frame;
use kurbo::{BezPath, RoundedRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Rectangle-specific data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Corner radius in local units (0 = sharp corners).
    #[serde(default)]
    pub corner_radius: f64,
}

impl Rectangle {
    pub fn rounded(corner_radius: f64) -> Self {
        Self {
            corner_radius: corner_radius.max(0.0),
        }
    }

    /// Outline in the frame's local coordinates.
    pub fn local_path(&self, frame: &Frame) -> BezPath {
        let rect = frame.local_rect();
        // kurbo clamps radii larger than half the shorter side.
        if self.corner_radius > 0.0 {
            RoundedRect::from_rect(rect, self.corner_radius).to_path(0.1)
        } else {
            rect.to_path(0.1)
        }
    }
}
