//! Line payload.

use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};

/// Straight segment with endpoints in the frame's local coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn local_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
        path
    }

    /// Segment length in local units.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }
}
