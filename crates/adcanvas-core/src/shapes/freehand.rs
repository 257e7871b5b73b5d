//! Freehand pencil strokes.

use super::Frame;
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A freehand stroke with points relative to the frame's top-left corner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    pub points: Vec<Point>,
}

impl Freehand {
    /// Build a stroke from scene points, returning the payload and its frame.
    pub fn from_scene_points(points: &[Point]) -> (Self, Frame) {
        let Some(first) = points.first() else {
            return (Self::default(), Frame::new(0.0, 0.0, 0.0, 0.0));
        };
        let bounds = points
            .iter()
            .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p));
        let local = points
            .iter()
            .map(|p| Point::new(p.x - bounds.x0, p.y - bounds.y0))
            .collect();
        (
            Self { points: local },
            Frame::new(bounds.x0, bounds.y0, bounds.width(), bounds.height()),
        )
    }

    /// Polyline through the points, smoothed with quadratic midpoints.
    pub fn local_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return path;
        };
        path.move_to(*first);
        if self.points.len() < 3 {
            for p in &self.points[1..] {
                path.line_to(*p);
            }
            return path;
        }
        for pair in self.points[1..].windows(2) {
            let mid = pair[0].midpoint(pair[1]);
            path.quad_to(pair[0], mid);
        }
        if let Some(last) = self.points.last() {
            path.line_to(*last);
        }
        path
    }
}
