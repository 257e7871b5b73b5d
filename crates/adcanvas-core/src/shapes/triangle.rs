//! Triangle outline.

use super::Frame;
use kurbo::{BezPath, Point};

/// Isosceles triangle with its apex at the top center of the frame.
pub fn triangle_path(frame: &Frame) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(Point::new(frame.width / 2.0, 0.0));
    path.line_to(Point::new(frame.width, frame.height));
    path.line_to(Point::new(0.0, frame.height));
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape as KurboShape;

    #[test]
    fn test_triangle_apex() {
        let frame = Frame::new(0.0, 0.0, 80.0, 40.0);
        let path = triangle_path(&frame);
        let bbox = path.bounding_box();
        assert!((bbox.width() - 80.0).abs() < f64::EPSILON);
        assert!((bbox.height() - 40.0).abs() < f64::EPSILON);
        assert!(path.contains(Point::new(40.0, 30.0)));
        assert!(!path.contains(Point::new(2.0, 2.0)));
    }
}
