//! Circle and ellipse outlines.
//!
//! Both kinds fill their frame's local box; a circle is an ellipse whose
//! frame is square.

use super::Frame;
use kurbo::{BezPath, Ellipse as KurboEllipse, Shape as KurboShape};

/// Ellipse inscribed in the frame's local box.
pub fn ellipse_path(frame: &Frame) -> BezPath {
    KurboEllipse::from_rect(frame.local_rect()).to_path(0.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;
    use kurbo::Point;

    #[test]
    fn test_ellipse_radii() {
        let ellipse = Shape::ellipse(Point::new(100.0, 100.0), 50.0, 25.0);
        assert!((ellipse.frame.width - 100.0).abs() < f64::EPSILON);
        assert!((ellipse.frame.height - 50.0).abs() < f64::EPSILON);
        assert!((ellipse.frame.left - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_path_matches_frame() {
        let frame = Frame::new(0.0, 0.0, 60.0, 30.0);
        let bbox = ellipse_path(&frame).bounding_box();
        assert!((bbox.width() - 60.0).abs() < 1e-6);
        assert!((bbox.height() - 30.0).abs() < 1e-6);
    }
}
