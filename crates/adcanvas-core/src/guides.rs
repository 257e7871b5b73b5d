//! Alignment guides: snapping a dragged box to the canvas center and to
//! other objects, with transient guide lines for the renderer.
//!
//! Guide lines live here rather than in the scene graph, so they never show
//! up in object enumeration, selection, export or snapshots.

use kurbo::{Point, Rect, Vec2};

/// Stroke color of guide lines (`#ff00ff`).
pub const GUIDE_COLOR: [u8; 4] = [0xff, 0x00, 0xff, 0xff];
/// Dash pattern of guide lines, in screen pixels.
pub const GUIDE_DASH: [f64; 2] = [4.0, 4.0];
/// Stroke width of guide lines, in screen pixels.
pub const GUIDE_WIDTH: f64 = 1.0;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideAxis {
    /// A vertical line marking an X alignment.
    Vertical,
    /// A horizontal line marking a Y alignment.
    Horizontal,
}

/// A transient guide line in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub axis: GuideAxis,
    pub start: Point,
    pub end: Point,
}

impl GuideLine {
    fn vertical(x: f64, y0: f64, y1: f64) -> Self {
        Self {
            axis: GuideAxis::Vertical,
            start: Point::new(x, y0),
            end: Point::new(x, y1),
        }
    }

    fn horizontal(y: f64, x0: f64, x1: f64) -> Self {
        Self {
            axis: GuideAxis::Horizontal,
            start: Point::new(x0, y),
            end: Point::new(x1, y),
        }
    }
}

/// Result of one snapping pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// Correction to add to the dragged box's position.
    pub delta: Vec2,
    pub snapped_x: bool,
    pub snapped_y: bool,
}

impl SnapResult {
    pub fn none() -> Self {
        Self {
            delta: Vec2::ZERO,
            snapped_x: false,
            snapped_y: false,
        }
    }

    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Everything the engine needs to know about the current view.
#[derive(Debug, Clone, Copy)]
pub struct SnapFrame {
    /// Scene point under the center of the viewport.
    pub canvas_center: Point,
    /// Visible scene rectangle; canvas-center guides span it.
    pub visible: Rect,
    /// Current zoom, used to convert the pixel threshold to scene units.
    pub zoom: f64,
}

/// Snapping engine holding the current guide lines.
#[derive(Debug, Clone)]
pub struct GuideEngine {
    /// Snap distance in screen pixels.
    threshold: f64,
    /// Extra guide length past both boxes, in scene units.
    margin: f64,
    guides: Vec<GuideLine>,
}

impl Default for GuideEngine {
    fn default() -> Self {
        Self::new(5.0, 20.0)
    }
}

/// Which edge pair produced an X or Y snap, in precedence order.
#[derive(Debug, Clone, Copy)]
enum EdgePair {
    /// left-left / top-top
    Start,
    /// right-right / bottom-bottom
    End,
    /// left-to-right / top-to-bottom
    StartToEnd,
    /// right-to-left / bottom-to-top
    EndToStart,
    /// center-center
    Center,
}

const PRECEDENCE: [EdgePair; 5] = [
    EdgePair::Start,
    EdgePair::End,
    EdgePair::StartToEnd,
    EdgePair::EndToStart,
    EdgePair::Center,
];

/// One axis of a box.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: f64,
    end: f64,
}

impl Span {
    fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// The dragged box's coordinate and the other box's coordinate compared
    /// by an edge pair.
    fn pair(&self, other: &Span, pair: EdgePair) -> (f64, f64) {
        match pair {
            EdgePair::Start => (self.start, other.start),
            EdgePair::End => (self.end, other.end),
            EdgePair::StartToEnd => (self.start, other.end),
            EdgePair::EndToStart => (self.end, other.start),
            EdgePair::Center => (self.center(), other.center()),
        }
    }
}

fn x_span(rect: Rect) -> Span {
    Span {
        start: rect.x0,
        end: rect.x1,
    }
}

fn y_span(rect: Rect) -> Span {
    Span {
        start: rect.y0,
        end: rect.y1,
    }
}

/// First matching edge pair along one axis, as (shift, line position).
fn match_axis(moving: &Span, other: &Span, threshold: f64) -> Option<(f64, f64)> {
    PRECEDENCE.iter().find_map(|&pair| {
        let (mine, theirs) = moving.pair(other, pair);
        ((mine - theirs).abs() < threshold).then_some((theirs - mine, theirs))
    })
}

impl GuideEngine {
    pub fn new(threshold: f64, margin: f64) -> Self {
        Self {
            threshold,
            margin,
            guides: Vec::new(),
        }
    }

    /// Guide lines currently shown.
    pub fn guides(&self) -> &[GuideLine] {
        &self.guides
    }

    pub fn clear(&mut self) {
        self.guides.clear();
    }

    /// Snap distance in scene units at the given zoom.
    pub fn scene_threshold(&self, zoom: f64) -> f64 {
        self.threshold / zoom.max(f64::EPSILON)
    }

    /// Snap a dragged box against the canvas center, then against `others`
    /// in order, rebuilding the guide lines from scratch.
    ///
    /// `others` must already exclude the dragged objects and any hidden or
    /// locked objects.
    pub fn snap<I>(&mut self, moving: Rect, others: I, frame: &SnapFrame) -> SnapResult
    where
        I: IntoIterator<Item = Rect>,
    {
        self.guides.clear();
        let threshold = self.scene_threshold(frame.zoom);
        let mut result = SnapResult::none();
        let mx = x_span(moving);
        let my = y_span(moving);

        if (mx.center() - frame.canvas_center.x).abs() < threshold {
            result.delta.x = frame.canvas_center.x - mx.center();
            result.snapped_x = true;
            self.guides.push(GuideLine::vertical(
                frame.canvas_center.x,
                frame.visible.y0,
                frame.visible.y1,
            ));
        }
        if (my.center() - frame.canvas_center.y).abs() < threshold {
            result.delta.y = frame.canvas_center.y - my.center();
            result.snapped_y = true;
            self.guides.push(GuideLine::horizontal(
                frame.canvas_center.y,
                frame.visible.x0,
                frame.visible.x1,
            ));
        }

        for other in others {
            if result.snapped_x && result.snapped_y {
                break;
            }
            let ox = x_span(other);
            let oy = y_span(other);

            if !result.snapped_x {
                if let Some((shift, x)) = match_axis(&mx, &ox, threshold) {
                    result.delta.x = shift;
                    result.snapped_x = true;
                    self.guides.push(GuideLine::vertical(
                        x,
                        my.start.min(oy.start) - self.margin,
                        my.end.max(oy.end) + self.margin,
                    ));
                }
            }

            if !result.snapped_y {
                if let Some((shift, y)) = match_axis(&my, &oy, threshold) {
                    result.delta.y = shift;
                    result.snapped_y = true;
                    self.guides.push(GuideLine::horizontal(
                        y,
                        mx.start.min(ox.start) - self.margin,
                        mx.end.max(ox.end) + self.margin,
                    ));
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> SnapFrame {
        SnapFrame {
            canvas_center: Point::new(400.0, 300.0),
            visible: Rect::new(0.0, 0.0, 800.0, 600.0),
            zoom: 1.0,
        }
    }

    #[test]
    fn test_no_snap_far_away() {
        let mut engine = GuideEngine::default();
        let result = engine.snap(
            Rect::new(10.0, 10.0, 60.0, 60.0),
            [Rect::new(200.0, 200.0, 250.0, 250.0)],
            &frame(),
        );
        assert!(!result.is_snapped());
        assert!(engine.guides().is_empty());
    }

    #[test]
    fn test_canvas_center_snap_both_axes() {
        let mut engine = GuideEngine::default();
        // Center at (402, 297): within 5px on both axes.
        let moving = Rect::new(352.0, 247.0, 452.0, 347.0);
        let result = engine.snap(moving, std::iter::empty(), &frame());
        assert!(result.snapped_x && result.snapped_y);
        assert!((result.delta.x + 2.0).abs() < 1e-9);
        assert!((result.delta.y - 3.0).abs() < 1e-9);
        assert_eq!(engine.guides().len(), 2);
        let vertical = engine.guides()[0];
        assert_eq!(vertical.axis, GuideAxis::Vertical);
        assert!((vertical.start.y - 0.0).abs() < f64::EPSILON);
        assert!((vertical.end.y - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_left_edge_snap_single_guide() {
        let mut engine = GuideEngine::default();
        let other = Rect::new(100.0, 100.0, 200.0, 150.0);
        let moving = Rect::new(103.0, 300.0, 153.0, 330.0);
        let result = engine.snap(moving, [other], &frame());
        assert!(result.snapped_x);
        assert!(!result.snapped_y);
        assert!((result.delta.x + 3.0).abs() < 1e-9);
        assert_eq!(engine.guides().len(), 1);
        let guide = engine.guides()[0];
        assert!((guide.start.x - 100.0).abs() < f64::EPSILON);
        assert!((guide.start.y - 80.0).abs() < f64::EPSILON);
        assert!((guide.end.y - 350.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut engine = GuideEngine::default();
        let other = Rect::new(100.0, 100.0, 200.0, 150.0);
        let moving = Rect::new(105.0, 300.0, 155.0, 330.0);
        let result = engine.snap(moving, [other], &frame());
        assert!(!result.snapped_x);
    }

    #[test]
    fn test_precedence_left_before_center() {
        let mut engine = GuideEngine::default();
        // Same width boxes: left, right and center all match; left wins.
        let other = Rect::new(100.0, 100.0, 200.0, 150.0);
        let moving = Rect::new(102.0, 400.0, 202.0, 420.0);
        let result = engine.snap(moving, [other], &frame());
        assert!((result.delta.x + 2.0).abs() < 1e-9);
        assert!((engine.guides()[0].start.x - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_left_to_right_snap() {
        let mut engine = GuideEngine::default();
        let other = Rect::new(100.0, 100.0, 200.0, 150.0);
        let moving = Rect::new(203.0, 400.0, 243.0, 420.0);
        let result = engine.snap(moving, [other], &frame());
        assert!((result.delta.x + 3.0).abs() < 1e-9);
        assert!((engine.guides()[0].start.x - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_top_to_bottom_snap() {
        let mut engine = GuideEngine::default();
        let other = Rect::new(500.0, 100.0, 600.0, 150.0);
        let moving = Rect::new(20.0, 152.0, 60.0, 192.0);
        let result = engine.snap(moving, [other], &frame());
        assert!(result.snapped_y);
        assert!((result.delta.y + 2.0).abs() < 1e-9);
        let guide = engine.guides()[0];
        assert_eq!(guide.axis, GuideAxis::Horizontal);
        assert!((guide.start.x - 0.0).abs() < f64::EPSILON);
        assert!((guide.end.x - 620.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_threshold_scales_with_zoom() {
        let mut engine = GuideEngine::default();
        let other = Rect::new(100.0, 100.0, 200.0, 150.0);
        let moving = Rect::new(104.0, 300.0, 154.0, 330.0);
        let mut zoomed = frame();
        zoomed.zoom = 2.0;
        // 5px at zoom 2 is 2.5 scene units, so a 4 unit gap does not snap.
        assert!(!engine.snap(moving, [other], &zoomed).snapped_x);
        zoomed.zoom = 0.5;
        assert!(engine.snap(moving, [other], &zoomed).snapped_x);
    }

    #[test]
    fn test_first_candidate_wins_and_guides_rebuilt() {
        let mut engine = GuideEngine::default();
        let first = Rect::new(102.0, 0.0, 130.0, 20.0);
        let second = Rect::new(101.0, 500.0, 150.0, 520.0);
        let moving = Rect::new(100.0, 300.0, 140.0, 340.0);
        let result = engine.snap(moving, [first, second], &frame());
        assert!((result.delta.x - 2.0).abs() < 1e-9);
        assert_eq!(engine.guides().len(), 1);

        // A later tick with nothing nearby drops the old guide.
        engine.snap(Rect::new(600.0, 50.0, 610.0, 60.0), [first], &frame());
        assert!(engine.guides().is_empty());
    }
}
