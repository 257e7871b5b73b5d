//! Viewport transform: zoom/pan state and screen/scene conversions.

use crate::config::EditorConfig;
use crate::input::Modifiers;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// What a wheel gesture did to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelOutcome {
    /// Zoomed around the pointer to the given factor.
    Zoomed(f64),
    /// Panned by the raw scroll delta.
    Panned,
}

/// Viewport manages the view transform for the scene.
///
/// Scene coordinates map to screen coordinates as
/// `screen = scene * zoom + offset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Current translation offset (pan), in screen pixels.
    offset: Vec2,
    /// Current zoom factor.
    zoom: f64,
    /// Minimum allowed zoom level.
    min_zoom: f64,
    /// Maximum allowed zoom level.
    max_zoom: f64,
    /// Size of the host surface in screen pixels.
    size: Size,
    /// Last pointer position of an active pan drag.
    #[serde(skip)]
    pan_anchor: Option<Point>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl Viewport {
    /// Create a viewport with identity transform.
    ///
    /// Unusable zoom bounds fall back to the defaults.
    pub fn new(min_zoom: f64, max_zoom: f64, size: Size) -> Self {
        let (min_zoom, max_zoom) =
            if min_zoom > 0.0 && min_zoom <= max_zoom && max_zoom.is_finite() {
                (min_zoom, max_zoom)
            } else {
                log::warn!("invalid zoom bounds {min_zoom}..{max_zoom}, using defaults");
                let defaults = EditorConfig::default();
                (defaults.min_zoom, defaults.max_zoom)
            };
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom,
            max_zoom,
            size,
            pan_anchor: None,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(
            config.min_zoom,
            config.max_zoom,
            Size::new(config.viewport_width, config.viewport_height),
        )
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn zoom_bounds(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Update the host surface size.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Transform from scene to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Transform from screen to scene coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_scene(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn scene_to_screen(&self, scene_point: Point) -> Point {
        self.transform() * scene_point
    }

    /// Center of the host surface in screen coordinates.
    pub fn screen_center(&self) -> Point {
        Point::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    /// Scene point under the center of the host surface.
    pub fn scene_center(&self) -> Point {
        self.screen_to_scene(self.screen_center())
    }

    /// Scene-space rectangle currently visible.
    pub fn visible_scene_rect(&self) -> Rect {
        let top_left = self.screen_to_scene(Point::ZERO);
        let bottom_right = self.screen_to_scene(Point::new(self.size.width, self.size.height));
        Rect::from_points(top_left, bottom_right)
    }

    /// Clamp a zoom factor into the configured bounds.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.zoom;
        }
        zoom.max(self.min_zoom).min(self.max_zoom)
    }

    /// Set the zoom factor, keeping the given screen point fixed.
    /// Returns the clamped zoom.
    pub fn zoom_at(&mut self, screen_point: Point, zoom: f64) -> f64 {
        let new_zoom = self.clamp_zoom(zoom);
        let scene_point = self.screen_to_scene(screen_point);
        self.zoom = new_zoom;
        let new_screen = self.scene_to_screen(scene_point);
        self.offset += screen_point - new_screen;
        new_zoom
    }

    /// Zoom to an absolute factor around the surface center.
    pub fn zoom_to(&mut self, zoom: f64) -> f64 {
        self.zoom_at(self.screen_center(), zoom)
    }

    pub fn zoom_in(&mut self, step: f64) -> f64 {
        self.zoom_to(self.zoom * step)
    }

    pub fn zoom_out(&mut self, step: f64) -> f64 {
        self.zoom_to(self.zoom / step)
    }

    /// Apply a wheel gesture.
    ///
    /// With Ctrl/Cmd held the vertical delta zooms toward the pointer along
    /// `zoom * base^delta_y`; otherwise the raw delta pans the view.
    pub fn handle_wheel(
        &mut self,
        pointer: Point,
        delta: Vec2,
        modifiers: Modifiers,
        base: f64,
    ) -> WheelOutcome {
        if modifiers.action() {
            let zoom = self.zoom_at(pointer, self.zoom * base.powf(delta.y));
            WheelOutcome::Zoomed(zoom)
        } else {
            self.pan(-delta);
            WheelOutcome::Panned
        }
    }

    /// Pan the view by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Start a pan drag at a screen position.
    pub fn begin_pan(&mut self, screen_point: Point) {
        self.pan_anchor = Some(screen_point);
    }

    /// Continue a pan drag; returns the applied delta.
    pub fn update_pan(&mut self, screen_point: Point) -> Option<Vec2> {
        let anchor = self.pan_anchor?;
        let delta = screen_point - anchor;
        self.pan(delta);
        self.pan_anchor = Some(screen_point);
        Some(delta)
    }

    pub fn end_pan(&mut self) {
        self.pan_anchor = None;
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// Reset to zoom 1 and zero pan.
    pub fn reset_view(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Fit the given scene bounds into the surface with padding on each edge.
    ///
    /// `None` (an empty scene) resets the view. Returns the resulting zoom.
    pub fn fit_to_bounds(&mut self, bounds: Option<Rect>, padding: f64) -> f64 {
        let Some(bounds) = bounds else {
            self.reset_view();
            return self.zoom;
        };
        let padded = Size::new(
            (self.size.width - padding * 2.0).max(1.0),
            (self.size.height - padding * 2.0).max(1.0),
        );
        let zoom_x = padded.width / bounds.width().max(f64::EPSILON);
        let zoom_y = padded.height / bounds.height().max(f64::EPSILON);
        self.zoom = self.clamp_zoom(zoom_x.min(zoom_y).min(self.max_zoom));

        let center = bounds.center();
        let screen_center = self.screen_center();
        self.offset = Vec2::new(
            screen_center.x - center.x * self.zoom,
            screen_center.y - center.y * self.zoom,
        );
        self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(0.1, 5.0, Size::new(800.0, 600.0))
    }

    #[test]
    fn test_default_viewport() {
        let vp = Viewport::default();
        assert_eq!(vp.offset(), Vec2::ZERO);
        assert!((vp.zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(vp.size(), Size::new(800.0, 600.0));
    }

    #[test]
    fn test_screen_to_scene_with_offset_and_zoom() {
        let mut vp = viewport();
        vp.pan(Vec2::new(50.0, 100.0));
        vp.zoom = 2.0;
        let scene = vp.screen_to_scene(Point::new(150.0, 300.0));
        assert!((scene.x - 50.0).abs() < f64::EPSILON);
        assert!((scene.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut vp = viewport();
        vp.offset = Vec2::new(30.0, -20.0);
        vp.zoom = 1.5;
        let original = Point::new(123.0, 456.0);
        let back = vp.scene_to_screen(vp.screen_to_scene(original));
        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_to_clamps() {
        let mut vp = viewport();
        assert!((vp.zoom_to(0.001) - 0.1).abs() < f64::EPSILON);
        assert!((vp.zoom_to(100.0) - 5.0).abs() < f64::EPSILON);
        assert!((vp.zoom_to(2.5) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_inverted_bounds_use_defaults() {
        let mut vp = Viewport::new(5.0, 0.1, Size::new(800.0, 600.0));
        assert_eq!(vp.zoom_bounds(), (0.1, 5.0));
        assert!((vp.zoom_to(100.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_to_keeps_center_fixed() {
        let mut vp = viewport();
        vp.pan(Vec2::new(-120.0, 40.0));
        let before = vp.scene_center();
        vp.zoom_to(3.0);
        let after = vp.scene_center();
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_in_out_inverse() {
        let mut vp = viewport();
        let z1 = vp.zoom_in(1.2);
        assert!(z1 > 1.0);
        let z0 = vp.zoom_out(1.2);
        assert!((z0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_wheel_zoom_keeps_pointer_fixed() {
        let mut vp = viewport();
        let pointer = Point::new(200.0, 150.0);
        let before = vp.screen_to_scene(pointer);
        let outcome = vp.handle_wheel(pointer, Vec2::new(0.0, -100.0), Modifiers::CTRL, 0.999);
        let expected = 0.999f64.powf(-100.0);
        assert_eq!(outcome, WheelOutcome::Zoomed(vp.zoom()));
        assert!((vp.zoom() - expected).abs() < 1e-12);
        let after = vp.screen_to_scene(pointer);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_without_modifier_pans() {
        let mut vp = viewport();
        let outcome = vp.handle_wheel(Point::ZERO, Vec2::new(10.0, 20.0), Modifiers::NONE, 0.999);
        assert_eq!(outcome, WheelOutcome::Panned);
        assert_eq!(vp.offset(), Vec2::new(-10.0, -20.0));
        assert!((vp.zoom() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan_drag() {
        let mut vp = viewport();
        assert!(vp.update_pan(Point::new(5.0, 5.0)).is_none());
        vp.begin_pan(Point::new(10.0, 10.0));
        vp.update_pan(Point::new(15.0, 30.0));
        vp.update_pan(Point::new(20.0, 30.0));
        vp.end_pan();
        assert_eq!(vp.offset(), Vec2::new(10.0, 20.0));
        assert!(!vp.is_panning());
    }

    #[test]
    fn test_fit_empty_resets() {
        let mut vp = viewport();
        vp.zoom_to(3.0);
        vp.pan(Vec2::new(40.0, 40.0));
        assert!((vp.fit_to_bounds(None, 40.0) - 1.0).abs() < f64::EPSILON);
        assert_eq!(vp.offset(), Vec2::ZERO);
    }

    #[test]
    fn test_fit_to_bounds_centers() {
        let mut vp = viewport();
        let bounds = Rect::new(0.0, 0.0, 360.0, 130.0);
        let zoom = vp.fit_to_bounds(Some(bounds), 40.0);
        // Padded surface is 720x520, so width limits: 720 / 360.
        assert!((zoom - 2.0).abs() < f64::EPSILON);
        let center = vp.scene_to_screen(bounds.center());
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_respects_max_zoom() {
        let mut vp = viewport();
        let zoom = vp.fit_to_bounds(Some(Rect::new(0.0, 0.0, 10.0, 10.0)), 40.0);
        assert!((zoom - 5.0).abs() < f64::EPSILON);
    }
}
