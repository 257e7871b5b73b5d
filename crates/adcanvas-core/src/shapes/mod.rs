//! Scene objects: the drawable entities owned by the scene graph.

mod cta;
mod ellipse;
mod freehand;
mod group;
mod image;
mod line;
mod rectangle;
mod text;
mod triangle;

pub use cta::{CtaPreset, CtaStyle};
pub use ellipse::ellipse_path;
pub use freehand::Freehand;
pub use group::Group;
pub use image::{ClipRegion, Image, ImageFormat, LoadedImage};
pub(crate) use image::parse_data_url;
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::{FontWeight, Text, TextAlign};
pub use triangle::triangle_path;

use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for scene objects.
pub type ShapeId = Uuid;

/// Smallest scale factor a frame accepts.
pub const MIN_SCALE: f64 = 0.0001;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(digits.chars()) {
                    let v = c.to_digit(16)? as u8;
                    *slot = v * 17;
                }
                Some(Self::new(out[0], out[1], out[2], 255))
            }
            6 => Some(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                channel(&digits[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, dropping alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a fraction in `[0, 1]`.
    pub fn alpha(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Paint attributes shared by every scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color (None = no fill).
    pub fill: Option<SerializableColor>,
    /// Stroke color (None = no stroke).
    pub stroke: Option<SerializableColor>,
    /// Stroke width in scene units.
    pub stroke_width: f64,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: Some(SerializableColor::black()),
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
        }
    }
}

impl ShapeStyle {
    /// Get the fill color as a peniko Color.
    pub fn fill_color(&self) -> Option<Color> {
        self.fill.map(Color::from)
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke_color(&self) -> Option<Color> {
        self.stroke.map(Color::from)
    }

    /// Set the opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }
}

/// Horizontal anchor of a frame's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginX {
    #[default]
    Left,
    Center,
    Right,
}

impl OriginX {
    fn factor(self) -> f64 {
        match self {
            OriginX::Left => 0.0,
            OriginX::Center => 0.5,
            OriginX::Right => 1.0,
        }
    }
}

/// Vertical anchor of a frame's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginY {
    #[default]
    Top,
    Center,
    Bottom,
}

impl OriginY {
    fn factor(self) -> f64 {
        match self {
            OriginY::Top => 0.0,
            OriginY::Center => 0.5,
            OriginY::Bottom => 1.0,
        }
    }
}

/// Geometric frame of a scene object.
///
/// `left`/`top` locate the origin point; the unscaled `width`/`height` box is
/// scaled, then rotated by `angle` degrees around that point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(deserialize_with = "deserialize_scale")]
    scale_x: f64,
    #[serde(deserialize_with = "deserialize_scale")]
    scale_y: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub origin_x: OriginX,
    #[serde(default)]
    pub origin_y: OriginY,
}

impl Frame {
    /// Create an unscaled, unrotated frame anchored at its top-left corner.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            origin_x: OriginX::Left,
            origin_y: OriginY::Top,
        }
    }

    /// Create a frame covering a rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    /// Set both scale factors; non-positive or non-finite values are clamped.
    pub fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.scale_x = clamp_scale(scale_x);
        self.scale_y = clamp_scale(scale_y);
    }

    pub fn scaled_width(&self) -> f64 {
        self.width * self.scale_x
    }

    pub fn scaled_height(&self) -> f64 {
        self.height * self.scale_y
    }

    /// The unscaled local box, `(0, 0)` to `(width, height)`.
    pub fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Transform from local (unscaled) coordinates to scene coordinates.
    pub fn transform(&self) -> Affine {
        let offset = Vec2::new(
            -self.origin_x.factor() * self.scaled_width(),
            -self.origin_y.factor() * self.scaled_height(),
        );
        Affine::translate((self.left, self.top))
            * Affine::rotate(self.angle.to_radians())
            * Affine::translate(offset)
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    /// Axis-aligned bounding box in scene coordinates.
    pub fn bounds(&self) -> Rect {
        self.transform().transform_rect_bbox(self.local_rect())
    }

    /// Convert a scene point into this frame's local coordinates.
    pub fn to_local(&self, point: Point) -> Point {
        self.transform().inverse() * point
    }

    /// Move the frame so its bounding box starts at `(left, top)`.
    pub fn set_bounds_origin(&mut self, left: f64, top: f64) {
        let bounds = self.bounds();
        self.left += left - bounds.x0;
        self.top += top - bounds.y0;
    }
}

fn deserialize_scale<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_scale)
}

fn clamp_scale(value: f64) -> f64 {
    if value.is_finite() && value > MIN_SCALE {
        value
    } else {
        MIN_SCALE
    }
}

/// Discriminant of a scene object's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Circle,
    Ellipse,
    Triangle,
    Line,
    Text,
    Image,
    Group,
    Path,
}

impl ShapeType {
    /// Lowercase name used in layer listings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Circle => "circle",
            ShapeType::Ellipse => "ellipse",
            ShapeType::Triangle => "triangle",
            ShapeType::Line => "line",
            ShapeType::Text => "text",
            ShapeType::Image => "image",
            ShapeType::Group => "group",
            ShapeType::Path => "path",
        }
    }
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle(Rectangle),
    Circle,
    Ellipse,
    Triangle,
    Line(Line),
    Text(Text),
    Image(Image),
    Group(Group),
    Path(Freehand),
}

impl ShapeKind {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            ShapeKind::Rectangle(_) => ShapeType::Rectangle,
            ShapeKind::Circle => ShapeType::Circle,
            ShapeKind::Ellipse => ShapeType::Ellipse,
            ShapeKind::Triangle => ShapeType::Triangle,
            ShapeKind::Line(_) => ShapeType::Line,
            ShapeKind::Text(_) => ShapeType::Text,
            ShapeKind::Image(_) => ShapeType::Image,
            ShapeKind::Group(_) => ShapeType::Group,
            ShapeKind::Path(_) => ShapeType::Path,
        }
    }
}

/// A drawable scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: ShapeId,
    pub frame: Frame,
    pub style: ShapeStyle,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Locked objects cannot be selected or interacted with.
    #[serde(default)]
    pub locked: bool,
    pub kind: ShapeKind,
}

fn default_true() -> bool {
    true
}

impl Shape {
    /// Create a shape with a fresh identifier.
    pub fn new(kind: ShapeKind, frame: Frame, style: ShapeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame,
            style,
            visible: true,
            locked: false,
            kind,
        }
    }

    /// Axis-aligned rectangle.
    pub fn rectangle(rect: Rect) -> Self {
        Self::new(
            ShapeKind::Rectangle(Rectangle::default()),
            Frame::from_rect(rect),
            ShapeStyle::default(),
        )
    }

    /// Circle with the given center and radius.
    pub fn circle(center: Point, radius: f64) -> Self {
        let radius = radius.abs();
        Self::new(
            ShapeKind::Circle,
            Frame::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0),
            ShapeStyle::default(),
        )
    }

    /// Ellipse with independent radii.
    pub fn ellipse(center: Point, rx: f64, ry: f64) -> Self {
        let (rx, ry) = (rx.abs(), ry.abs());
        Self::new(
            ShapeKind::Ellipse,
            Frame::new(center.x - rx, center.y - ry, rx * 2.0, ry * 2.0),
            ShapeStyle::default(),
        )
    }

    /// Upward-pointing isosceles triangle filling the rectangle.
    pub fn triangle(rect: Rect) -> Self {
        Self::new(
            ShapeKind::Triangle,
            Frame::from_rect(rect),
            ShapeStyle::default(),
        )
    }

    /// Straight line between two scene points.
    pub fn line(start: Point, end: Point) -> Self {
        let mut shape = Self::new(
            ShapeKind::Line(Line::default()),
            Frame::new(start.x, start.y, 0.0, 0.0),
            ShapeStyle {
                fill: None,
                stroke: Some(SerializableColor::black()),
                ..ShapeStyle::default()
            },
        );
        shape.set_line_points(start, end);
        shape
    }

    /// Freehand stroke through scene points.
    pub fn freehand(points: &[Point]) -> Self {
        let (freehand, frame) = Freehand::from_scene_points(points);
        Self::new(
            ShapeKind::Path(freehand),
            frame,
            ShapeStyle {
                fill: None,
                stroke: Some(SerializableColor::black()),
                ..ShapeStyle::default()
            },
        )
    }

    /// Text object anchored at its top-left corner.
    pub fn text(position: Point, text: Text) -> Self {
        let size = text.measure();
        Self::new(
            ShapeKind::Text(text),
            Frame::new(position.x, position.y, size.width, size.height),
            ShapeStyle::default(),
        )
    }

    /// Image object at its natural pixel size.
    pub fn image(position: Point, image: Image) -> Self {
        let frame = Frame::new(
            position.x,
            position.y,
            f64::from(image.source_width),
            f64::from(image.source_height),
        );
        Self::new(
            ShapeKind::Image(image),
            frame,
            ShapeStyle {
                fill: None,
                ..ShapeStyle::default()
            },
        )
    }

    /// Group owning the given children.
    pub fn group(children: Vec<Shape>) -> Self {
        Self::group_from(Group::new(children))
    }

    pub(crate) fn group_from(group: Group) -> Self {
        let frame = Frame::from_rect(group.children_bounds());
        Self::new(
            ShapeKind::Group(group),
            frame,
            ShapeStyle {
                fill: None,
                ..ShapeStyle::default()
            },
        )
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: ShapeId) {
        self.id = id;
    }

    pub fn shape_type(&self) -> ShapeType {
        self.kind.shape_type()
    }

    /// Builder-style style override.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Bounding box in scene coordinates.
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ShapeKind::Group(group) => group.children_bounds(),
            _ => self.frame.bounds(),
        }
    }

    /// Check whether a scene point hits this object.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match &self.kind {
            ShapeKind::Line(line) => {
                let t = self.frame.transform();
                let reach = tolerance + self.style.stroke_width / 2.0;
                point_to_segment_dist(point, t * line.start, t * line.end) <= reach
            }
            ShapeKind::Path(freehand) => {
                let t = self.frame.transform();
                let points: Vec<Point> = freehand.points.iter().map(|p| t * *p).collect();
                let reach = tolerance + self.style.stroke_width / 2.0;
                point_to_polyline_dist(point, &points) <= reach
            }
            ShapeKind::Group(group) => group
                .children
                .iter()
                .any(|child| child.hit_test(point, tolerance)),
            _ => self.bounds().inflate(tolerance, tolerance).contains(point),
        }
    }

    /// Test if this object intersects a selection rectangle.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        rect.intersect(self.bounds().inflate(1.0, 1.0)).area() > 0.0
    }

    /// Outline in scene coordinates (text and images use their frame box).
    pub fn to_path(&self) -> BezPath {
        let local = match &self.kind {
            ShapeKind::Rectangle(rect) => rect.local_path(&self.frame),
            ShapeKind::Circle | ShapeKind::Ellipse => ellipse_path(&self.frame),
            ShapeKind::Triangle => triangle_path(&self.frame),
            ShapeKind::Line(line) => line.local_path(),
            ShapeKind::Path(freehand) => freehand.local_path(),
            ShapeKind::Text(_) | ShapeKind::Image(_) => self.frame.local_rect().to_path(0.1),
            ShapeKind::Group(group) => {
                let mut path = BezPath::new();
                for child in &group.children {
                    path.extend(child.to_path().elements().iter().copied());
                }
                return path;
            }
        };
        self.frame.transform() * local
    }

    /// Move the object (and any children) by a scene-space delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.frame.left += delta.x;
        self.frame.top += delta.y;
        if let ShapeKind::Group(group) = &mut self.kind {
            for child in &mut group.children {
                child.translate(delta);
            }
        }
    }

    /// Move the object so its bounding box starts at `(left, top)`.
    pub fn move_bounds_to(&mut self, left: f64, top: f64) {
        let bounds = self.bounds();
        self.translate(Vec2::new(left - bounds.x0, top - bounds.y0));
    }

    /// Set scale factors, clamped to stay positive.
    ///
    /// Groups apply the factors to their children immediately, relative to
    /// the group's top-left corner, and keep a unit scale themselves.
    pub fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        if let ShapeKind::Group(group) = &mut self.kind {
            let anchor = Point::new(self.frame.left, self.frame.top);
            group.rescale_children(anchor, clamp_scale(scale_x), clamp_scale(scale_y));
            self.refresh();
            return;
        }
        self.frame.set_scale(scale_x, scale_y);
    }

    /// Reposition a line's endpoints in scene coordinates.
    pub fn set_line_points(&mut self, start: Point, end: Point) {
        if let ShapeKind::Line(line) = &mut self.kind {
            let rect = Rect::from_points(start, end);
            self.frame = Frame::new(rect.x0, rect.y0, rect.width(), rect.height());
            line.start = Point::new(start.x - rect.x0, start.y - rect.y0);
            line.end = Point::new(end.x - rect.x0, end.y - rect.y0);
        }
    }

    /// Give this object, and every descendant, a fresh identifier.
    pub fn regenerate_ids(&mut self) {
        self.id = Uuid::new_v4();
        if let ShapeKind::Group(group) = &mut self.kind {
            for child in &mut group.children {
                child.regenerate_ids();
            }
        }
    }

    /// All identifiers in this subtree, self first.
    pub fn all_ids(&self) -> Vec<ShapeId> {
        let mut ids = vec![self.id];
        if let ShapeKind::Group(group) = &self.kind {
            for child in &group.children {
                ids.extend(child.all_ids());
            }
        }
        ids
    }

    /// Find a descendant (or self) by identifier.
    pub fn find(&self, id: ShapeId) -> Option<&Shape> {
        if self.id == id {
            return Some(self);
        }
        self.as_group()?.children.iter().find_map(|c| c.find(id))
    }

    /// Find a mutable descendant (or self) by identifier.
    pub fn find_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        if self.id == id {
            return Some(self);
        }
        match &mut self.kind {
            ShapeKind::Group(group) => group.children.iter_mut().find_map(|c| c.find_mut(id)),
            _ => None,
        }
    }

    /// Recompute derived frame data after a payload change.
    pub fn refresh(&mut self) {
        match &mut self.kind {
            ShapeKind::Text(text) => {
                let size = text.measure();
                self.frame.width = size.width;
                self.frame.height = size.height;
            }
            ShapeKind::Group(group) => {
                for child in &mut group.children {
                    child.refresh();
                }
                let bounds = group.children_bounds();
                self.frame.left = bounds.x0;
                self.frame.top = bounds.y0;
                self.frame.width = bounds.width();
                self.frame.height = bounds.height();
            }
            _ => {}
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ShapeKind::Text(_))
    }

    pub fn as_text(&self) -> Option<&Text> {
        match &self.kind {
            ShapeKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match &mut self.kind {
            ShapeKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ShapeKind::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            ShapeKind::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match &mut self.kind {
            ShapeKind::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match &self.kind {
            ShapeKind::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut Image> {
        match &mut self.kind {
            ShapeKind::Image(img) => Some(img),
            _ => None,
        }
    }

    /// Human readable layer name; `index` is the paint-order position.
    pub fn display_name(&self, index: usize) -> String {
        let n = index + 1;
        match &self.kind {
            ShapeKind::Group(g) if g.cta.is_some() => "CTA Button".to_string(),
            ShapeKind::Text(t) if !t.content.is_empty() => t.content.chars().take(20).collect(),
            ShapeKind::Text(_) => format!("Text {n}"),
            ShapeKind::Image(_) => format!("Image {n}"),
            ShapeKind::Rectangle(_) => format!("Rectangle {n}"),
            ShapeKind::Circle => format!("Circle {n}"),
            ShapeKind::Ellipse => format!("Ellipse {n}"),
            ShapeKind::Triangle => format!("Triangle {n}"),
            ShapeKind::Line(_) => format!("Line {n}"),
            ShapeKind::Path(_) => format!("Drawing {n}"),
            ShapeKind::Group(_) => format!("Group {n}"),
        }
    }
}

/// Distance from a point to a line segment (a to b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    (point - (a + seg * t)).hypot()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => (point - *only).hypot(),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Union of the bounds of several objects, or `None` when empty.
pub fn union_bounds<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Option<Rect> {
    shapes
        .into_iter()
        .map(Shape::bounds)
        .reduce(|acc, b| acc.union(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(
            SerializableColor::from_hex("#3b82f6"),
            Some(SerializableColor::new(0x3b, 0x82, 0xf6, 255))
        );
        assert_eq!(
            SerializableColor::from_hex("#fff"),
            Some(SerializableColor::white())
        );
        assert_eq!(SerializableColor::from_hex("#12"), None);
        assert_eq!(SerializableColor::new(255, 0, 255, 255).to_hex(), "#ff00ff");
    }

    #[test]
    fn test_frame_bounds_with_scale() {
        let mut frame = Frame::new(10.0, 20.0, 100.0, 50.0);
        frame.set_scale(2.0, 0.5);
        let bounds = frame.bounds();
        assert!((bounds.x0 - 10.0).abs() < 1e-9);
        assert!((bounds.y0 - 20.0).abs() < 1e-9);
        assert!((bounds.width() - 200.0).abs() < 1e-9);
        assert!((bounds.height() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_clamps_scale_on_load() {
        let json = r#"{"left":0.0,"top":0.0,"width":10.0,"height":10.0,"scale_x":-2.0,"scale_y":0.0}"#;
        let frame: Frame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.scale_x(), MIN_SCALE);
        assert_eq!(frame.scale_y(), MIN_SCALE);
    }

    #[test]
    fn test_frame_center_origin() {
        let mut frame = Frame::new(50.0, 50.0, 20.0, 10.0);
        frame.origin_x = OriginX::Center;
        frame.origin_y = OriginY::Center;
        let bounds = frame.bounds();
        assert!((bounds.x0 - 40.0).abs() < 1e-9);
        assert!((bounds.y0 - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_frame_rotation_bounds() {
        let mut frame = Frame::new(0.0, 0.0, 100.0, 100.0);
        frame.angle = 90.0;
        let bounds = frame.bounds();
        assert!((bounds.x0 + 100.0).abs() < 1e-9);
        assert!((bounds.x1 - 0.0).abs() < 1e-9);
        assert!((bounds.y1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_stays_positive() {
        let mut frame = Frame::new(0.0, 0.0, 10.0, 10.0);
        frame.set_scale(-3.0, 0.0);
        assert!(frame.scale_x() > 0.0);
        assert!(frame.scale_y() > 0.0);
        frame.set_scale(f64::NAN, 2.0);
        assert!(frame.scale_x() > 0.0);
        assert!((frame.scale_y() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_circle_bounds() {
        let circle = Shape::circle(Point::new(50.0, 50.0), 25.0);
        let bounds = circle.bounds();
        assert!((bounds.x0 - 25.0).abs() < f64::EPSILON);
        assert!((bounds.width() - 50.0).abs() < f64::EPSILON);
        assert_eq!(circle.shape_type(), ShapeType::Circle);
    }

    #[test]
    fn test_line_hit_test() {
        let line = Shape::line(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert!(line.hit_test(Point::new(50.0, 50.0), 2.0));
        assert!(!line.hit_test(Point::new(90.0, 10.0), 2.0));
    }

    #[test]
    fn test_translate_group_moves_children() {
        let a = Shape::rectangle(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = Shape::rectangle(Rect::new(20.0, 20.0, 30.0, 30.0));
        let mut group = Shape::group(vec![a, b]);
        group.translate(Vec2::new(5.0, 5.0));
        let bounds = group.bounds();
        assert!((bounds.x0 - 5.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 35.0).abs() < f64::EPSILON);
        assert!((group.frame.left - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_regenerate_ids_is_recursive() {
        let child = Shape::rectangle(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut group = Shape::group(vec![child]);
        let before = group.all_ids();
        group.regenerate_ids();
        let after = group.all_ids();
        assert_eq!(before.len(), after.len());
        assert!(before.iter().all(|id| !after.contains(id)));
    }

    #[test]
    fn test_serde_roundtrip_keeps_kind() {
        let shape = Shape::ellipse(Point::new(10.0, 10.0), 5.0, 3.0);
        let json = serde_json::to_string(&shape).unwrap();
        assert!(json.contains("\"type\":\"ellipse\""));
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shape);
    }

    #[test]
    fn test_display_names() {
        let rect = Shape::rectangle(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(rect.display_name(0), "Rectangle 1");
        let text = Shape::text(Point::ZERO, Text::new("A very long headline for a banner"));
        assert_eq!(text.display_name(3), "A very long headline");
    }
}
