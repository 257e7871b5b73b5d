//! SVG serialization of scene objects.
//!
//! Objects are written in painter's order inside one group carrying the
//! scene-to-output transform. Overlays (guide lines, marquee) are written
//! afterwards in output space so their stroke width does not follow zoom.

use adcanvas_core::guides::{GUIDE_COLOR, GUIDE_DASH, GUIDE_WIDTH};
use adcanvas_core::shapes::{Image, ShapeKind, Text};
use adcanvas_core::{GuideLine, SerializableColor, Shape, ShapeStyle};
use kurbo::{Affine, Rect, Size};

/// Baseline of a text line below the line's top, as a fraction of font size.
const BASELINE_RATIO: f64 = 0.8;

const MARQUEE_FILL: SerializableColor = SerializableColor::new(0x1e, 0x90, 0xff, 0x26);
const MARQUEE_STROKE: SerializableColor = SerializableColor::new(0x1e, 0x90, 0xff, 0xff);

/// Output parameters of an SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    /// Document size in output units.
    pub size: Size,
    /// Scene-to-output transform.
    pub transform: Affine,
    pub background: Option<SerializableColor>,
    /// Family appended to every font list.
    pub fallback_font: String,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            size: Size::new(800.0, 600.0),
            transform: Affine::IDENTITY,
            background: None,
            fallback_font: Text::DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl SvgOptions {
    /// Document covering a scene-space region at 1:1.
    pub fn for_region(region: Rect) -> Self {
        Self {
            size: region.size(),
            transform: Affine::translate((-region.x0, -region.y0)),
            ..Self::default()
        }
    }
}

/// Serialize visible objects to a standalone SVG document.
pub fn scene_to_svg(objects: &[Shape], options: &SvgOptions) -> String {
    let mut writer = SvgWriter::new(options);
    writer.scene(objects);
    writer.finish()
}

/// Incremental SVG document builder.
pub(crate) struct SvgWriter<'a> {
    out: String,
    options: &'a SvgOptions,
}

impl<'a> SvgWriter<'a> {
    pub(crate) fn new(options: &'a SvgOptions) -> Self {
        let Size { width, height } = options.size;
        let mut out = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        if let Some(background) = options.background {
            out.push_str(&format!(
                r#"<rect x="0" y="0" width="{width}" height="{height}"{}/>"#,
                paint_attr("fill", Some(background))
            ));
        }
        Self { out, options }
    }

    /// Write objects through the scene transform.
    pub(crate) fn scene(&mut self, objects: &[Shape]) {
        self.out
            .push_str(&format!(r#"<g transform="{}">"#, matrix(self.options.transform)));
        for shape in objects {
            self.object(shape);
        }
        self.out.push_str("</g>");
    }

    /// Dashed guide lines, given in scene coordinates.
    pub(crate) fn guides(&mut self, guides: &[GuideLine]) {
        let [r, g, b, a] = GUIDE_COLOR;
        let stroke = paint_attr("stroke", Some(SerializableColor::new(r, g, b, a)));
        let [dash, gap] = GUIDE_DASH;
        for guide in guides {
            let start = self.options.transform * guide.start;
            let end = self.options.transform * guide.end;
            self.out.push_str(&format!(
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" fill="none"{stroke} stroke-width="{GUIDE_WIDTH}" stroke-dasharray="{dash} {gap}"/>"#,
                start.x, start.y, end.x, end.y
            ));
        }
    }

    /// Rubber-band selection rectangle, given in scene coordinates.
    pub(crate) fn marquee(&mut self, rect: Rect) {
        let rect = self.options.transform.transform_rect_bbox(rect);
        self.out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}{} stroke-width="1"/>"#,
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height(),
            paint_attr("fill", Some(MARQUEE_FILL)),
            paint_attr("stroke", Some(MARQUEE_STROKE)),
        ));
    }

    pub(crate) fn finish(mut self) -> String {
        self.out.push_str("</svg>");
        self.out
    }

    fn object(&mut self, shape: &Shape) {
        if !shape.visible {
            return;
        }
        match &shape.kind {
            ShapeKind::Group(group) => {
                self.out
                    .push_str(&format!("<g{}>", opacity_attr(shape.style.opacity)));
                for child in &group.children {
                    self.object(child);
                }
                self.out.push_str("</g>");
            }
            ShapeKind::Text(text) => self.text(shape, text),
            ShapeKind::Image(image) => self.image(shape, image),
            ShapeKind::Line(_) | ShapeKind::Path(_) => self.path(shape, None),
            _ => self.path(shape, shape.style.fill),
        }
    }

    fn path(&mut self, shape: &Shape, fill: Option<SerializableColor>) {
        let path = shape.to_path();
        if path.elements().is_empty() {
            return;
        }
        self.out.push_str(&format!(
            r#"<path d="{}"{}/>"#,
            path.to_svg(),
            style_attrs(&shape.style, fill)
        ));
    }

    fn text(&mut self, shape: &Shape, text: &Text) {
        let family = if text.font_family == self.options.fallback_font {
            format!("'{}'", text.font_family)
        } else {
            format!("'{}', '{}'", text.font_family, self.options.fallback_font)
        };
        self.out.push_str(&format!(
            r#"<text xml:space="preserve" transform="{}" font-family="{}" font-size="{}" font-weight="{}"{}>"#,
            matrix(shape.frame.transform()),
            escape_xml(&family),
            text.font_size,
            text.font_weight.css_value(),
            style_attrs(&shape.style, shape.style.fill),
        ));
        for (row, line) in text.lines().enumerate() {
            let x = text.line_offset(line.chars().count());
            let y = row as f64 * text.line_advance() + text.font_size * BASELINE_RATIO;
            self.out.push_str(&format!(
                r#"<tspan x="{x}" y="{y}">{}</tspan>"#,
                escape_xml(line)
            ));
        }
        self.out.push_str("</text>");
    }

    fn image(&mut self, shape: &Shape, image: &Image) {
        let (width, height) = (shape.frame.width, shape.frame.height);
        self.out.push_str(&format!(
            r#"<g transform="{}"{}>"#,
            matrix(shape.frame.transform()),
            opacity_attr(shape.style.opacity)
        ));
        let clip_attr = match &image.clip {
            Some(clip) => {
                let id = format!("clip-{}", shape.id().simple());
                self.out.push_str(&format!(
                    r#"<defs><clipPath id="{id}"><path d="{}"/></clipPath></defs>"#,
                    clip.local_path(width, height).to_svg()
                ));
                format!(r#" clip-path="url(#{id})""#)
            }
            None => String::new(),
        };
        self.out.push_str(&format!(
            r#"<image x="0" y="0" width="{width}" height="{height}" preserveAspectRatio="none"{clip_attr} xlink:href="{}"/>"#,
            image.data_url()
        ));
        self.out.push_str("</g>");
    }
}

fn matrix(affine: Affine) -> String {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    format!("matrix({a} {b} {c} {d} {e} {f})")
}

fn paint_attr(name: &str, color: Option<SerializableColor>) -> String {
    match color {
        Some(color) if color.a < 255 => format!(
            r#" {name}="{}" {name}-opacity="{}""#,
            color.to_hex(),
            color.alpha()
        ),
        Some(color) => format!(r#" {name}="{}""#, color.to_hex()),
        None => format!(r#" {name}="none""#),
    }
}

fn opacity_attr(opacity: f64) -> String {
    if opacity < 1.0 {
        format!(r#" opacity="{}""#, opacity.max(0.0))
    } else {
        String::new()
    }
}

fn style_attrs(style: &ShapeStyle, fill: Option<SerializableColor>) -> String {
    let mut attrs = paint_attr("fill", fill);
    attrs.push_str(&paint_attr("stroke", style.stroke));
    if style.stroke.is_some() {
        attrs.push_str(&format!(
            r#" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round""#,
            style.stroke_width
        ));
    }
    attrs.push_str(&opacity_attr(style.opacity));
    attrs
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
