//! CPU rasterization of scenes through usvg, resvg and tiny-skia.

use crate::svg::{SvgOptions, SvgWriter, scene_to_svg};
use adcanvas_core::shapes::union_bounds;
use adcanvas_core::{Editor, SerializableColor, Shape};
use kurbo::{Rect, Size};
use thiserror::Error;

/// Rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Nothing to export")]
    EmptyScene,
    #[error("Invalid output size: {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("Invalid pixel multiplier: {0}")]
    InvalidMultiplier(f64),
    #[error("SVG parse failed: {0}")]
    Svg(#[from] usvg::Error),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Export parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Output pixels per scene unit.
    pub multiplier: f64,
    pub background: Option<SerializableColor>,
    /// Scene region to export; defaults to the bounds of visible objects.
    pub region: Option<Rect>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            background: None,
            region: None,
        }
    }
}

/// An RGBA8 image with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Row-major pixels, four bytes each.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    fn from_pixmap(pixmap: &tiny_skia::Pixmap) -> Self {
        let pixels = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            pixels,
        }
    }

    /// Color at a pixel, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Render objects to a raster image at `options.multiplier` pixels per unit.
pub fn export_raster(objects: &[Shape], options: &ExportOptions) -> RenderResult<RasterImage> {
    if !(options.multiplier.is_finite() && options.multiplier > 0.0) {
        return Err(RenderError::InvalidMultiplier(options.multiplier));
    }
    let region = match options.region {
        Some(region) => region.abs(),
        None => union_bounds(objects.iter().filter(|s| s.visible)).ok_or(RenderError::EmptyScene)?,
    };
    let svg_options = SvgOptions {
        background: options.background,
        ..SvgOptions::for_region(region)
    };
    let svg = scene_to_svg(objects, &svg_options);
    rasterize(&svg, svg_options.size, options.multiplier, &svg_options.fallback_font)
}

/// Render what the editor's viewport shows, with guides and marquee on top.
pub fn render_viewport(editor: &Editor) -> RenderResult<RasterImage> {
    let viewport = editor.viewport();
    let options = SvgOptions {
        size: viewport.size(),
        transform: viewport.transform(),
        background: Some(editor.config().background),
        fallback_font: editor.fonts().fallback().to_string(),
    };
    let mut writer = SvgWriter::new(&options);
    writer.scene(editor.objects());
    writer.guides(editor.guides());
    if let Some(rect) = editor.overlay_rect() {
        writer.marquee(rect);
    }
    rasterize(&writer.finish(), options.size, 1.0, &options.fallback_font)
}

fn rasterize(
    svg: &str,
    size: Size,
    multiplier: f64,
    font_family: &str,
) -> RenderResult<RasterImage> {
    let invalid = || RenderError::InvalidSize {
        width: size.width,
        height: size.height,
    };
    let width = (size.width * multiplier).ceil();
    let height = (size.height * multiplier).ceil();
    if !(width >= 1.0 && height >= 1.0) {
        return Err(invalid());
    }

    let mut opt = usvg::Options::default();
    opt.font_family = font_family.to_string();
    opt.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &opt)?;

    let mut pixmap = tiny_skia::Pixmap::new(width as u32, height as u32).ok_or_else(invalid)?;
    pixmap.fill(tiny_skia::Color::TRANSPARENT);

    let render_ts = tiny_skia::Transform::from_scale(multiplier as f32, multiplier as f32);
    resvg::render(&tree, render_ts, &mut pixmap.as_mut());
    log::debug!("rasterized {}x{} at {multiplier}x", pixmap.width(), pixmap.height());

    Ok(RasterImage::from_pixmap(&pixmap))
}
