//! adcanvas Render Library
//!
//! Turns a scene into SVG and rasterizes it on the CPU, for export and for
//! drawing an editor's viewport with its transient overlays.

mod raster;
mod svg;

pub use raster::{
    ExportOptions, RasterImage, RenderError, RenderResult, export_raster, render_viewport,
};
pub use svg::{SvgOptions, scene_to_svg};
