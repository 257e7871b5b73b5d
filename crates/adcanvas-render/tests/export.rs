//! Integration tests: SVG output, raster export and viewport rendering.

use adcanvas_core::shapes::{Image, ImageFormat, LoadedImage};
use adcanvas_core::{Editor, PointerEvent, SerializableColor, Shape};
use adcanvas_render::{ExportOptions, SvgOptions, export_raster, render_viewport, scene_to_svg};
use kurbo::{Point, Rect, Vec2};
use pretty_assertions::assert_eq;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn red_rect(rect: Rect) -> Shape {
    let mut shape = Shape::rectangle(rect);
    shape.style.fill = Some(SerializableColor::new(255, 0, 0, 255));
    shape
}

const RED: [u8; 4] = [255, 0, 0, 255];
const BACKGROUND: [u8; 4] = [0xf0, 0xf0, 0xf0, 0xff];

// ─── Export ─────────────────────────────────────────────────

#[test]
fn export_covers_object_bounds_at_multiplier() {
    init();
    let objects = vec![red_rect(Rect::new(10.0, 10.0, 60.0, 40.0))];
    let options = ExportOptions {
        multiplier: 2.0,
        ..ExportOptions::default()
    };

    let image = export_raster(&objects, &options).unwrap();

    assert_eq!((image.width, image.height), (100, 60));
    assert_eq!(image.pixels.len(), 100 * 60 * 4);
    assert_eq!(image.pixel(50, 30), Some(RED));
}

#[test]
fn export_fills_background_between_objects() {
    init();
    let objects = vec![
        red_rect(Rect::new(0.0, 0.0, 20.0, 20.0)),
        red_rect(Rect::new(80.0, 0.0, 100.0, 20.0)),
    ];
    let options = ExportOptions {
        background: Some(SerializableColor::white()),
        ..ExportOptions::default()
    };

    let image = export_raster(&objects, &options).unwrap();

    assert_eq!((image.width, image.height), (100, 20));
    assert_eq!(image.pixel(10, 10), Some(RED));
    assert_eq!(image.pixel(50, 10), Some([255, 255, 255, 255]));
}

#[test]
fn hidden_objects_are_not_exported() {
    init();
    let mut hidden = red_rect(Rect::new(0.0, 0.0, 40.0, 40.0));
    hidden.visible = false;
    let options = ExportOptions {
        region: Some(Rect::new(0.0, 0.0, 40.0, 40.0)),
        ..ExportOptions::default()
    };

    let image = export_raster(&[hidden], &options).unwrap();

    assert_eq!(image.pixel(20, 20), Some([0, 0, 0, 0]));
}

#[test]
fn export_skips_hidden_objects_when_sizing() {
    init();
    let mut hidden = red_rect(Rect::new(500.0, 500.0, 600.0, 600.0));
    hidden.visible = false;
    let objects = vec![red_rect(Rect::new(0.0, 0.0, 10.0, 10.0)), hidden];

    let image = export_raster(&objects, &ExportOptions::default()).unwrap();

    assert_eq!((image.width, image.height), (10, 10));
}

// ─── SVG ────────────────────────────────────────────────────

#[test]
fn cropped_image_references_its_clip_path() {
    let loaded = LoadedImage {
        bytes: vec![0; 8],
        format: ImageFormat::Png,
        width: 100,
        height: 50,
    };
    let mut image = Image::from_loaded(&loaded);
    image.crop_to_circle();
    let shape = Shape::image(Point::new(0.0, 0.0), image);

    let svg = scene_to_svg(&[shape], &SvgOptions::default());

    assert!(svg.contains("<clipPath id=\"clip-"));
    assert!(svg.contains("clip-path=\"url(#clip-"));
    assert!(svg.contains("xlink:href=\"data:image/png;base64,"));
}

// ─── Viewport ───────────────────────────────────────────────

#[test]
fn viewport_render_uses_viewport_size_and_background() {
    init();
    let editor = Editor::default();

    let image = render_viewport(&editor).unwrap();

    assert_eq!((image.width, image.height), (800, 600));
    assert_eq!(image.pixel(0, 0), Some(BACKGROUND));
}

#[test]
fn viewport_render_follows_pan() {
    init();
    let mut editor = Editor::default();
    editor.add_object(red_rect(Rect::new(0.0, 0.0, 50.0, 50.0)));
    editor.pan(Vec2::new(100.0, 0.0));

    let image = render_viewport(&editor).unwrap();

    assert_eq!(image.pixel(25, 25), Some(BACKGROUND));
    assert_eq!(image.pixel(125, 25), Some(RED));
}

#[test]
fn viewport_render_draws_guides_during_drag() {
    init();
    let mut editor = Editor::default();
    editor.add_object(red_rect(Rect::new(10.0, 10.0, 110.0, 110.0)));
    editor.handle_pointer(PointerEvent::down(50.0, 50.0));
    editor.handle_pointer(PointerEvent::moved(388.0, 287.0));
    assert_eq!(editor.guides().len(), 2);

    let image = render_viewport(&editor).unwrap();
    // First dash of the vertical center guide, well above the object.
    let tinted = (399..=400).any(|x| image.pixel(x, 1).is_some_and(|px| px[1] < 200));
    assert!(tinted, "expected a magenta guide at x = 400");

    editor.handle_pointer(PointerEvent::up(388.0, 287.0));
    let image = render_viewport(&editor).unwrap();
    assert_eq!(image.pixel(400, 1), Some(BACKGROUND));
}

#[test]
fn viewport_render_draws_marquee() {
    init();
    let mut editor = Editor::default();
    editor.handle_pointer(PointerEvent::down(500.0, 100.0));
    editor.handle_pointer(PointerEvent::moved(700.0, 300.0));
    assert!(editor.overlay_rect().is_some());

    let image = render_viewport(&editor).unwrap();

    assert_ne!(image.pixel(600, 200), Some(BACKGROUND));
    assert_eq!(image.pixel(100, 500), Some(BACKGROUND));
}
