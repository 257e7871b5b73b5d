//! Integration tests: tool switching and gestures through the editor.

use adcanvas_core::shapes::{ShapeType, Text};
use adcanvas_core::tools::ShapeChoice;
use adcanvas_core::{
    Cursor, Editor, PointerEvent, Shape, ShapeKind, Tool, ToolContext, ToolKind, ToolOption,
};
use kurbo::{Point, Rect};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) {
    editor.handle_pointer(PointerEvent::down(from.0, from.1));
    editor.handle_pointer(PointerEvent::moved(to.0, to.1));
    editor.handle_pointer(PointerEvent::up(to.0, to.1));
}

// ─── Shape tool ─────────────────────────────────────────────────────────

#[test]
fn tiny_drag_persists_nothing() {
    init();
    let mut editor = Editor::default();
    editor.set_active_tool(ToolKind::Shape);
    drag(&mut editor, (100.0, 100.0), (102.0, 101.0));

    assert!(editor.objects().is_empty());
    assert!(!editor.can_undo());
}

#[test]
fn ellipse_uses_independent_radii() {
    init();
    let mut editor = Editor::default();
    editor.configure_tool(ToolKind::Shape, ToolOption::ShapeKind(ShapeChoice::Ellipse));
    editor.set_active_tool(ToolKind::Shape);
    drag(&mut editor, (0.0, 0.0), (80.0, 40.0));

    let shape = &editor.objects()[0];
    assert_eq!(shape.shape_type(), ShapeType::Ellipse);
    assert_eq!(shape.bounds(), Rect::new(0.0, 0.0, 80.0, 40.0));
}

#[test]
fn configured_fill_applies_to_new_shapes_only() {
    init();
    let mut editor = Editor::default();
    editor.set_active_tool(ToolKind::Shape);
    drag(&mut editor, (0.0, 0.0), (50.0, 50.0));
    let red = adcanvas_core::SerializableColor::new(255, 0, 0, 255);
    editor.configure_tool(ToolKind::Shape, ToolOption::Fill(Some(red)));
    drag(&mut editor, (100.0, 0.0), (150.0, 50.0));

    assert_ne!(editor.objects()[0].style.fill, Some(red));
    assert_eq!(editor.objects()[1].style.fill, Some(red));
}

// ─── Select tool ────────────────────────────────────────────────────────

#[test]
fn marquee_selects_intersecting_unlocked_objects() {
    init();
    let mut editor = Editor::default();
    let a = editor.add_object(Shape::rectangle(Rect::new(10.0, 10.0, 50.0, 50.0)));
    let b = editor.add_object(Shape::rectangle(Rect::new(60.0, 10.0, 100.0, 50.0)));
    let locked = editor.add_object(Shape::rectangle(Rect::new(110.0, 10.0, 150.0, 50.0)));
    editor.set_locked(locked, true).unwrap();
    editor.add_object(Shape::rectangle(Rect::new(400.0, 400.0, 450.0, 450.0)));

    drag(&mut editor, (0.0, 0.0), (200.0, 100.0));
    assert_eq!(editor.selected_ids(), &[a, b]);
}

#[test]
fn locked_object_cannot_be_dragged() {
    init();
    let mut editor = Editor::default();
    let id = editor.add_object(Shape::rectangle(Rect::new(10.0, 10.0, 50.0, 50.0)));
    editor.set_locked(id, true).unwrap();

    drag(&mut editor, (20.0, 20.0), (220.0, 220.0));
    assert_eq!(editor.get(id).unwrap().bounds(), Rect::new(10.0, 10.0, 50.0, 50.0));
}

#[test]
fn double_click_on_text_starts_editing() {
    init();
    let mut editor = Editor::default();
    let id = editor.add_object(Shape::text(Point::new(10.0, 10.0), Text::new("Sale")));

    editor.handle_pointer(PointerEvent::double_click(12.0, 20.0));
    let session = editor.text_editing().unwrap();
    assert_eq!(session.id(), id);
    assert!(session.caret() <= 4);

    editor.insert_text("!!");
    editor.handle_pointer(PointerEvent::down(500.0, 500.0));
    assert!(editor.text_editing().is_none());
    let text = editor.get(id).unwrap().as_text().unwrap();
    assert_eq!(text.content.chars().filter(|&c| c == '!').count(), 2);
}

// ─── Other tools ────────────────────────────────────────────────────────

#[test]
fn pan_tool_moves_viewport_only() {
    init();
    let mut editor = Editor::default();
    let id = editor.add_object(Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 100.0)));
    editor.set_active_tool(ToolKind::Pan);
    assert!(editor.selected_ids().is_empty());
    assert_eq!(editor.cursor(), Cursor::Grab);

    drag(&mut editor, (50.0, 50.0), (80.0, 90.0));
    assert_eq!(editor.viewport().offset(), kurbo::Vec2::new(30.0, 40.0));
    assert_eq!(editor.get(id).unwrap().bounds(), Rect::new(0.0, 0.0, 100.0, 100.0));

    editor.set_active_tool(ToolKind::Select);
    assert!(editor.interaction().selection_enabled);
    assert_eq!(editor.cursor(), Cursor::Default);
}

#[test]
fn draw_tool_creates_path() {
    init();
    let mut editor = Editor::default();
    editor.set_active_tool(ToolKind::Draw);
    editor.handle_pointer(PointerEvent::down(0.0, 0.0));
    editor.handle_pointer(PointerEvent::moved(10.0, 10.0));
    editor.handle_pointer(PointerEvent::moved(20.0, 5.0));
    editor.handle_pointer(PointerEvent::up(30.0, 0.0));

    assert_eq!(editor.objects().len(), 1);
    assert!(matches!(editor.objects()[0].kind, ShapeKind::Path(_)));
    assert!(editor.can_undo());

    editor.set_active_tool(ToolKind::Select);
    assert!(!editor.interaction().drawing_mode);
}

#[test]
fn text_tool_places_placeholder() {
    init();
    let mut editor = Editor::default();
    editor.configure_tool(ToolKind::Text, ToolOption::FontFamily("Georgia".to_string()));
    editor.set_active_tool(ToolKind::Text);
    editor.handle_pointer(PointerEvent::down(100.0, 100.0));

    let text = editor.objects()[0].as_text().unwrap();
    assert_eq!(text.content, "Type here");
    assert_eq!(text.font_family, "Georgia");
    assert_eq!(editor.text_editing().unwrap().caret(), 9);
}

// ─── Activation order ───────────────────────────────────────────────────

type CallLog = Rc<RefCell<Vec<String>>>;

/// Records lifecycle calls into a shared log.
struct RecordingTool {
    kind: ToolKind,
    log: CallLog,
}

impl Tool for RecordingTool {
    fn kind(&self) -> ToolKind {
        self.kind
    }

    fn activate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.log.borrow_mut().push(format!("activate({:?})", self.kind));
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.log.borrow_mut().push(format!("deactivate({:?})", self.kind));
        ctx.restore_defaults();
    }
}

#[test]
fn switching_deactivates_before_activating() {
    init();
    let log: CallLog = Rc::default();
    let mut editor = Editor::default();
    for kind in [ToolKind::Select, ToolKind::Pan, ToolKind::Draw] {
        editor.register_tool(Box::new(RecordingTool {
            kind,
            log: Rc::clone(&log),
        }));
    }
    // Replacing the active select tool activates the new instance.
    assert_eq!(log.borrow().as_slice(), ["activate(Select)"]);
    log.borrow_mut().clear();

    assert!(editor.set_active_tool(ToolKind::Pan));
    assert!(editor.set_active_tool(ToolKind::Draw));

    assert_eq!(
        log.borrow().as_slice(),
        [
            "deactivate(Select)",
            "activate(Pan)",
            "deactivate(Pan)",
            "activate(Draw)",
        ]
    );
    assert_eq!(editor.active_tool(), Some(ToolKind::Draw));
}
