//! Integration tests: snapshot history driven through the editor.

use adcanvas_core::{Editor, EditorEvent, Shape};
use kurbo::Rect;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rect(x: f64, y: f64) -> Shape {
    Shape::rectangle(Rect::new(x, y, x + 40.0, y + 40.0))
}

// ─── Round trips ────────────────────────────────────────────────────────

#[test]
fn add_undo_redo_restores_identical_object() {
    init();
    let mut editor = Editor::default();
    let id = editor.add_object(rect(10.0, 20.0));
    let original = editor.get(id).cloned().unwrap();

    assert!(editor.undo().unwrap());
    assert!(editor.objects().is_empty());

    assert!(editor.redo().unwrap());
    assert_eq!(editor.objects().len(), 1);
    assert_eq!(editor.get(id), Some(&original));
}

#[test]
fn undo_at_initial_state_is_noop() {
    init();
    let mut editor = Editor::default();
    assert!(!editor.undo().unwrap());
    assert!(!editor.redo().unwrap());
    assert!(editor.objects().is_empty());
}

#[test]
fn new_commit_discards_redo() {
    init();
    let mut editor = Editor::default();
    editor.add_object(rect(0.0, 0.0));
    editor.undo().unwrap();
    assert!(editor.can_redo());

    editor.add_object(rect(100.0, 0.0));
    assert!(!editor.can_redo());
}

#[test]
fn history_keeps_fifty_snapshots() {
    init();
    let mut editor = Editor::default();
    for i in 0..60 {
        editor.add_object(rect(f64::from(i) * 5.0, 0.0));
    }
    assert_eq!(editor.history().undo_len(), 50);

    let mut undone = 0;
    while editor.undo().unwrap() {
        undone += 1;
    }
    assert_eq!(undone, 49);
    // The oldest surviving snapshot was taken after the eleventh add.
    assert_eq!(editor.objects().len(), 11);
}

#[test]
fn property_edit_is_one_step() {
    init();
    let mut editor = Editor::default();
    let id = editor.add_object(rect(0.0, 0.0));
    editor.set_opacity(id, 0.5).unwrap();
    assert!((editor.get(id).unwrap().style.opacity - 0.5).abs() < f64::EPSILON);

    editor.undo().unwrap();
    assert!((editor.get(id).unwrap().style.opacity - 1.0).abs() < f64::EPSILON);
}

#[test]
fn history_events_follow_undo_and_redo() {
    init();
    let mut editor = Editor::default();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    editor.add_observer(move |event: &EditorEvent| {
        if let EditorEvent::HistoryChanged { can_undo, can_redo } = event {
            sink.borrow_mut().push((*can_undo, *can_redo));
        }
    });

    editor.add_object(rect(0.0, 0.0));
    editor.undo().unwrap();
    editor.redo().unwrap();
    assert_eq!(
        events.borrow().as_slice(),
        &[(true, false), (false, true), (true, false)]
    );
}

// ─── Structural mutations ───────────────────────────────────────────────

#[test]
fn remove_selected_removes_exactly_the_selection() {
    init();
    let mut editor = Editor::default();
    let a = editor.add_object(rect(0.0, 0.0));
    let b = editor.add_object(rect(100.0, 0.0));
    let c = editor.add_object(rect(200.0, 0.0));
    editor.select(a);
    editor.add_to_selection(c);

    assert_eq!(editor.remove_selected(), 2);
    assert_eq!(editor.objects().len(), 1);
    assert_eq!(editor.objects()[0].id(), b);
    assert_eq!(editor.remove_selected(), 0);
}

#[test]
fn deleting_a_group_removes_its_children() {
    init();
    let mut editor = Editor::default();
    let a = editor.add_object(rect(0.0, 0.0));
    let b = editor.add_object(rect(100.0, 0.0));
    editor.select_all();
    let group = editor.group_selected().unwrap();
    assert_eq!(editor.parent_of(a), Some(group));

    editor.remove_selected();
    assert!(editor.objects().is_empty());
    assert!(editor.get(a).is_none());
    assert!(editor.get(b).is_none());
}

#[test]
fn ungroup_is_undoable() {
    init();
    let mut editor = Editor::default();
    editor.add_object(rect(0.0, 0.0));
    editor.add_object(rect(100.0, 0.0));
    editor.select_all();
    editor.group_selected().unwrap();

    let children = editor.ungroup_selected();
    assert_eq!(children.len(), 2);
    assert_eq!(editor.objects().len(), 2);

    editor.undo().unwrap();
    assert_eq!(editor.objects().len(), 1);
    assert!(editor.objects()[0].is_group());
}

#[test]
fn json_round_trip_preserves_scene() {
    init();
    let mut editor = Editor::default();
    editor.add_object(rect(0.0, 0.0));
    editor.add_object(rect(100.0, 0.0));
    editor.select_all();
    editor.group_selected().unwrap();
    let json = editor.to_json().unwrap();

    let mut other = Editor::default();
    other.load_from_json(&json).unwrap();
    assert_eq!(other.objects(), editor.objects());
    assert!(other.load_from_json("{ broken").is_err());
    assert_eq!(other.objects(), editor.objects());
}

#[test]
fn loading_clamps_negative_scale() {
    init();
    let mut editor = Editor::default();
    editor.add_object(rect(0.0, 0.0));
    let json = editor.to_json().unwrap().replace(r#""scale_x":1.0"#, r#""scale_x":-2.0"#);
    assert!(json.contains("-2.0"));

    let mut other = Editor::default();
    other.load_from_json(&json).unwrap();
    assert!(other.objects()[0].frame.scale_x() > 0.0);
}

#[test]
fn loading_regenerates_duplicate_ids() {
    init();
    let mut editor = Editor::default();
    editor.add_object(rect(0.0, 0.0));
    let object = serde_json::to_string(&editor.objects()[0]).unwrap();
    let json = format!(r#"{{"objects":[{object},{object}]}}"#);

    let mut other = Editor::default();
    other.load_from_json(&json).unwrap();

    let ids: Vec<_> = other.objects().iter().map(Shape::id).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}
