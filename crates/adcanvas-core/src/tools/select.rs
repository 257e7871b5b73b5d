//! Select tool: click and marquee selection, dragging with alignment guides,
//! double-click to edit text.

use super::{Cursor, Tool, ToolContext, ToolKind, ToolPointer};
use crate::guides::SnapFrame;
use crate::shapes::{ShapeId, union_bounds};
use kurbo::{Point, Rect, Vec2};

#[derive(Debug, Clone, Default)]
enum SelectState {
    #[default]
    Idle,
    /// Dragging the selection; `origin` is its box at pointer-down.
    Moving {
        start: Point,
        origin: Rect,
        ids: Vec<ShapeId>,
        moved: bool,
    },
    /// Rubber-band selection from `start` to `current`.
    Marquee {
        start: Point,
        current: Point,
        additive: bool,
    },
}

/// The default pointer tool.
#[derive(Debug, Default)]
pub struct SelectTool {
    state: SelectState,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin_move(&mut self, ctx: &mut ToolContext<'_>, start: Point) {
        let ids = ctx.scene.selected_ids().to_vec();
        let Some(origin) = ctx.scene.selection_bounds() else {
            return;
        };
        ctx.set_cursor(Cursor::Move);
        self.state = SelectState::Moving {
            start,
            origin,
            ids,
            moved: false,
        };
    }

    fn drag_to(
        ctx: &mut ToolContext<'_>,
        pointer: Point,
        start: Point,
        origin: Rect,
        ids: &[ShapeId],
    ) {
        let raw = pointer - start;
        let proposed = origin + raw;

        let others: Vec<Rect> = ctx
            .scene
            .objects()
            .iter()
            .filter(|s| s.visible && !s.locked && !ids.contains(&s.id()))
            .map(|s| s.bounds())
            .collect();
        let frame = SnapFrame {
            canvas_center: ctx.viewport.scene_center(),
            visible: ctx.viewport.visible_scene_rect(),
            zoom: ctx.viewport.zoom(),
        };
        let snap = ctx.guides.snap(proposed, others, &frame);
        let target = proposed.origin() + snap.delta;

        let Some(current) = union_bounds(ids.iter().filter_map(|id| ctx.scene.get(*id))) else {
            return;
        };
        let step = target - current.origin();
        if step == Vec2::ZERO {
            return;
        }
        for id in ids {
            if let Some(shape) = ctx.scene.get_mut(*id) {
                shape.translate(step);
            }
        }
        ctx.request_render();
    }

    /// Put the dragged objects back where the drag began.
    fn restore_origin(ctx: &mut ToolContext<'_>, origin: Rect, ids: &[ShapeId]) {
        let Some(current) = union_bounds(ids.iter().filter_map(|id| ctx.scene.get(*id))) else {
            return;
        };
        let step = origin.origin() - current.origin();
        for id in ids {
            if let Some(shape) = ctx.scene.get_mut(*id) {
                shape.translate(step);
            }
        }
        ctx.guides.clear();
        ctx.request_render();
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        self.state = SelectState::Idle;
        ctx.restore_defaults();
        ctx.set_cursor(self.cursor());
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, pointer: &ToolPointer) {
        if !ctx.interaction.selection_enabled {
            return;
        }
        let hit = if ctx.interaction.interactive {
            ctx.hit(pointer.scene)
        } else {
            None
        };

        match hit {
            Some(id) if pointer.modifiers.shift => {
                if ctx.scene.toggle_selection(id) {
                    ctx.selection_changed();
                }
                if ctx.scene.is_selected(id) {
                    self.begin_move(ctx, pointer.scene);
                }
            }
            Some(id) => {
                if !ctx.scene.is_selected(id) && ctx.scene.select(id) {
                    ctx.selection_changed();
                }
                self.begin_move(ctx, pointer.scene);
            }
            None => {
                if !pointer.modifiers.shift {
                    ctx.clear_selection();
                }
                self.state = SelectState::Marquee {
                    start: pointer.scene,
                    current: pointer.scene,
                    additive: pointer.modifiers.shift,
                };
            }
        }
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, pointer: &ToolPointer) {
        match &mut self.state {
            SelectState::Idle => {}
            SelectState::Moving {
                start,
                origin,
                ids,
                moved,
            } => {
                *moved = true;
                Self::drag_to(ctx, pointer.scene, *start, *origin, ids);
            }
            SelectState::Marquee { current, .. } => {
                *current = pointer.scene;
                ctx.request_render();
            }
        }
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, pointer: &ToolPointer) {
        match std::mem::take(&mut self.state) {
            SelectState::Idle => {}
            SelectState::Moving { moved, .. } => {
                ctx.guides.clear();
                ctx.set_cursor(self.cursor());
                if moved {
                    ctx.commit();
                } else {
                    ctx.request_render();
                }
            }
            SelectState::Marquee {
                start, additive, ..
            } => {
                let rect = Rect::from_points(start, pointer.scene);
                if rect.area() <= 0.0 {
                    ctx.request_render();
                    return;
                }
                let mut ids = if additive {
                    ctx.scene.selected_ids().to_vec()
                } else {
                    Vec::new()
                };
                for id in ctx.scene.selectable_in_rect(rect) {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                if ctx.scene.set_selection(&ids) {
                    ctx.selection_changed();
                } else {
                    ctx.request_render();
                }
            }
        }
    }

    fn on_double_click(&mut self, ctx: &mut ToolContext<'_>, pointer: &ToolPointer) {
        let Some(id) = ctx.hit(pointer.scene) else {
            return;
        };
        let Some(shape) = ctx.scene.get(id) else {
            return;
        };
        let Some(text) = shape.as_text() else {
            return;
        };
        let caret = text.caret_at(shape.frame.to_local(pointer.scene));
        if ctx.scene.select(id) {
            ctx.selection_changed();
        }
        ctx.begin_text_edit(id, caret);
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        if let SelectState::Moving {
            origin,
            ids,
            moved: true,
            ..
        } = &self.state
        {
            Self::restore_origin(ctx, *origin, ids);
        }
        self.state = SelectState::Idle;
        ctx.guides.clear();
    }

    fn is_busy(&self) -> bool {
        !matches!(self.state, SelectState::Idle)
    }

    fn overlay_rect(&self) -> Option<Rect> {
        match self.state {
            SelectState::Marquee { start, current, .. } => Some(Rect::from_points(start, current)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::shapes::{Shape, Text};
    use crate::tools::harness::{Harness, pointer};

    fn with_rects() -> (Harness, ShapeId, ShapeId) {
        let mut h = Harness::new();
        let a = h.scene.add(Shape::rectangle(Rect::new(10.0, 10.0, 60.0, 60.0)));
        let b = h.scene.add(Shape::rectangle(Rect::new(200.0, 10.0, 250.0, 60.0)));
        (h, a, b)
    }

    #[test]
    fn test_click_selects_object() {
        let (mut h, a, _) = with_rects();
        let mut tool = SelectTool::new();
        let p = pointer(30.0, 30.0);
        tool.on_pointer_down(&mut h.ctx(), &p);
        tool.on_pointer_up(&mut h.ctx(), &p);
        assert_eq!(h.scene.selected_ids(), &[a]);
        assert!(h.effects.selection_changed);
        assert!(!h.effects.commit);
    }

    #[test]
    fn test_shift_click_toggles() {
        let (mut h, a, b) = with_rects();
        h.scene.select(a);
        let mut tool = SelectTool::new();
        let mut p = pointer(220.0, 30.0);
        p.modifiers = Modifiers::SHIFT;
        tool.on_pointer_down(&mut h.ctx(), &p);
        tool.on_pointer_up(&mut h.ctx(), &p);
        assert_eq!(h.scene.selected_ids(), &[a, b]);
    }

    #[test]
    fn test_drag_moves_and_commits() {
        let (mut h, a, _) = with_rects();
        let mut tool = SelectTool::new();
        tool.on_pointer_down(&mut h.ctx(), &pointer(30.0, 30.0));
        tool.on_pointer_move(&mut h.ctx(), &pointer(30.0, 130.0));
        tool.on_pointer_up(&mut h.ctx(), &pointer(30.0, 130.0));
        let bounds = h.scene.get(a).unwrap().bounds();
        assert!((bounds.y0 - 110.0).abs() < 1e-9);
        assert!(h.effects.commit);
        assert!(h.guides.guides().is_empty());
    }

    #[test]
    fn test_marquee_selects_intersecting() {
        let (mut h, a, b) = with_rects();
        let locked = h.scene.add(Shape::rectangle(Rect::new(100.0, 10.0, 150.0, 60.0)));
        h.scene.set_locked(locked, true).unwrap();
        let mut tool = SelectTool::new();
        tool.on_pointer_down(&mut h.ctx(), &pointer(0.0, 0.0));
        tool.on_pointer_move(&mut h.ctx(), &pointer(300.0, 100.0));
        assert!(tool.overlay_rect().is_some());
        tool.on_pointer_up(&mut h.ctx(), &pointer(300.0, 100.0));
        assert_eq!(h.scene.selected_ids(), &[a, b]);
        assert!(tool.overlay_rect().is_none());
    }

    #[test]
    fn test_click_empty_clears_selection() {
        let (mut h, a, _) = with_rects();
        h.scene.select(a);
        let mut tool = SelectTool::new();
        let p = pointer(500.0, 500.0);
        tool.on_pointer_down(&mut h.ctx(), &p);
        tool.on_pointer_up(&mut h.ctx(), &p);
        assert!(h.scene.selected_ids().is_empty());
    }

    #[test]
    fn test_double_click_text_enters_editing() {
        let mut h = Harness::new();
        let id = h.scene.add(Shape::text(Point::new(100.0, 100.0), Text::new("Hello")));
        let mut tool = SelectTool::new();
        tool.on_double_click(&mut h.ctx(), &pointer(101.0, 110.0));
        assert_eq!(h.effects.text_edit, Some((id, 0)));
        assert_eq!(h.scene.selected_ids(), &[id]);
    }

    #[test]
    fn test_double_click_non_text_ignored() {
        let (mut h, _, _) = with_rects();
        let mut tool = SelectTool::new();
        tool.on_double_click(&mut h.ctx(), &pointer(30.0, 30.0));
        assert!(h.effects.text_edit.is_none());
    }

    #[test]
    fn test_cancel_restores_position() {
        let (mut h, a, _) = with_rects();
        let mut tool = SelectTool::new();
        tool.on_pointer_down(&mut h.ctx(), &pointer(30.0, 30.0));
        tool.on_pointer_move(&mut h.ctx(), &pointer(90.0, 230.0));
        tool.cancel(&mut h.ctx());
        let bounds = h.scene.get(a).unwrap().bounds();
        assert!((bounds.x0 - 10.0).abs() < 1e-9);
        assert!((bounds.y0 - 10.0).abs() < 1e-9);
        assert!(!tool.is_busy());
    }
}
