//! Draw tool: freehand pencil strokes.

use super::{Cursor, Tool, ToolContext, ToolKind, ToolOption, ToolPointer};
use crate::shapes::{SerializableColor, Shape, ShapeStyle};
use kurbo::Point;

/// Points closer than this (scene units) to the previous one are skipped.
const MIN_POINT_SPACING: f64 = 0.5;

#[derive(Debug)]
pub struct DrawTool {
    pub brush_size: f64,
    pub brush_color: SerializableColor,
    points: Vec<Point>,
    active: bool,
}

impl Default for DrawTool {
    fn default() -> Self {
        Self {
            brush_size: 4.0,
            brush_color: SerializableColor::black(),
            points: Vec::new(),
            active: false,
        }
    }
}

impl DrawTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points of the stroke in progress.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl Tool for DrawTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Draw
    }

    fn cursor(&self) -> Cursor {
        Cursor::Crosshair
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.interaction.drawing_mode = true;
        ctx.set_cursor(self.cursor());
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, pointer: &ToolPointer) {
        if !ctx.interaction.drawing_mode {
            return;
        }
        self.points.clear();
        self.points.push(pointer.scene);
        self.active = true;
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, pointer: &ToolPointer) {
        if !self.active {
            return;
        }
        let far_enough = self
            .points
            .last()
            .is_none_or(|last| last.distance(pointer.scene) >= MIN_POINT_SPACING);
        if far_enough {
            self.points.push(pointer.scene);
            ctx.request_render();
        }
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, pointer: &ToolPointer) {
        if !self.active {
            return;
        }
        self.on_pointer_move(ctx, pointer);
        self.active = false;
        let points = std::mem::take(&mut self.points);
        if points.len() < 2 {
            ctx.request_render();
            return;
        }
        let stroke = Shape::freehand(&points).with_style(ShapeStyle {
            fill: None,
            stroke: Some(self.brush_color),
            stroke_width: self.brush_size,
            ..ShapeStyle::default()
        });
        ctx.scene.add(stroke);
        ctx.commit();
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.cancel(ctx);
        ctx.interaction.drawing_mode = false;
        ctx.restore_defaults();
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        if self.active {
            self.active = false;
            self.points.clear();
            ctx.request_render();
        }
    }

    fn is_busy(&self) -> bool {
        self.active
    }

    fn configure(&mut self, option: &ToolOption) -> bool {
        match option {
            ToolOption::BrushSize(size) if *size > 0.0 => self.brush_size = *size,
            ToolOption::BrushColor(color) => self.brush_color = *color,
            _ => return false,
        }
        true
    }
}
