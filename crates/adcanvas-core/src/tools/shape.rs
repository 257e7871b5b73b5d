//! Shape tool: drag out rectangles, circles, ellipses, triangles and lines.

use super::{Cursor, Tool, ToolContext, ToolKind, ToolOption, ToolPointer};
use crate::shapes::{Frame, SerializableColor, Shape, ShapeId, ShapeStyle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Kind of primitive the shape tool draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeChoice {
    #[default]
    Rectangle,
    Circle,
    Ellipse,
    Triangle,
    Line,
    /// Drawn as a plain line.
    Arrow,
}

#[derive(Debug, Clone, Copy)]
struct Drawing {
    id: ShapeId,
    start: Point,
}

#[derive(Debug)]
pub struct ShapeTool {
    pub choice: ShapeChoice,
    pub fill: Option<SerializableColor>,
    pub stroke: Option<SerializableColor>,
    pub stroke_width: f64,
    drawing: Option<Drawing>,
}

impl Default for ShapeTool {
    fn default() -> Self {
        Self {
            choice: ShapeChoice::Rectangle,
            fill: Some(SerializableColor::new(0x3b, 0x82, 0xf6, 255)),
            stroke: Some(SerializableColor::black()),
            stroke_width: 1.0,
            drawing: None,
        }
    }
}

impl ShapeTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn style(&self) -> ShapeStyle {
        let fill = match self.choice {
            ShapeChoice::Line | ShapeChoice::Arrow => None,
            _ => self.fill,
        };
        ShapeStyle {
            fill,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
            ..ShapeStyle::default()
        }
    }

    /// Zero-size shape anchored at the pointer.
    fn seed(&self, at: Point) -> Shape {
        let collapsed = Rect::from_points(at, at);
        let shape = match self.choice {
            ShapeChoice::Rectangle => Shape::rectangle(collapsed),
            ShapeChoice::Circle => Shape::circle(at, 0.0),
            ShapeChoice::Ellipse => Shape::ellipse(at, 0.0, 0.0),
            ShapeChoice::Triangle => Shape::triangle(collapsed),
            ShapeChoice::Line | ShapeChoice::Arrow => Shape::line(at, at),
        };
        shape.with_style(self.style())
    }

    /// Resize the shape being drawn from the signed drag delta.
    fn resize(&self, shape: &mut Shape, start: Point, current: Point) {
        let width = current.x - start.x;
        let height = current.y - start.y;
        match self.choice {
            ShapeChoice::Rectangle | ShapeChoice::Triangle | ShapeChoice::Ellipse => {
                shape.frame = Frame::from_rect(Rect::from_points(start, current));
            }
            ShapeChoice::Circle => {
                let radius = width.hypot(height) / 2.0;
                let center = start.midpoint(current);
                shape.frame = Frame::new(
                    center.x - radius,
                    center.y - radius,
                    radius * 2.0,
                    radius * 2.0,
                );
            }
            ShapeChoice::Line | ShapeChoice::Arrow => shape.set_line_points(start, current),
        }
    }
}

impl Tool for ShapeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Shape
    }

    fn cursor(&self) -> Cursor {
        Cursor::Crosshair
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.interaction.selection_enabled = false;
        ctx.interaction.interactive = false;
        ctx.set_cursor(self.cursor());
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, pointer: &ToolPointer) {
        if self.drawing.is_some() {
            return;
        }
        let id = ctx.scene.add(self.seed(pointer.scene));
        self.drawing = Some(Drawing {
            id,
            start: pointer.scene,
        });
        ctx.request_render();
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, pointer: &ToolPointer) {
        let Some(drawing) = self.drawing else {
            return;
        };
        if let Some(shape) = ctx.scene.get_mut(drawing.id) {
            self.resize(shape, drawing.start, pointer.scene);
            ctx.request_render();
        }
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, _pointer: &ToolPointer) {
        let Some(drawing) = self.drawing.take() else {
            return;
        };
        let Some(bounds) = ctx.scene.get(drawing.id).map(Shape::bounds) else {
            return;
        };
        let min = ctx.config.min_shape_size;
        if bounds.width() < min && bounds.height() < min {
            log::debug!("discarding {}x{} shape", bounds.width(), bounds.height());
            ctx.scene.remove(drawing.id);
            ctx.request_render();
            return;
        }
        ctx.commit();
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        if let Some(drawing) = self.drawing.take() {
            ctx.scene.remove(drawing.id);
            ctx.request_render();
        }
    }

    fn is_busy(&self) -> bool {
        self.drawing.is_some()
    }

    fn configure(&mut self, option: &ToolOption) -> bool {
        match option {
            ToolOption::ShapeKind(choice) => self.choice = *choice,
            ToolOption::Fill(fill) => self.fill = *fill,
            ToolOption::Stroke(stroke) => self.stroke = *stroke,
            ToolOption::StrokeWidth(width) => self.stroke_width = width.max(0.0),
            _ => return false,
        }
        true
    }
}
