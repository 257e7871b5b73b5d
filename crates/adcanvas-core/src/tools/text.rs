//! Text tool: click to place a text object or to edit an existing one.

use super::{Cursor, Tool, ToolContext, ToolKind, ToolOption, ToolPointer};
use crate::shapes::{SerializableColor, Shape, ShapeStyle, Text};

#[derive(Debug)]
pub struct TextTool {
    pub font_size: f64,
    pub font_family: String,
    pub fill: SerializableColor,
}

impl Default for TextTool {
    fn default() -> Self {
        Self {
            font_size: Text::DEFAULT_FONT_SIZE,
            font_family: Text::DEFAULT_FONT_FAMILY.to_string(),
            fill: SerializableColor::black(),
        }
    }
}

impl TextTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for TextTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Text
    }

    fn cursor(&self) -> Cursor {
        Cursor::Text
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.interaction.selection_enabled = false;
        ctx.set_cursor(self.cursor());
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, pointer: &ToolPointer) {
        if let Some(id) = ctx.hit(pointer.scene) {
            let Some(caret) = ctx
                .scene
                .get(id)
                .and_then(Shape::as_text)
                .map(Text::char_count)
            else {
                return;
            };
            if ctx.scene.select(id) {
                ctx.selection_changed();
            }
            ctx.begin_text_edit(id, caret);
            return;
        }

        let text = Text::new(Text::PLACEHOLDER).with_font(self.font_size, self.font_family.clone());
        let caret = text.char_count();
        let shape = Shape::text(pointer.scene, text).with_style(ShapeStyle {
            fill: Some(self.fill),
            ..ShapeStyle::default()
        });
        let id = ctx.scene.add(shape);
        ctx.scene.select(id);
        ctx.selection_changed();
        ctx.commit();
        ctx.begin_text_edit(id, caret);
    }

    fn configure(&mut self, option: &ToolOption) -> bool {
        match option {
            ToolOption::FontSize(size) if *size > 0.0 => self.font_size = *size,
            ToolOption::FontFamily(family) => self.font_family = family.clone(),
            ToolOption::Fill(Some(fill)) => self.fill = *fill,
            _ => return false,
        }
        true
    }
}
