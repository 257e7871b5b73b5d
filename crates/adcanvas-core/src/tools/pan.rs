//! Pan tool: drag to move the viewport.

use super::{Cursor, Tool, ToolContext, ToolKind, ToolPointer};

#[derive(Debug, Default)]
pub struct PanTool;

impl PanTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for PanTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pan
    }

    fn cursor(&self) -> Cursor {
        Cursor::Grab
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.interaction.selection_enabled = false;
        ctx.clear_selection();
        ctx.set_cursor(self.cursor());
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, pointer: &ToolPointer) {
        ctx.viewport.begin_pan(pointer.screen);
        ctx.set_cursor(Cursor::Grabbing);
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, pointer: &ToolPointer) {
        if ctx.viewport.update_pan(pointer.screen).is_some() {
            ctx.request_render();
        }
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, _pointer: &ToolPointer) {
        ctx.viewport.end_pan();
        ctx.set_cursor(self.cursor());
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.viewport.end_pan();
    }
}
