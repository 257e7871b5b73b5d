//! Tool system: exactly one active tool interprets pointer and key input.

mod draw;
mod pan;
mod select;
mod shape;
mod text;

pub use draw::DrawTool;
pub use pan::PanTool;
pub use select::SelectTool;
pub use shape::{ShapeChoice, ShapeTool};
pub use text::TextTool;

use crate::config::EditorConfig;
use crate::guides::GuideEngine;
use crate::input::{Key, Modifiers, MouseButton};
use crate::scene::SceneGraph;
use crate::shapes::{SerializableColor, ShapeId};
use crate::viewport::Viewport;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Shape,
    Text,
    Draw,
    /// Handled by an external generation panel; claims no pointer input.
    AiGenerate,
    /// Handled by an external inpainting panel; claims no pointer input.
    AiInpaint,
}

impl ToolKind {
    /// Kinds that have no tool instance behind them.
    pub fn is_pass_through(self) -> bool {
        matches!(self, ToolKind::AiGenerate | ToolKind::AiInpaint)
    }
}

/// Cursor the host should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Text,
    Grab,
    Grabbing,
    Move,
}

/// Scene-wide interaction flags that tools toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    /// Click and marquee selection allowed.
    pub selection_enabled: bool,
    /// Objects react to pointer input (hit testing, dragging).
    pub interactive: bool,
    /// Freehand drawing captures pointer input.
    pub drawing_mode: bool,
    pub cursor: Cursor,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            selection_enabled: true,
            interactive: true,
            drawing_mode: false,
            cursor: Cursor::Default,
        }
    }
}

/// Live reconfiguration of a tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOption {
    ShapeKind(ShapeChoice),
    Fill(Option<SerializableColor>),
    Stroke(Option<SerializableColor>),
    StrokeWidth(f64),
    BrushSize(f64),
    BrushColor(SerializableColor),
    FontSize(f64),
    FontFamily(String),
}

/// A pointer event resolved into both coordinate spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolPointer {
    pub screen: Point,
    pub scene: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

/// Side effects a tool requests from the editor.
#[derive(Debug, Default)]
pub(crate) struct ToolEffects {
    pub(crate) commit: bool,
    pub(crate) selection_changed: bool,
    pub(crate) objects_changed: bool,
    pub(crate) render: bool,
    pub(crate) text_edit: Option<(ShapeId, usize)>,
}

/// Mutable view of the editor handed to a tool for one callback.
pub struct ToolContext<'a> {
    pub scene: &'a mut SceneGraph,
    pub viewport: &'a mut Viewport,
    pub guides: &'a mut GuideEngine,
    pub interaction: &'a mut Interaction,
    pub config: &'a EditorConfig,
    pub(crate) effects: &'a mut ToolEffects,
}

impl ToolContext<'_> {
    /// Record the current scene as one history step once the callback returns.
    pub fn commit(&mut self) {
        self.effects.commit = true;
        self.effects.objects_changed = true;
        self.effects.render = true;
    }

    pub fn selection_changed(&mut self) {
        self.effects.selection_changed = true;
        self.effects.render = true;
    }

    pub fn objects_changed(&mut self) {
        self.effects.objects_changed = true;
        self.effects.render = true;
    }

    pub fn request_render(&mut self) {
        self.effects.render = true;
    }

    /// Open an in-place text editing session.
    pub fn begin_text_edit(&mut self, id: ShapeId, caret: usize) {
        self.effects.text_edit = Some((id, caret));
        self.effects.render = true;
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.interaction.cursor = cursor;
    }

    /// Hit tolerance in scene units for a few screen pixels of slack.
    pub fn hit_tolerance(&self) -> f64 {
        4.0 / self.viewport.zoom()
    }

    /// Front-most visible, unlocked object under a scene point.
    pub fn hit(&self, point: Point) -> Option<ShapeId> {
        let tolerance = self.hit_tolerance();
        self.scene
            .objects()
            .iter()
            .rev()
            .filter(|s| s.visible && !s.locked)
            .find(|s| s.hit_test(point, tolerance))
            .map(|s| s.id())
    }

    /// Put back default cursor, interactivity and selection; drawing off.
    pub fn restore_defaults(&mut self) {
        *self.interaction = Interaction::default();
    }

    pub(crate) fn clear_selection(&mut self) {
        if self.scene.clear_selection() {
            self.selection_changed();
        }
    }
}

/// Common interface for all tools.
///
/// `deactivate` on the outgoing tool always runs before `activate` on the
/// incoming one.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn cursor(&self) -> Cursor {
        Cursor::Default
    }

    fn activate(&mut self, ctx: &mut ToolContext<'_>);

    /// Abandon any gesture and restore scene-wide defaults.
    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.cancel(ctx);
        ctx.restore_defaults();
    }

    fn on_pointer_down(&mut self, _ctx: &mut ToolContext<'_>, _pointer: &ToolPointer) {}
    fn on_pointer_move(&mut self, _ctx: &mut ToolContext<'_>, _pointer: &ToolPointer) {}
    fn on_pointer_up(&mut self, _ctx: &mut ToolContext<'_>, _pointer: &ToolPointer) {}
    fn on_double_click(&mut self, _ctx: &mut ToolContext<'_>, _pointer: &ToolPointer) {}

    /// Returns true when the key was consumed.
    fn on_key_down(
        &mut self,
        _ctx: &mut ToolContext<'_>,
        _key: Key,
        _modifiers: Modifiers,
    ) -> bool {
        false
    }

    /// Drop an in-progress gesture without committing it.
    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) {}

    /// A gesture is in progress.
    fn is_busy(&self) -> bool {
        false
    }

    /// Rectangle to draw as a live overlay (marquee), in scene coordinates.
    fn overlay_rect(&self) -> Option<Rect> {
        None
    }

    /// Apply a configuration change. Returns false when the option does not
    /// apply to this tool.
    fn configure(&mut self, _option: &ToolOption) -> bool {
        false
    }
}

/// Tool instances keyed by kind, plus the active kind.
pub struct ToolRegistry {
    tools: HashMap<ToolKind, Box<dyn Tool>>,
    active: Option<ToolKind>,
}

impl ToolRegistry {
    /// An empty registry with no active tool.
    pub fn empty() -> Self {
        Self {
            tools: HashMap::new(),
            active: None,
        }
    }

    /// Registry holding the five built-in tools.
    pub fn with_builtin_tools() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(SelectTool::new()));
        registry.register(Box::new(PanTool::new()));
        registry.register(Box::new(ShapeTool::new()));
        registry.register(Box::new(TextTool::new()));
        registry.register(Box::new(DrawTool::new()));
        registry
    }

    /// Register a tool under its own kind, returning any instance it replaces.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Option<Box<dyn Tool>> {
        self.tools.insert(tool.kind(), tool)
    }

    pub fn contains(&self, kind: ToolKind) -> bool {
        self.tools.contains_key(&kind)
    }

    pub fn active(&self) -> Option<ToolKind> {
        self.active
    }

    pub(crate) fn set_active(&mut self, kind: Option<ToolKind>) {
        self.active = kind;
    }

    pub fn get(&self, kind: ToolKind) -> Option<&dyn Tool> {
        self.tools.get(&kind).map(|t| t.as_ref())
    }

    pub(crate) fn get_mut(&mut self, kind: ToolKind) -> Option<&mut Box<dyn Tool>> {
        self.tools.get_mut(&kind)
    }

    pub fn active_tool(&self) -> Option<&dyn Tool> {
        self.get(self.active?)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_builtin_tools()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.tools.keys().collect();
        kinds.sort_by_key(|k| format!("{k:?}"));
        f.debug_struct("ToolRegistry")
            .field("tools", &kinds)
            .field("active", &self.active)
            .finish()
    }
}

/// Shared fixture for tool unit tests.
#[cfg(test)]
pub(crate) mod harness {
    use super::*;

    pub(crate) struct Harness {
        pub scene: SceneGraph,
        pub viewport: Viewport,
        pub guides: GuideEngine,
        pub interaction: Interaction,
        pub config: EditorConfig,
        pub effects: ToolEffects,
    }

    impl Harness {
        pub fn new() -> Self {
            let config = EditorConfig::default();
            Self {
                scene: SceneGraph::new(),
                viewport: Viewport::from_config(&config),
                guides: GuideEngine::default(),
                interaction: Interaction::default(),
                config,
                effects: ToolEffects::default(),
            }
        }

        pub fn ctx(&mut self) -> ToolContext<'_> {
            ToolContext {
                scene: &mut self.scene,
                viewport: &mut self.viewport,
                guides: &mut self.guides,
                interaction: &mut self.interaction,
                config: &self.config,
                effects: &mut self.effects,
            }
        }
    }

    /// Pointer at an untransformed position (screen equals scene).
    pub fn pointer(x: f64, y: f64) -> ToolPointer {
        let position = Point::new(x, y);
        ToolPointer {
            screen: position,
            scene: position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }
}
