//! The editor: owns the scene and every engine around it.
//!
//! Hosts create one [`Editor`], feed it pointer and key events, and call its
//! operations from panels. All mutation is synchronous; each committed change
//! records exactly one history snapshot and notifies observers.

use crate::acquire::{
    AcquireResult, FontRegistry, ImageRequestSource, ImageTicket, PendingImage, PlacementOptions,
};
use crate::config::EditorConfig;
use crate::events::{EditorEvent, EditorObserver, Observers};
use crate::guides::{GuideEngine, GuideLine};
use crate::history::History;
use crate::input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::scene::{LayerInfo, SceneDocument, SceneError, SceneGraph, SceneResult};
use crate::shapes::{
    CtaPreset, CtaStyle, Image, LoadedImage, SerializableColor, Shape, ShapeId, ShapeKind,
};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::text_edit::{TextEditResult, TextEditSession};
use crate::tools::{
    Cursor, Interaction, Tool, ToolContext, ToolEffects, ToolKind, ToolOption, ToolPointer,
    ToolRegistry,
};
use crate::viewport::{Viewport, WheelOutcome};
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::HashMap;

/// Mask applied to an image object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageCrop {
    /// Largest centered circle.
    Circle,
    /// Full-size rectangle with rounded corners.
    RoundedRect { radius: f64 },
    /// Plain rectangle; removes any mask.
    Rect,
}

/// Pan driven by Space or the middle button instead of the pan tool.
#[derive(Debug, Default)]
struct TemporaryPan {
    space_held: bool,
    dragging: bool,
    /// Interaction state to put back once the pan ends.
    saved: Option<Interaction>,
}

/// Scene editor.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    scene: SceneGraph,
    viewport: Viewport,
    history: History,
    guides: GuideEngine,
    tools: ToolRegistry,
    interaction: Interaction,
    clipboard: Vec<Shape>,
    text_edit: Option<TextEditSession>,
    fonts: FontRegistry,
    pending_images: HashMap<ImageTicket, PendingImage>,
    next_ticket: u64,
    observers: Observers,
    temporary_pan: TemporaryPan,
    needs_render: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with an empty scene and the select tool active.
    ///
    /// A config failing validation is replaced by the defaults.
    pub fn new(config: EditorConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                log::warn!("editor config rejected, using defaults: {err}");
                EditorConfig::default()
            }
        };
        let scene = SceneGraph::new();
        let initial = scene
            .to_json()
            .unwrap_or_else(|_| r#"{"objects":[]}"#.to_string());
        let mut editor = Self {
            viewport: Viewport::from_config(&config),
            history: History::new(initial, config.history_limit),
            guides: GuideEngine::new(config.snap_threshold, config.guide_margin),
            config,
            scene,
            tools: ToolRegistry::with_builtin_tools(),
            interaction: Interaction::default(),
            clipboard: Vec::new(),
            text_edit: None,
            fonts: FontRegistry::new(),
            pending_images: HashMap::new(),
            next_ticket: 0,
            observers: Observers::default(),
            temporary_pan: TemporaryPan::default(),
            needs_render: true,
        };
        editor.set_active_tool(ToolKind::Select);
        editor
    }

    // --- Accessors ---------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Guide lines to draw over the scene.
    pub fn guides(&self) -> &[GuideLine] {
        self.guides.guides()
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn cursor(&self) -> Cursor {
        self.interaction.cursor
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Top-level objects in paint order.
    pub fn objects(&self) -> &[Shape] {
        self.scene.objects()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.scene.find(id)
    }

    pub fn layers(&self) -> Vec<LayerInfo> {
        self.scene.layers()
    }

    pub fn selected_ids(&self) -> &[ShapeId] {
        self.scene.selected_ids()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn text_editing(&self) -> Option<&TextEditSession> {
        self.text_edit.as_ref()
    }

    /// Number of objects waiting to be pasted.
    pub fn clipboard_len(&self) -> usize {
        self.clipboard.len()
    }

    /// Live overlay rectangle of the active tool (marquee), in scene units.
    pub fn overlay_rect(&self) -> Option<Rect> {
        self.tools.active_tool()?.overlay_rect()
    }

    /// Whether something changed since the last call.
    pub fn take_needs_render(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }

    pub fn request_render(&mut self) {
        self.needs_render = true;
    }

    pub fn add_observer(&mut self, observer: impl EditorObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // --- Notifications -----------------------------------------------------

    fn emit_selection(&mut self) {
        let ids = self.scene.selected_ids().to_vec();
        self.observers.emit(EditorEvent::SelectionChanged(ids));
        self.needs_render = true;
    }

    fn emit_objects(&mut self) {
        let layers = self.scene.layers();
        self.observers.emit(EditorEvent::ObjectsChanged(layers));
        self.needs_render = true;
    }

    fn emit_history(&mut self) {
        self.observers.emit(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    fn emit_zoom(&mut self) {
        self.observers.emit(EditorEvent::ZoomChanged(self.viewport.zoom()));
        self.needs_render = true;
    }

    /// Record the live scene as one history step and report the new layers.
    fn commit_change(&mut self) {
        match self.scene.to_json() {
            Ok(snapshot) => {
                if self.history.save_state(snapshot) {
                    self.emit_history();
                }
            }
            Err(err) => log::error!("failed to snapshot scene: {err}"),
        }
        self.emit_objects();
    }

    // --- Tools -------------------------------------------------------------

    /// Run a callback on one tool with a context built from the editor's
    /// fields, then apply whatever effects the tool requested.
    fn with_tool<R>(
        &mut self,
        kind: ToolKind,
        f: impl FnOnce(&mut dyn Tool, &mut ToolContext<'_>) -> R,
    ) -> Option<R> {
        let mut effects = ToolEffects::default();
        let tool = self.tools.get_mut(kind)?;
        let mut ctx = ToolContext {
            scene: &mut self.scene,
            viewport: &mut self.viewport,
            guides: &mut self.guides,
            interaction: &mut self.interaction,
            config: &self.config,
            effects: &mut effects,
        };
        let result = f(tool.as_mut(), &mut ctx);
        self.apply_effects(effects);
        Some(result)
    }

    fn with_active_tool<R>(
        &mut self,
        f: impl FnOnce(&mut dyn Tool, &mut ToolContext<'_>) -> R,
    ) -> Option<R> {
        let kind = self.tools.active()?;
        self.with_tool(kind, f)
    }

    fn apply_effects(&mut self, effects: ToolEffects) {
        if effects.commit {
            self.commit_change();
        } else if effects.objects_changed {
            self.emit_objects();
        }
        if effects.selection_changed {
            self.emit_selection();
        }
        if let Some((id, caret)) = effects.text_edit {
            self.begin_text_edit(id, caret);
        }
        if effects.render {
            self.needs_render = true;
        }
    }

    pub fn active_tool(&self) -> Option<ToolKind> {
        self.tools.active()
    }

    pub fn tool(&self, kind: ToolKind) -> Option<&dyn Tool> {
        self.tools.get(kind)
    }

    /// Switch tools. The outgoing tool is deactivated before the incoming
    /// one activates. Kinds without an instance leave no tool active.
    pub fn set_active_tool(&mut self, kind: ToolKind) -> bool {
        self.exit_text_edit();
        self.with_active_tool(|tool, ctx| tool.deactivate(ctx));
        self.tools.set_active(None);

        if !self.tools.contains(kind) {
            if !kind.is_pass_through() {
                log::warn!("no tool registered for {kind:?}");
            }
            self.needs_render = true;
            return false;
        }
        log::debug!("active tool: {kind:?}");
        self.tools.set_active(Some(kind));
        self.with_tool(kind, |tool, ctx| tool.activate(ctx));
        true
    }

    /// Register a tool under its own kind. Replacing the active tool
    /// deactivates the old instance and activates the new one.
    pub fn register_tool(&mut self, tool: Box<dyn Tool>) {
        let kind = tool.kind();
        let was_active = self.tools.active() == Some(kind);
        if was_active {
            self.with_tool(kind, |old, ctx| old.deactivate(ctx));
        }
        self.tools.register(tool);
        if was_active {
            self.with_tool(kind, |new, ctx| new.activate(ctx));
        }
    }

    /// Reconfigure a tool; affects objects it creates from now on.
    pub fn configure_tool(&mut self, kind: ToolKind, option: ToolOption) -> bool {
        match self.tools.get_mut(kind) {
            Some(tool) => tool.configure(&option),
            None => false,
        }
    }

    // --- Input -------------------------------------------------------------

    fn tool_pointer(&self, screen: Point, button: MouseButton, modifiers: Modifiers) -> ToolPointer {
        ToolPointer {
            screen,
            scene: self.viewport.screen_to_scene(screen),
            button,
            modifiers,
        }
    }

    /// Feed one pointer event from the host surface.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Wheel {
                position,
                delta,
                modifiers,
            } => {
                let base = self.config.wheel_zoom_base;
                match self.viewport.handle_wheel(position, delta, modifiers, base) {
                    WheelOutcome::Zoomed(_) => self.emit_zoom(),
                    WheelOutcome::Panned => self.needs_render = true,
                }
            }
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => {
                if button == MouseButton::Middle || self.temporary_pan.space_held {
                    self.begin_temporary_pan(position);
                    return;
                }
                if button != MouseButton::Left {
                    return;
                }
                let pointer = self.tool_pointer(position, button, modifiers);
                if self.place_caret(pointer.scene) {
                    return;
                }
                self.exit_text_edit();
                self.with_active_tool(|tool, ctx| tool.on_pointer_down(ctx, &pointer));
            }
            PointerEvent::Move {
                position,
                modifiers,
            } => {
                if self.temporary_pan.dragging {
                    if self.viewport.update_pan(position).is_some() {
                        self.needs_render = true;
                    }
                    return;
                }
                let pointer = self.tool_pointer(position, MouseButton::Left, modifiers);
                self.with_active_tool(|tool, ctx| tool.on_pointer_move(ctx, &pointer));
            }
            PointerEvent::Up {
                position,
                button,
                modifiers,
            } => {
                if self.temporary_pan.dragging {
                    self.end_temporary_pan_drag();
                    return;
                }
                let pointer = self.tool_pointer(position, button, modifiers);
                self.with_active_tool(|tool, ctx| tool.on_pointer_up(ctx, &pointer));
            }
            PointerEvent::DoubleClick {
                position,
                modifiers,
            } => {
                let pointer = self.tool_pointer(position, MouseButton::Left, modifiers);
                self.with_active_tool(|tool, ctx| tool.on_double_click(ctx, &pointer));
            }
        }
    }

    fn begin_temporary_pan(&mut self, position: Point) {
        if self.temporary_pan.saved.is_none() {
            self.temporary_pan.saved = Some(self.interaction);
        }
        self.interaction.selection_enabled = false;
        self.interaction.cursor = Cursor::Grabbing;
        self.temporary_pan.dragging = true;
        self.viewport.begin_pan(position);
    }

    fn end_temporary_pan_drag(&mut self) {
        self.viewport.end_pan();
        self.temporary_pan.dragging = false;
        if self.temporary_pan.space_held {
            self.interaction.cursor = Cursor::Grab;
        } else {
            self.restore_after_pan();
        }
    }

    fn restore_after_pan(&mut self) {
        if let Some(saved) = self.temporary_pan.saved.take() {
            self.interaction = saved;
        }
    }

    /// Feed one key event. Returns true when the editor consumed it.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        match event {
            KeyEvent::Down { key, modifiers } => {
                if self.handle_text_key(key, modifiers) == Some(true) {
                    return true;
                }
                if key == Key::Space && !modifiers.action() {
                    if !self.temporary_pan.space_held {
                        self.temporary_pan.space_held = true;
                        if self.temporary_pan.saved.is_none() {
                            self.temporary_pan.saved = Some(self.interaction);
                        }
                        self.interaction.selection_enabled = false;
                        self.interaction.cursor = Cursor::Grab;
                        self.discard_selection();
                    }
                    return true;
                }
                let consumed = self
                    .with_active_tool(|tool, ctx| tool.on_key_down(ctx, key, modifiers))
                    .unwrap_or(false);
                if consumed {
                    return true;
                }
                match ShortcutRegistry::resolve(key, modifiers) {
                    Some(action) => {
                        self.run_shortcut(action);
                        true
                    }
                    None => false,
                }
            }
            KeyEvent::Up {
                key: Key::Space, ..
            } if self.temporary_pan.space_held => {
                self.temporary_pan.space_held = false;
                if !self.temporary_pan.dragging {
                    self.restore_after_pan();
                }
                true
            }
            KeyEvent::Up { .. } => false,
        }
    }

    /// Route a key to the text session. `None` when no session is open.
    fn handle_text_key(&mut self, key: Key, modifiers: Modifiers) -> Option<bool> {
        let session = self.text_edit.as_mut()?;
        let Some(shape) = self.scene.find_mut(session.id()) else {
            self.text_edit = None;
            return None;
        };
        let ShapeKind::Text(text) = &mut shape.kind else {
            self.text_edit = None;
            return None;
        };
        let result = session.handle_key(text, key, modifiers);
        shape.refresh();
        match result {
            TextEditResult::Handled => {
                self.needs_render = true;
                Some(true)
            }
            TextEditResult::ExitEdit => {
                self.exit_text_edit();
                Some(true)
            }
            TextEditResult::NotHandled => Some(false),
        }
    }

    fn run_shortcut(&mut self, action: ShortcutAction) {
        log::debug!("shortcut: {action:?}");
        match action {
            ShortcutAction::Tool(kind, choice) => {
                if let Some(choice) = choice {
                    self.configure_tool(kind, ToolOption::ShapeKind(choice));
                }
                self.set_active_tool(kind);
            }
            ShortcutAction::Undo => {
                if let Err(err) = self.undo() {
                    log::error!("undo failed: {err}");
                }
            }
            ShortcutAction::Redo => {
                if let Err(err) = self.redo() {
                    log::error!("redo failed: {err}");
                }
            }
            ShortcutAction::Copy => {
                self.copy();
            }
            ShortcutAction::Cut => {
                self.cut();
            }
            ShortcutAction::Paste => {
                self.paste();
            }
            ShortcutAction::Duplicate => {
                self.duplicate();
            }
            ShortcutAction::SelectAll => {
                self.select_all();
            }
            ShortcutAction::Group => {
                self.group_selected();
            }
            ShortcutAction::Ungroup => {
                self.ungroup_selected();
            }
            ShortcutAction::Delete => {
                self.remove_selected();
            }
            ShortcutAction::Cancel => self.cancel(),
        }
    }

    /// Abandon the active gesture, or drop the selection when idle.
    pub fn cancel(&mut self) {
        if self.exit_text_edit() {
            return;
        }
        let busy = self.tools.active_tool().is_some_and(|t| t.is_busy());
        if busy {
            self.with_active_tool(|tool, ctx| tool.cancel(ctx));
            self.guides.clear();
            self.needs_render = true;
        } else {
            self.discard_selection();
        }
    }

    // --- Text editing ------------------------------------------------------

    /// Open an editing session on a text object.
    pub fn begin_text_edit(&mut self, id: ShapeId, caret: usize) -> bool {
        if self.text_edit.as_ref().is_some_and(|s| s.id() == id) {
            if let (Some(session), Some(text)) = (
                self.text_edit.as_mut(),
                self.scene.find(id).and_then(Shape::as_text),
            ) {
                session.set_caret(text, caret);
            }
            return true;
        }
        self.exit_text_edit();
        let Some(text) = self.scene.find(id).and_then(Shape::as_text) else {
            return false;
        };
        self.text_edit = Some(TextEditSession::new(id, text, caret));
        self.needs_render = true;
        true
    }

    /// Close the session. Commits once when the content changed.
    pub fn exit_text_edit(&mut self) -> bool {
        let Some(session) = self.text_edit.take() else {
            return false;
        };
        self.needs_render = true;
        let changed = self
            .scene
            .find(session.id())
            .and_then(Shape::as_text)
            .is_some_and(|text| session.is_changed(text));
        if changed {
            self.commit_change();
        }
        true
    }

    /// Insert a string at the caret (IME commits, pasted text).
    pub fn insert_text(&mut self, input: &str) -> bool {
        let Some(session) = self.text_edit.as_mut() else {
            return false;
        };
        let Some(shape) = self.scene.find_mut(session.id()) else {
            return false;
        };
        let ShapeKind::Text(text) = &mut shape.kind else {
            return false;
        };
        session.insert(text, input);
        shape.refresh();
        self.needs_render = true;
        true
    }

    /// Move the caret when a click lands inside the text being edited.
    fn place_caret(&mut self, scene_point: Point) -> bool {
        let Some(session) = self.text_edit.as_mut() else {
            return false;
        };
        let tolerance = 4.0 / self.viewport.zoom();
        let Some(shape) = self.scene.find(session.id()) else {
            return false;
        };
        if !shape.hit_test(scene_point, tolerance) {
            return false;
        }
        let Some(text) = shape.as_text() else {
            return false;
        };
        let caret = text.caret_at(shape.frame.to_local(scene_point));
        session.set_caret(text, caret);
        self.needs_render = true;
        true
    }

    // --- Objects -----------------------------------------------------------

    /// Append an object, select it and commit. Nil or duplicate ids are
    /// replaced with fresh ones.
    pub fn add_object(&mut self, shape: Shape) -> ShapeId {
        let id = self.scene.add(shape);
        log::debug!("added object {id}");
        if self.scene.select(id) {
            self.emit_selection();
        }
        self.commit_change();
        id
    }

    /// Remove every selected object. Returns how many were removed.
    pub fn remove_selected(&mut self) -> usize {
        let ids = self.scene.selected_ids().to_vec();
        if ids.is_empty() {
            return 0;
        }
        self.exit_text_edit();
        let removed = self.scene.remove_many(&ids);
        self.scene.clear_selection();
        self.guides.clear();
        self.emit_selection();
        if !removed.is_empty() {
            self.commit_change();
        }
        removed.len()
    }

    /// Remove one top-level object.
    pub fn remove_object(&mut self, id: ShapeId) -> Option<Shape> {
        if self.text_edit.as_ref().is_some_and(|s| s.id() == id) {
            self.text_edit = None;
        }
        let was_selected = self.scene.is_selected(id);
        let removed = self.scene.remove(id)?;
        if was_selected {
            self.emit_selection();
        }
        self.commit_change();
        Some(removed)
    }

    /// Apply a mutation to any object, nested ones included, and commit it.
    pub fn update_object(
        &mut self,
        id: ShapeId,
        update: impl FnOnce(&mut Shape),
    ) -> SceneResult<()> {
        let root = self
            .scene
            .objects()
            .iter()
            .find(|s| s.find(id).is_some())
            .map(Shape::id)
            .ok_or(SceneError::NotFound(id))?;
        let shape = self.scene.find_mut(id).ok_or(SceneError::NotFound(id))?;
        update(shape);
        shape.refresh();
        if root != id {
            if let Some(root) = self.scene.get_mut(root) {
                root.refresh();
            }
        }

        let selection = self.scene.selected_ids().to_vec();
        if self.scene.set_selection(&selection) {
            self.emit_selection();
        }
        self.guides.clear();
        self.commit_change();
        Ok(())
    }

    pub fn set_visible(&mut self, id: ShapeId, visible: bool) -> SceneResult<()> {
        self.update_object(id, |shape| shape.visible = visible)
    }

    /// Lock or unlock; locking drops the object from the selection.
    pub fn set_locked(&mut self, id: ShapeId, locked: bool) -> SceneResult<()> {
        self.update_object(id, |shape| shape.locked = locked)
    }

    pub fn set_opacity(&mut self, id: ShapeId, opacity: f64) -> SceneResult<()> {
        self.update_object(id, |shape| shape.style.set_opacity(opacity))
    }

    pub fn set_fill(&mut self, id: ShapeId, fill: Option<SerializableColor>) -> SceneResult<()> {
        self.update_object(id, |shape| shape.style.fill = fill)
    }

    pub fn set_stroke(
        &mut self,
        id: ShapeId,
        stroke: Option<SerializableColor>,
        width: f64,
    ) -> SceneResult<()> {
        self.update_object(id, |shape| {
            shape.style.stroke = stroke;
            shape.style.stroke_width = width.max(0.0);
        })
    }

    /// Mask an image object.
    pub fn set_clip(&mut self, id: ShapeId, crop: ImageCrop) -> SceneResult<()> {
        let shape = self.scene.find(id).ok_or(SceneError::NotFound(id))?;
        if shape.as_image().is_none() {
            return Err(SceneError::WrongKind {
                id,
                expected: "an image",
            });
        }
        self.update_object(id, |shape| {
            if let Some(image) = shape.as_image_mut() {
                match crop {
                    ImageCrop::Circle => image.crop_to_circle(),
                    ImageCrop::RoundedRect { radius } => image.crop_to_rounded_rect(radius),
                    ImageCrop::Rect => image.remove_crop(),
                }
            }
        })
    }

    /// Set the fill of every selected object as one step.
    pub fn apply_fill_to_selection(&mut self, fill: Option<SerializableColor>) -> bool {
        self.apply_to_selection(|shape| shape.style.fill = fill)
    }

    /// Set the stroke of every selected object as one step.
    pub fn apply_stroke_to_selection(
        &mut self,
        stroke: Option<SerializableColor>,
        width: f64,
    ) -> bool {
        self.apply_to_selection(|shape| {
            shape.style.stroke = stroke;
            shape.style.stroke_width = width.max(0.0);
        })
    }

    fn apply_to_selection(&mut self, update: impl Fn(&mut Shape)) -> bool {
        let ids = self.scene.selected_ids().to_vec();
        if ids.is_empty() {
            return false;
        }
        for id in ids {
            if let Some(shape) = self.scene.get_mut(id) {
                update(shape);
                shape.refresh();
            }
        }
        self.commit_change();
        true
    }

    /// Owning group of a nested object.
    pub fn parent_of(&self, id: ShapeId) -> Option<ShapeId> {
        self.scene.parent_of(id)
    }

    // --- Selection ---------------------------------------------------------

    /// Select every unlocked top-level object.
    pub fn select_all(&mut self) -> bool {
        let ids: Vec<ShapeId> = self
            .scene
            .objects()
            .iter()
            .filter(|s| !s.locked)
            .map(Shape::id)
            .collect();
        if ids.is_empty() {
            return false;
        }
        let changed = self.scene.set_selection(&ids);
        if changed {
            self.emit_selection();
        }
        changed
    }

    pub fn select(&mut self, id: ShapeId) -> bool {
        let changed = self.scene.select(id);
        if changed {
            self.emit_selection();
        }
        changed
    }

    pub fn add_to_selection(&mut self, id: ShapeId) -> bool {
        if self.scene.is_selected(id) {
            return false;
        }
        let mut ids = self.scene.selected_ids().to_vec();
        ids.push(id);
        let changed = self.scene.set_selection(&ids);
        if changed {
            self.emit_selection();
        }
        changed
    }

    pub fn discard_selection(&mut self) -> bool {
        let changed = self.scene.clear_selection();
        if changed {
            self.emit_selection();
        }
        changed
    }

    // --- Clipboard ---------------------------------------------------------

    /// Copy the selection, replacing the clipboard. Returns the copied count.
    pub fn copy(&mut self) -> usize {
        let copied: Vec<Shape> = self
            .scene
            .objects()
            .iter()
            .filter(|s| self.scene.is_selected(s.id()))
            .cloned()
            .collect();
        if copied.is_empty() {
            return 0;
        }
        log::debug!("copied {} objects", copied.len());
        self.clipboard = copied;
        self.clipboard.len()
    }

    /// Paste the clipboard one offset step further than the last paste.
    /// Every pasted object, group children included, gets a fresh id.
    pub fn paste(&mut self) -> Vec<ShapeId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let offset = Vec2::new(self.config.paste_offset, self.config.paste_offset);
        for shape in &mut self.clipboard {
            shape.translate(offset);
        }
        let mut pasted = Vec::with_capacity(self.clipboard.len());
        for shape in &self.clipboard {
            let mut clone = shape.clone();
            clone.regenerate_ids();
            pasted.push(self.scene.add(clone));
        }
        self.scene.set_selection(&pasted);
        self.emit_selection();
        self.commit_change();
        pasted
    }

    pub fn duplicate(&mut self) -> Vec<ShapeId> {
        if self.copy() == 0 {
            return Vec::new();
        }
        self.paste()
    }

    pub fn cut(&mut self) -> usize {
        if self.copy() == 0 {
            return 0;
        }
        self.remove_selected()
    }

    // --- Z-order -----------------------------------------------------------

    /// Explicit target, or the selection in paint order.
    fn reorder_targets(&self, target: Option<ShapeId>) -> Vec<ShapeId> {
        match target {
            Some(id) => vec![id],
            None => self
                .scene
                .objects()
                .iter()
                .map(Shape::id)
                .filter(|&id| self.scene.is_selected(id))
                .collect(),
        }
    }

    /// Apply a z-order change, committing only when the paint order moved.
    fn reorder(&mut self, apply: impl FnOnce(&mut SceneGraph)) -> bool {
        let order = |scene: &SceneGraph| scene.objects().iter().map(Shape::id).collect::<Vec<_>>();
        let before = order(&self.scene);
        apply(&mut self.scene);
        let changed = order(&self.scene) != before;
        if changed {
            self.commit_change();
        }
        changed
    }

    pub fn bring_forward(&mut self, target: Option<ShapeId>) -> bool {
        let ids = self.reorder_targets(target);
        self.reorder(|scene| {
            scene.bring_forward_many(&ids);
        })
    }

    pub fn send_backward(&mut self, target: Option<ShapeId>) -> bool {
        let ids = self.reorder_targets(target);
        self.reorder(|scene| {
            scene.send_backward_many(&ids);
        })
    }

    pub fn bring_to_front(&mut self, target: Option<ShapeId>) -> bool {
        let ids = self.reorder_targets(target);
        self.reorder(|scene| {
            for id in ids {
                scene.bring_to_front(id);
            }
        })
    }

    pub fn send_to_back(&mut self, target: Option<ShapeId>) -> bool {
        let ids = self.reorder_targets(target);
        self.reorder(|scene| {
            for id in ids.into_iter().rev() {
                scene.send_to_back(id);
            }
        })
    }

    /// Move an object to a paint-order index (layer panel drag).
    pub fn move_to_index(&mut self, id: ShapeId, index: usize) -> bool {
        self.reorder(|scene| {
            scene.move_to_index(id, index);
        })
    }

    // --- Grouping ----------------------------------------------------------

    /// Group the selection (two or more objects) and select the group.
    pub fn group_selected(&mut self) -> Option<ShapeId> {
        let ids = self.scene.selected_ids().to_vec();
        let group = self.scene.group(&ids)?;
        self.scene.select(group);
        self.emit_selection();
        self.commit_change();
        Some(group)
    }

    /// Dissolve every selected group and select the released children.
    pub fn ungroup_selected(&mut self) -> Vec<ShapeId> {
        let groups: Vec<ShapeId> = self
            .scene
            .selected()
            .filter(|s| s.is_group())
            .map(Shape::id)
            .collect();
        if groups.is_empty() {
            return Vec::new();
        }
        let mut children = Vec::new();
        for group in groups {
            if let Some(ids) = self.scene.ungroup(group) {
                children.extend(ids);
            }
        }
        self.scene.set_selection(&children);
        self.emit_selection();
        self.commit_change();
        children
    }

    // --- Call-to-action buttons --------------------------------------------

    /// Add a call-to-action button built from a preset.
    pub fn add_cta(&mut self, label: &str, preset: CtaPreset, position: Option<Point>) -> ShapeId {
        let position = position.unwrap_or(CtaStyle::DEFAULT_POSITION);
        self.add_object(preset.style().build(label, position))
    }

    /// Replace the scene's call-to-action button, keeping its position and
    /// layer, or add one when there is none.
    pub fn replace_cta(&mut self, label: &str, preset: CtaPreset) -> ShapeId {
        let existing = self
            .scene
            .objects()
            .iter()
            .enumerate()
            .find(|(_, s)| s.as_group().is_some_and(|g| g.cta.is_some()))
            .map(|(index, s)| (index, s.id(), s.bounds().origin()));
        let Some((index, id, origin)) = existing else {
            return self.add_cta(label, preset, None);
        };

        let mut button = preset.style().build(label, origin);
        button.set_id(id);
        self.scene.remove(id);
        let id = self.scene.insert(index, button);
        self.scene.select(id);
        self.emit_selection();
        self.commit_change();
        id
    }

    // --- History -----------------------------------------------------------

    /// Step back one snapshot. The target is parsed before anything moves,
    /// so a corrupt snapshot leaves both the stacks and the scene untouched.
    pub fn undo(&mut self) -> SceneResult<bool> {
        self.exit_text_edit();
        let Some(target) = self.history.undo_target() else {
            return Ok(false);
        };
        let document = SceneDocument::from_json(target)?;
        self.history.begin_restore();
        self.history.commit_undo();
        self.restore(document);
        self.history.end_restore();
        self.after_restore();
        Ok(true)
    }

    /// Re-apply the last undone snapshot.
    pub fn redo(&mut self) -> SceneResult<bool> {
        self.exit_text_edit();
        let Some(target) = self.history.redo_target() else {
            return Ok(false);
        };
        let document = SceneDocument::from_json(target)?;
        self.history.begin_restore();
        self.history.commit_redo();
        self.restore(document);
        self.history.end_restore();
        self.after_restore();
        Ok(true)
    }

    fn restore(&mut self, document: SceneDocument) {
        self.with_active_tool(|tool, ctx| tool.cancel(ctx));
        self.guides.clear();
        self.scene.replace_objects(document.objects);
    }

    fn after_restore(&mut self) {
        self.emit_history();
        self.emit_selection();
        self.emit_objects();
    }

    // --- Serialization -----------------------------------------------------

    pub fn to_json(&self) -> SceneResult<String> {
        self.scene.to_json()
    }

    /// Replace the scene with a serialized one, as one undoable step.
    pub fn load_from_json(&mut self, json: &str) -> SceneResult<()> {
        let document = SceneGraph::from(SceneDocument::from_json(json)?).into_document();
        self.text_edit = None;
        self.restore(document);
        log::info!("loaded scene with {} objects", self.scene.len());
        self.emit_selection();
        self.commit_change();
        Ok(())
    }

    // --- Viewport ----------------------------------------------------------

    /// Resize the drawing surface.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.set_size(Size::new(width, height));
        self.needs_render = true;
    }

    /// Zoom around the viewport center; returns the clamped zoom.
    pub fn zoom_to(&mut self, zoom: f64) -> f64 {
        let zoom = self.viewport.zoom_to(zoom);
        self.emit_zoom();
        zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        let zoom = self.viewport.zoom_in(self.config.zoom_step);
        self.emit_zoom();
        zoom
    }

    pub fn zoom_out(&mut self) -> f64 {
        let zoom = self.viewport.zoom_out(self.config.zoom_step);
        self.emit_zoom();
        zoom
    }

    /// Fit all objects on screen; an empty scene resets the view.
    pub fn fit_to_screen(&mut self) -> f64 {
        let zoom = self
            .viewport
            .fit_to_bounds(self.scene.bounds(), self.config.fit_padding);
        self.emit_zoom();
        zoom
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset_view();
        self.emit_zoom();
    }

    /// Pan by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.viewport.pan(delta);
        self.needs_render = true;
    }

    // --- Images and fonts --------------------------------------------------

    /// Register an image request. The host fetches it through an
    /// [`ImageSource`](crate::acquire::ImageSource) and hands the result to
    /// [`complete_image`](Self::complete_image). With a `target`, the result
    /// replaces that image's pixels instead of adding a new object.
    pub fn request_image(
        &mut self,
        source: &ImageRequestSource,
        placement: PlacementOptions,
        target: Option<ShapeId>,
    ) -> ImageTicket {
        let ticket = ImageTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending_images
            .insert(ticket, PendingImage::new(source, placement, target));
        ticket
    }

    pub fn pending_image_count(&self) -> usize {
        self.pending_images.len()
    }

    /// Finish an image request. Returns the object that received the image.
    pub fn complete_image(
        &mut self,
        ticket: ImageTicket,
        result: AcquireResult<LoadedImage>,
    ) -> Option<ShapeId> {
        let Some(pending) = self.pending_images.remove(&ticket) else {
            log::warn!("unknown image ticket {}", ticket.0);
            return None;
        };
        let loaded = match result {
            Ok(loaded) => loaded,
            Err(err) => {
                log::warn!("image {} not loaded: {err}", pending.description);
                self.observers
                    .emit(EditorEvent::AcquisitionFailed(err.to_string()));
                return None;
            }
        };
        let image = Image::from_loaded(&loaded);
        match pending.target {
            Some(target) => self.replace_image(target, image),
            None => Some(self.place_image(image, &pending.placement)),
        }
    }

    fn place_image(&mut self, image: Image, placement: &PlacementOptions) -> ShapeId {
        let mut scale = 1.0;
        if let Some(width) = placement.width {
            scale = image.scale_to_width(width);
        }
        if let Some(height) = placement.height {
            scale = image.scale_to_height(height);
        }
        let mut shape = Shape::image(Point::new(placement.left, placement.top), image);
        shape.set_scale(scale, scale);
        if placement.center_in_viewport {
            let center = self.viewport.scene_center();
            let bounds = shape.bounds();
            shape.move_bounds_to(
                center.x - bounds.width() / 2.0,
                center.y - bounds.height() / 2.0,
            );
        }
        self.add_object(shape)
    }

    /// Swap an image's pixels, keeping its displayed width.
    fn replace_image(&mut self, target: ShapeId, image: Image) -> Option<ShapeId> {
        let Some(shape) = self.scene.find_mut(target) else {
            log::info!("image target {target} was removed before its load finished");
            return None;
        };
        if shape.as_image().is_none() {
            log::warn!("image target {target} is no longer an image");
            return None;
        }
        let displayed_width = shape.frame.scaled_width();
        let scale = image.scale_to_width(displayed_width);
        shape.frame.width = f64::from(image.source_width);
        shape.frame.height = f64::from(image.source_height);
        shape.frame.set_scale(scale, scale);
        shape.kind = ShapeKind::Image(image);
        self.commit_change();
        Some(target)
    }

    /// Whether the host should load this font family before using it.
    pub fn needs_font(&self, family: &str) -> bool {
        self.fonts.needs_load(family)
    }

    /// Record a font load. Texts in that family are re-measured on success.
    pub fn complete_font_load(&mut self, family: &str, result: AcquireResult<()>) {
        self.fonts.complete(family, &result);
        if let Err(err) = result {
            self.observers
                .emit(EditorEvent::AcquisitionFailed(err.to_string()));
            return;
        }
        let affected: Vec<ShapeId> = self
            .scene
            .objects()
            .iter()
            .filter(|s| uses_family(s, family))
            .map(Shape::id)
            .collect();
        for id in affected {
            if let Some(shape) = self.scene.get_mut(id) {
                shape.refresh();
            }
        }
        self.needs_render = true;
    }
}

fn uses_family(shape: &Shape, family: &str) -> bool {
    match &shape.kind {
        ShapeKind::Text(text) => text.font_family == family,
        ShapeKind::Group(group) => group.children.iter().any(|c| uses_family(c, family)),
        _ => false,
    }
}
