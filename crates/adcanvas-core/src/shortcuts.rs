//! Keyboard shortcut registry and documentation.

use crate::input::{Key, Modifiers};
use crate::tools::{ShapeChoice, ToolKind};

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Switch tools, optionally choosing the shape tool's primitive.
    Tool(ToolKind, Option<ShapeChoice>),
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    Duplicate,
    SelectAll,
    Group,
    Ungroup,
    Delete,
    Cancel,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: Key, modifiers: Modifiers) -> bool {
        if self.ctrl != modifiers.action() {
            return false;
        }
        // Plain shortcuts ignore shift so caps-lock letters still work.
        if self.ctrl && self.shift != modifiers.shift {
            return false;
        }
        match key {
            Key::Char(c) => {
                let mut buf = [0u8; 4];
                self.key.eq_ignore_ascii_case(c.encode_utf8(&mut buf))
            }
            Key::Delete => self.key == "Delete",
            Key::Backspace => self.key == "Backspace",
            Key::Escape => self.key == "Escape",
            _ => false,
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use ShortcutAction::*;
        vec![
            Shortcut::new("V", false, false, Tool(ToolKind::Select, None), "Select tool"),
            Shortcut::new("H", false, false, Tool(ToolKind::Pan, None), "Pan tool"),
            Shortcut::new(
                "R",
                false,
                false,
                Tool(ToolKind::Shape, Some(ShapeChoice::Rectangle)),
                "Rectangle",
            ),
            Shortcut::new(
                "C",
                false,
                false,
                Tool(ToolKind::Shape, Some(ShapeChoice::Circle)),
                "Circle",
            ),
            Shortcut::new(
                "L",
                false,
                false,
                Tool(ToolKind::Shape, Some(ShapeChoice::Line)),
                "Line",
            ),
            Shortcut::new("T", false, false, Tool(ToolKind::Text, None), "Text tool"),
            Shortcut::new("B", false, false, Tool(ToolKind::Draw, None), "Draw tool"),
            Shortcut::new("Z", true, false, Undo, "Undo"),
            Shortcut::new("Z", true, true, Redo, "Redo"),
            Shortcut::new("C", true, false, Copy, "Copy selection"),
            Shortcut::new("X", true, false, Cut, "Cut selection"),
            Shortcut::new("V", true, false, Paste, "Paste"),
            Shortcut::new("D", true, false, Duplicate, "Duplicate selection"),
            Shortcut::new("A", true, false, SelectAll, "Select all objects"),
            Shortcut::new("G", true, false, Group, "Group selected objects"),
            Shortcut::new("G", true, true, Ungroup, "Ungroup selected group"),
            Shortcut::new("Delete", false, false, Delete, "Delete selected objects"),
            Shortcut::new("Backspace", false, false, Delete, "Delete selected objects"),
            Shortcut::new("Escape", false, false, Cancel, "Cancel current action"),
        ]
    }

    /// Find the action bound to a key press.
    pub fn resolve(key: Key, modifiers: Modifiers) -> Option<ShortcutAction> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, modifiers))
            .map(|s| s.action)
    }

    /// Human-readable list of every shortcut.
    pub fn describe() -> String {
        Self::all()
            .iter()
            .map(|s| format!("{:20} {}", s.format(), s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
