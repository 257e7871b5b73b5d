//! In-place editing of a text object.

use crate::input::{Key, Modifiers};
use crate::shapes::{ShapeId, Text};

/// Result of handling a key during text editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEditResult {
    /// Key was handled, content may have changed.
    Handled,
    /// Key was handled and editing should end.
    ExitEdit,
    /// Key was not handled (pass to other handlers).
    NotHandled,
}

/// Editing session on one text object. The caret is a character index.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditSession {
    id: ShapeId,
    caret: usize,
    original: String,
}

impl TextEditSession {
    pub fn new(id: ShapeId, text: &Text, caret: usize) -> Self {
        Self {
            id,
            caret: caret.min(text.char_count()),
            original: text.content.clone(),
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Whether the content differs from when editing began.
    pub fn is_changed(&self, text: &Text) -> bool {
        text.content != self.original
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// Place the caret, clamped to the content.
    pub fn set_caret(&mut self, text: &Text, caret: usize) {
        self.caret = caret.min(text.char_count());
    }

    fn byte_index(content: &str, caret: usize) -> usize {
        content
            .char_indices()
            .nth(caret)
            .map_or(content.len(), |(i, _)| i)
    }

    pub fn insert(&mut self, text: &mut Text, input: &str) {
        let at = Self::byte_index(&text.content, self.caret);
        text.content.insert_str(at, input);
        self.caret += input.chars().count();
    }

    /// Remove the character before the caret.
    pub fn backspace(&mut self, text: &mut Text) -> bool {
        if self.caret == 0 {
            return false;
        }
        let at = Self::byte_index(&text.content, self.caret - 1);
        text.content.remove(at);
        self.caret -= 1;
        true
    }

    /// Remove the character after the caret.
    pub fn delete(&mut self, text: &mut Text) -> bool {
        if self.caret >= text.char_count() {
            return false;
        }
        let at = Self::byte_index(&text.content, self.caret);
        text.content.remove(at);
        true
    }

    pub fn move_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    pub fn move_right(&mut self, text: &Text) {
        self.caret = (self.caret + 1).min(text.char_count());
    }

    /// Start of the current line.
    pub fn move_home(&mut self, text: &Text) {
        let before: Vec<char> = text.content.chars().take(self.caret).collect();
        self.caret = before
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |i| i + 1);
    }

    /// End of the current line.
    pub fn move_end(&mut self, text: &Text) {
        let rest = text.content.chars().skip(self.caret);
        let mut caret = self.caret;
        for c in rest {
            if c == '\n' {
                break;
            }
            caret += 1;
        }
        self.caret = caret;
    }

    /// Apply one key press to the text.
    pub fn handle_key(
        &mut self,
        text: &mut Text,
        key: Key,
        modifiers: Modifiers,
    ) -> TextEditResult {
        match key {
            Key::Escape => TextEditResult::ExitEdit,
            Key::Char(_) if modifiers.action() => TextEditResult::NotHandled,
            Key::Char(c) => {
                let mut buf = [0u8; 4];
                self.insert(text, c.encode_utf8(&mut buf));
                TextEditResult::Handled
            }
            Key::Space => {
                self.insert(text, " ");
                TextEditResult::Handled
            }
            Key::Enter => {
                self.insert(text, "\n");
                TextEditResult::Handled
            }
            Key::Backspace => {
                self.backspace(text);
                TextEditResult::Handled
            }
            Key::Delete => {
                self.delete(text);
                TextEditResult::Handled
            }
            Key::Left => {
                self.move_left();
                TextEditResult::Handled
            }
            Key::Right => {
                self.move_right(text);
                TextEditResult::Handled
            }
            Key::Home => {
                self.move_home(text);
                TextEditResult::Handled
            }
            Key::End => {
                self.move_end(text);
                TextEditResult::Handled
            }
            Key::Up | Key::Down => TextEditResult::Handled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session(content: &str, caret: usize) -> (TextEditSession, Text) {
        let text = Text::new(content);
        (TextEditSession::new(Uuid::new_v4(), &text, caret), text)
    }

    #[test]
    fn test_insert_at_caret() {
        let (mut s, mut text) = session("Hlo", 1);
        s.insert(&mut text, "el");
        assert_eq!(text.content, "Hello");
        assert_eq!(s.caret(), 3);
        assert!(s.is_changed(&text));
    }

    #[test]
    fn test_backspace_and_delete() {
        let (mut s, mut text) = session("abc", 1);
        assert!(s.backspace(&mut text));
        assert_eq!(text.content, "bc");
        assert!(!s.backspace(&mut text));
        assert!(s.delete(&mut text));
        assert_eq!(text.content, "c");
    }

    #[test]
    fn test_multibyte_characters() {
        let (mut s, mut text) = session("café", 4);
        s.backspace(&mut text);
        assert_eq!(text.content, "caf");
        s.insert(&mut text, "é!");
        assert_eq!(text.content, "café!");
        assert_eq!(s.caret(), 5);
    }

    #[test]
    fn test_home_end_within_line() {
        let (mut s, text) = session("one\ntwo", 5);
        s.move_home(&text);
        assert_eq!(s.caret(), 4);
        s.move_end(&text);
        assert_eq!(s.caret(), 7);
    }

    #[test]
    fn test_caret_clamped() {
        let (s, _) = session("ab", 10);
        assert_eq!(s.caret(), 2);
    }

    #[test]
    fn test_handle_key() {
        let (mut s, mut text) = session("", 0);
        assert_eq!(
            s.handle_key(&mut text, Key::Char('A'), Modifiers::NONE),
            TextEditResult::Handled
        );
        assert_eq!(
            s.handle_key(&mut text, Key::Char('z'), Modifiers::CTRL),
            TextEditResult::NotHandled
        );
        assert_eq!(
            s.handle_key(&mut text, Key::Escape, Modifiers::NONE),
            TextEditResult::ExitEdit
        );
        assert_eq!(text.content, "A");
        assert_eq!(s.original(), "");
    }
}
