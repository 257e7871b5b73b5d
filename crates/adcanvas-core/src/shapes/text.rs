//! Text payload and approximate text metrics.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// CSS/SVG weight keyword.
    pub fn css_value(&self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

/// Horizontal alignment of lines within the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Text-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
    /// Font size in scene units.
    pub font_size: f64,
    pub font_family: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub align: TextAlign,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
}

fn default_line_height() -> f64 {
    Text::DEFAULT_LINE_HEIGHT
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";
    pub const DEFAULT_LINE_HEIGHT: f64 = 1.16;
    /// Content of text objects created by a click on empty canvas.
    pub const PLACEHOLDER: &'static str = "Type here";

    /// Minimum box width so an empty text object still has a caret.
    const MIN_WIDTH: f64 = 2.0;

    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            font_weight: FontWeight::Normal,
            align: TextAlign::Left,
            line_height: Self::DEFAULT_LINE_HEIGHT,
        }
    }

    pub fn with_font(mut self, size: f64, family: impl Into<String>) -> Self {
        self.font_size = size;
        self.font_family = family.into();
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight;
        self
    }

    /// Approximate advance of one character.
    pub fn char_width(&self) -> f64 {
        let ratio = match self.font_weight {
            FontWeight::Normal => 0.55,
            FontWeight::Bold => 0.6,
        };
        self.font_size * ratio
    }

    /// Vertical distance between baselines.
    pub fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Approximate size of the laid-out text.
    pub fn measure(&self) -> Size {
        let widest = self.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let line_count = self.lines().count().max(1);
        Size::new(
            (widest as f64 * self.char_width()).max(Self::MIN_WIDTH),
            line_count as f64 * self.line_advance(),
        )
    }

    /// Horizontal offset of a line of `chars` characters inside the box.
    pub fn line_offset(&self, chars: usize) -> f64 {
        let box_width = self.measure().width;
        let line_width = chars as f64 * self.char_width();
        match self.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => (box_width - line_width) / 2.0,
            TextAlign::Right => box_width - line_width,
        }
    }

    /// Character index nearest to a point in the text's local coordinates.
    pub fn caret_at(&self, local: Point) -> usize {
        let lines: Vec<&str> = self.lines().collect();
        let row = if local.y <= 0.0 {
            0
        } else {
            ((local.y / self.line_advance()) as usize).min(lines.len() - 1)
        };
        let mut index: usize = lines[..row].iter().map(|l| l.chars().count() + 1).sum();
        let len = lines[row].chars().count();
        let x = local.x - self.line_offset(len);
        let column = (x / self.char_width()).round().clamp(0.0, len as f64) as usize;
        index += column;
        index
    }

    /// Local top-left point of the caret at a character index.
    pub fn caret_position(&self, index: usize) -> Point {
        let mut remaining = index.min(self.char_count());
        for (row, line) in self.lines().enumerate() {
            let len = line.chars().count();
            if remaining <= len {
                return Point::new(
                    self.line_offset(len) + remaining as f64 * self.char_width(),
                    row as f64 * self.line_advance(),
                );
            }
            remaining -= len + 1;
        }
        Point::ZERO
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new(Self::PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_single_line() {
        let text = Text::new("Hello").with_font(20.0, "Arial");
        let size = text.measure();
        assert!((size.width - 5.0 * 20.0 * 0.55).abs() < 1e-9);
        assert!((size.height - 20.0 * 1.16).abs() < 1e-9);
    }

    #[test]
    fn test_measure_multiline_uses_widest() {
        let text = Text::new("ab\nabcd").with_font(10.0, "Arial");
        let size = text.measure();
        assert!((size.width - 4.0 * 5.5).abs() < 1e-9);
        assert!((size.height - 2.0 * 11.6).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_has_caret_width() {
        let text = Text::new("");
        assert!(text.measure().width > 0.0);
    }

    #[test]
    fn test_caret_at_click() {
        let text = Text::new("abcd\nef").with_font(10.0, "Arial");
        // Second character boundary on the first line.
        assert_eq!(text.caret_at(Point::new(11.0, 2.0)), 2);
        // Far right of the first line clamps to its end.
        assert_eq!(text.caret_at(Point::new(500.0, 2.0)), 4);
        // Second line starts after the newline.
        assert_eq!(text.caret_at(Point::new(0.0, 15.0)), 5);
        assert_eq!(text.caret_at(Point::new(500.0, 500.0)), 7);
    }

    #[test]
    fn test_caret_position_roundtrip() {
        let text = Text::new("abcd\nef").with_font(10.0, "Arial");
        let pos = text.caret_position(6);
        assert!((pos.x - 5.5).abs() < 1e-9);
        assert!((pos.y - 11.6).abs() < 1e-9);
        assert_eq!(text.caret_at(Point::new(pos.x, pos.y + 1.0)), 6);
    }

    #[test]
    fn test_center_alignment_offset() {
        let mut text = Text::new("ab\nabcd").with_font(10.0, "Arial");
        text.align = TextAlign::Center;
        assert!((text.line_offset(2) - 5.5).abs() < 1e-9);
        assert!(text.line_offset(4).abs() < 1e-9);
    }
}
