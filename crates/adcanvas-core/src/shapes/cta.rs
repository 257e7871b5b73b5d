//! Call-to-action buttons: a rounded background with a centered label.

use super::{
    FontWeight, Frame, Group, Rectangle, SerializableColor, Shape, ShapeKind, ShapeStyle, Text,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Named button styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaPreset {
    Primary,
    Secondary,
    Rounded,
    Outline,
}

impl CtaPreset {
    pub fn all() -> &'static [CtaPreset] {
        &[
            CtaPreset::Primary,
            CtaPreset::Secondary,
            CtaPreset::Rounded,
            CtaPreset::Outline,
        ]
    }

    pub fn style(self) -> CtaStyle {
        let blue = SerializableColor::new(0x25, 0x63, 0xeb, 255);
        let base = CtaStyle {
            background: Some(blue),
            text_color: SerializableColor::white(),
            border_radius: 8.0,
            padding_x: 24.0,
            padding_y: 12.0,
            font_family: "Inter".to_string(),
            font_size: 16.0,
            font_weight: FontWeight::Bold,
        };
        match self {
            CtaPreset::Primary => base,
            CtaPreset::Secondary => CtaStyle {
                background: Some(SerializableColor::white()),
                text_color: blue,
                ..base
            },
            CtaPreset::Rounded => CtaStyle {
                background: Some(SerializableColor::black()),
                border_radius: 24.0,
                padding_x: 32.0,
                ..base
            },
            CtaPreset::Outline => CtaStyle {
                background: None,
                text_color: SerializableColor::black(),
                ..base
            },
        }
    }
}

/// Visual parameters of a call-to-action button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtaStyle {
    /// Background fill; `None` draws an outlined button.
    pub background: Option<SerializableColor>,
    pub text_color: SerializableColor,
    pub border_radius: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
}

impl CtaStyle {
    /// Default top-left corner of a new button.
    pub const DEFAULT_POSITION: Point = Point::new(100.0, 100.0);

    /// Build the button group with its top-left corner at `position`.
    pub fn build(&self, label: &str, position: Point) -> Shape {
        let text = Text::new(label)
            .with_font(self.font_size, self.font_family.clone())
            .with_weight(self.font_weight);
        let text_size = text.measure();
        let width = text_size.width + self.padding_x * 2.0;
        let height = text_size.height + self.padding_y * 2.0;

        let background_style = match self.background {
            Some(fill) => ShapeStyle {
                fill: Some(fill),
                stroke: None,
                stroke_width: 0.0,
                opacity: 1.0,
            },
            None => ShapeStyle {
                fill: None,
                stroke: Some(SerializableColor::black()),
                stroke_width: 2.0,
                opacity: 1.0,
            },
        };
        let background = Shape::new(
            ShapeKind::Rectangle(Rectangle::rounded(self.border_radius)),
            Frame::new(position.x, position.y, width, height),
            background_style,
        );

        let mut label = Shape::text(
            Point::new(position.x + self.padding_x, position.y + self.padding_y),
            text,
        );
        label.style.fill = Some(self.text_color);

        let mut group = Group::new(vec![background, label]);
        group.cta = Some(self.clone());
        Shape::group_from(group)
    }
}
