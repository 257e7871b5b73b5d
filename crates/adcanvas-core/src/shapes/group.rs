//! Group payload for combining multiple shapes.

use super::{CtaStyle, Shape, union_bounds};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A group owning its children exclusively.
///
/// Children keep scene coordinates, so a group's bounds are the union of its
/// children's bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub children: Vec<Shape>,
    /// Set when the group is a call-to-action button built from a preset.
    #[serde(default)]
    pub cta: Option<CtaStyle>,
}

impl Group {
    pub fn new(children: Vec<Shape>) -> Self {
        Self {
            children,
            cta: None,
        }
    }

    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    /// Dissolve this group and return its children.
    pub fn ungroup(self) -> Vec<Shape> {
        self.children
    }

    /// Union of the children's bounds (zero rect when empty).
    pub fn children_bounds(&self) -> Rect {
        union_bounds(&self.children).unwrap_or(Rect::ZERO)
    }

    /// Scale children's positions and sizes around an anchor point.
    pub(crate) fn rescale_children(&mut self, anchor: Point, ratio_x: f64, ratio_y: f64) {
        for child in &mut self.children {
            let bounds = child.bounds();
            let left = anchor.x + (bounds.x0 - anchor.x) * ratio_x;
            let top = anchor.y + (bounds.y0 - anchor.y) * ratio_y;
            let (sx, sy) = (child.frame.scale_x(), child.frame.scale_y());
            child.set_scale(sx * ratio_x, sy * ratio_y);
            child.move_bounds_to(left, top);
        }
    }

    /// Text label of a call-to-action button.
    pub fn cta_label(&self) -> Option<&str> {
        self.cta.as_ref()?;
        self.children
            .iter()
            .find_map(|c| c.as_text())
            .map(|t| t.content.as_str())
    }
}
