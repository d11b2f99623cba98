// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label text marks.
//!
//! Chart layers place labels as measured boxes. A [`TextMarkSpec`] keeps that box and emits the
//! text at the point of it that matches the anchor, vertically centered, so a renderer honoring
//! [`TextAnchor`] and [`TextBaseline::Middle`] draws the text where layout reserved room for it.

use alloc::string::String;

use chartwell_core::{Mark, MarkId, TextAnchor, TextBaseline};
use kurbo::{Point, Rect};
use peniko::Brush;

/// A label laid out in a box.
#[derive(Clone, Debug)]
pub struct TextMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Laid out label box.
    pub bounds: Rect,
    /// Text content (unshaped).
    pub text: String,
    /// Font size in scene coordinates.
    pub font_size: f64,
    /// Which edge of the box the text hangs from.
    pub anchor: TextAnchor,
    /// Fill paint.
    pub fill: Brush,
    /// Rendering order hint.
    pub z_index: i32,
}

impl TextMarkSpec {
    /// A label filling `bounds`.
    pub fn in_box(id: MarkId, bounds: Rect, text: impl Into<String>, anchor: TextAnchor) -> Self {
        Self {
            id,
            bounds,
            text: text.into(),
            font_size: 12.0,
            anchor,
            fill: Brush::default(),
            z_index: crate::z_order::PIE_LABELS,
        }
    }

    /// A `width` x `height` label hanging off `origin` as `anchor` says.
    pub fn at(
        id: MarkId,
        origin: Point,
        (width, height): (f64, f64),
        text: impl Into<String>,
        anchor: TextAnchor,
    ) -> Self {
        let x0 = match anchor {
            TextAnchor::Start => origin.x,
            TextAnchor::Middle => origin.x - width / 2.0,
            TextAnchor::End => origin.x - width,
        };
        let y0 = origin.y - height / 2.0;
        Self::in_box(id, Rect::new(x0, y0, x0 + width, y0 + height), text, anchor)
    }

    /// Point the text is emitted at.
    pub fn origin(&self) -> Point {
        let x = match self.anchor {
            TextAnchor::Start => self.bounds.x0,
            TextAnchor::Middle => self.bounds.center().x,
            TextAnchor::End => self.bounds.x1,
        };
        Point::new(x, self.bounds.center().y)
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Generates the mark.
    pub fn mark(&self) -> Mark {
        let origin = self.origin();
        Mark::builder(self.id)
            .text()
            .z_index(self.z_index)
            .x_const(origin.x)
            .y_const(origin.y)
            .text_const(self.text.clone())
            .font_size_const(self.font_size)
            .fill_brush_const(self.fill.clone())
            .text_anchor(self.anchor)
            .text_baseline(TextBaseline::Middle)
            .build()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn origin_follows_the_anchor() {
        let pos = Point::new(100.0, 50.0);
        for anchor in [TextAnchor::Start, TextAnchor::Middle, TextAnchor::End] {
            let spec = TextMarkSpec::at(MarkId(1), pos, (40.0, 10.0), "12.5%", anchor);
            assert_eq!(spec.origin(), pos, "{anchor:?}");
            assert_eq!(spec.bounds.size(), kurbo::Size::new(40.0, 10.0));
        }
        let left = TextMarkSpec::at(MarkId(1), pos, (40.0, 10.0), "", TextAnchor::End);
        assert_eq!(left.bounds, Rect::new(60.0, 45.0, 100.0, 55.0));
    }
}
