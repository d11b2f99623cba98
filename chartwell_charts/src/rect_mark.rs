// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle mark generation.

use chartwell_core::{Mark, MarkId};
use kurbo::Rect;
use peniko::Brush;

/// A rectangle mark spec.
#[derive(Clone, Debug)]
pub struct RectMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Rectangle geometry in scene coordinates.
    pub rect: Rect,
    /// Fill paint.
    pub fill: Brush,
    /// Rendering order hint (`chartwell_core::Mark::z_index`).
    pub z_index: i32,
}

impl RectMarkSpec {
    /// Creates a new rectangle mark spec.
    pub fn new(id: MarkId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            fill: Brush::default(),
            z_index: crate::z_order::GANTT_BARS,
        }
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

    /// Generates the mark. Negative extents are normalized first.
    pub fn mark(&self) -> Mark {
        let rect = self.rect.abs();
        Mark::builder(self.id)
            .rect()
            .z_index(self.z_index)
            .x_const(rect.x0)
            .y_const(rect.y0)
            .w_const(rect.width())
            .h_const(rect.height())
            .fill_brush_const(self.fill.clone())
            .build()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use chartwell_core::MarkPayload;
    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn flipped_rects_are_normalized() {
        let mark = RectMarkSpec::new(MarkId::from_raw(3), Rect::new(10.0, 8.0, 2.0, 4.0))
            .with_fill(css::STEEL_BLUE)
            .mark();
        let MarkPayload::Rect(r) = &mark.payload else {
            panic!("expected rect payload");
        };
        assert_eq!(r.rect, Rect::new(2.0, 4.0, 10.0, 8.0));
    }
}
