// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable-identity marks.
//!
//! A [`Mark`] is one drawable primitive (rectangle, text run or path) with an id that stays the
//! same across draw passes. Components rebuild their marks whenever a dirty state requires it;
//! the [`Scene`](crate::Scene) compares them by id against the previous pass.

use alloc::string::String;

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::Brush;

/// Stable mark identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Wraps a raw id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Builds an id from a component namespace and an index within it.
    pub const fn compose(namespace: u32, index: u32) -> Self {
        Self(((namespace as u64) << 32) | index as u64)
    }

    /// Returns the namespace half of a composed id.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "the shifted value fits in 32 bits"
    )]
    pub const fn namespace(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

/// The primitive kind of a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// Axis-aligned rectangle.
    Rect,
    /// Unshaped text run.
    Text,
    /// Arbitrary path.
    Path,
}

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Text starts at the anchor point.
    #[default]
    Start,
    /// Text is centered on the anchor point.
    Middle,
    /// Text ends at the anchor point.
    End,
}

/// Vertical text baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// The anchor is the vertical middle of the text.
    #[default]
    Middle,
    /// Alphabetic baseline.
    Alphabetic,
    /// Hanging baseline.
    Hanging,
    /// Ideographic baseline.
    Ideographic,
}

/// Rectangle payload.
#[derive(Clone, Debug, PartialEq)]
pub struct RectPayload {
    /// Geometry.
    pub rect: Rect,
    /// Fill paint.
    pub fill: Brush,
}

/// Text payload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPayload {
    /// Anchor position.
    pub pos: Point,
    /// Text content.
    pub text: String,
    /// Font size.
    pub font_size: f64,
    /// Rotation in degrees.
    pub angle: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Fill paint.
    pub fill: Brush,
}

/// Path payload.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPayload {
    /// Geometry.
    pub path: BezPath,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint (ignored when `stroke_width` is 0).
    pub stroke: Brush,
    /// Stroke width.
    pub stroke_width: f64,
}

/// The evaluated visual content of a mark.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// A rectangle.
    Rect(RectPayload),
    /// A text run.
    Text(TextPayload),
    /// A path.
    Path(PathPayload),
}

impl MarkPayload {
    /// Returns the payload's kind.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Rect(_) => MarkKind::Rect,
            Self::Text(_) => MarkKind::Text,
            Self::Path(_) => MarkKind::Path,
        }
    }

    /// Conservative scene bounds, or `None` when they depend on text shaping.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(r.rect.abs()),
            Self::Text(_) => None,
            Self::Path(p) => {
                if p.path.elements().is_empty() {
                    return None;
                }
                let half = 0.5 * p.stroke_width.max(0.0);
                Some(p.path.bounding_box().inflate(half, half))
            }
        }
    }
}

/// A mark: id, paint order and payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Stable id.
    pub id: MarkId,
    /// Paint order; ties break by id.
    pub z_index: i32,
    /// Visual content.
    pub payload: MarkPayload,
}

impl Mark {
    /// Starts building a mark with the given id.
    pub fn builder(id: MarkId) -> MarkBuilder {
        MarkBuilder { id }
    }

    /// Returns the mark's kind.
    pub fn kind(&self) -> MarkKind {
        self.payload.kind()
    }
}

/// Entry point of the mark builder; pick a primitive kind.
#[derive(Clone, Copy, Debug)]
pub struct MarkBuilder {
    id: MarkId,
}

impl MarkBuilder {
    /// Builds a rectangle.
    pub fn rect(self) -> RectMarkBuilder {
        RectMarkBuilder {
            id: self.id,
            z_index: 0,
            rect: Rect::ZERO,
            fill: Brush::default(),
        }
    }

    /// Builds a text run.
    pub fn text(self) -> TextMarkBuilder {
        TextMarkBuilder {
            id: self.id,
            z_index: 0,
            payload: TextPayload {
                pos: Point::ZERO,
                text: String::new(),
                font_size: 12.0,
                angle: 0.0,
                anchor: TextAnchor::Start,
                baseline: TextBaseline::Middle,
                fill: Brush::default(),
            },
        }
    }

    /// Builds a path.
    pub fn path(self) -> PathMarkBuilder {
        PathMarkBuilder {
            id: self.id,
            z_index: 0,
            payload: PathPayload {
                path: BezPath::new(),
                fill: Brush::default(),
                stroke: Brush::default(),
                stroke_width: 0.0,
            },
        }
    }
}

/// Rectangle mark builder.
#[derive(Clone, Debug)]
pub struct RectMarkBuilder {
    id: MarkId,
    z_index: i32,
    rect: Rect,
    fill: Brush,
}

impl RectMarkBuilder {
    /// Sets the paint order.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets the left edge, keeping the width.
    pub fn x_const(mut self, x: f64) -> Self {
        let w = self.rect.width();
        self.rect.x0 = x;
        self.rect.x1 = x + w;
        self
    }

    /// Sets the top edge, keeping the height.
    pub fn y_const(mut self, y: f64) -> Self {
        let h = self.rect.height();
        self.rect.y0 = y;
        self.rect.y1 = y + h;
        self
    }

    /// Sets the width.
    pub fn w_const(mut self, w: f64) -> Self {
        self.rect.x1 = self.rect.x0 + w;
        self
    }

    /// Sets the height.
    pub fn h_const(mut self, h: f64) -> Self {
        self.rect.y1 = self.rect.y0 + h;
        self
    }

    /// Sets the fill paint.
    pub fn fill_brush_const(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        Mark {
            id: self.id,
            z_index: self.z_index,
            payload: MarkPayload::Rect(RectPayload {
                rect: self.rect,
                fill: self.fill,
            }),
        }
    }
}

/// Text mark builder.
#[derive(Clone, Debug)]
pub struct TextMarkBuilder {
    id: MarkId,
    z_index: i32,
    payload: TextPayload,
}

impl TextMarkBuilder {
    /// Sets the paint order.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets the anchor x.
    pub fn x_const(mut self, x: f64) -> Self {
        self.payload.pos.x = x;
        self
    }

    /// Sets the anchor y.
    pub fn y_const(mut self, y: f64) -> Self {
        self.payload.pos.y = y;
        self
    }

    /// Sets the text.
    pub fn text_const(mut self, text: impl Into<String>) -> Self {
        self.payload.text = text.into();
        self
    }

    /// Sets the font size.
    pub fn font_size_const(mut self, font_size: f64) -> Self {
        self.payload.font_size = font_size;
        self
    }

    /// Sets the rotation (degrees).
    pub fn angle_const(mut self, angle: f64) -> Self {
        self.payload.angle = angle;
        self
    }

    /// Sets the horizontal anchor.
    pub fn text_anchor(mut self, anchor: TextAnchor) -> Self {
        self.payload.anchor = anchor;
        self
    }

    /// Sets the baseline.
    pub fn text_baseline(mut self, baseline: TextBaseline) -> Self {
        self.payload.baseline = baseline;
        self
    }

    /// Sets the fill paint.
    pub fn fill_brush_const(mut self, fill: impl Into<Brush>) -> Self {
        self.payload.fill = fill.into();
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        Mark {
            id: self.id,
            z_index: self.z_index,
            payload: MarkPayload::Text(self.payload),
        }
    }
}

/// Path mark builder.
#[derive(Clone, Debug)]
pub struct PathMarkBuilder {
    id: MarkId,
    z_index: i32,
    payload: PathPayload,
}

impl PathMarkBuilder {
    /// Sets the paint order.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets the geometry.
    pub fn path_const(mut self, path: BezPath) -> Self {
        self.payload.path = path;
        self
    }

    /// Sets the fill paint.
    pub fn fill_brush_const(mut self, fill: impl Into<Brush>) -> Self {
        self.payload.fill = fill.into();
        self
    }

    /// Sets the stroke paint.
    pub fn stroke_brush_const(mut self, stroke: impl Into<Brush>) -> Self {
        self.payload.stroke = stroke.into();
        self
    }

    /// Sets the stroke width.
    pub fn stroke_width_const(mut self, width: f64) -> Self {
        self.payload.stroke_width = width;
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        Mark {
            id: self.id,
            z_index: self.z_index,
            payload: MarkPayload::Path(self.payload),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn composed_ids_keep_their_namespace() {
        let id = MarkId::compose(7, 42);
        assert_eq!(id.namespace(), 7);
        assert_eq!(id.0 & 0xffff_ffff, 42);
        assert!(MarkId::compose(7, 0) > MarkId::compose(6, u32::MAX), "namespace dominates");
    }

    #[test]
    fn rect_builder_keeps_size_when_moving() {
        let mark = Mark::builder(MarkId::from_raw(1))
            .rect()
            .w_const(10.0)
            .h_const(4.0)
            .x_const(5.0)
            .y_const(2.0)
            .fill_brush_const(css::TOMATO)
            .build();
        let MarkPayload::Rect(r) = &mark.payload else {
            panic!("expected rect payload");
        };
        assert_eq!(r.rect, Rect::new(5.0, 2.0, 15.0, 6.0));
        assert_eq!(mark.payload.bounds(), Some(r.rect));
    }

    #[test]
    fn empty_paths_have_no_bounds() {
        let mark = Mark::builder(MarkId::from_raw(1)).path().build();
        assert_eq!(mark.kind(), MarkKind::Path);
        assert!(mark.payload.bounds().is_none(), "empty path has no extent");
    }
}
