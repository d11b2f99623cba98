// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path mark generation.

use chartwell_core::{Mark, MarkId};
use kurbo::BezPath;
use peniko::Brush;
use peniko::color::palette::css;

/// Stroke paint and width.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// A path mark spec.
#[derive(Clone, Debug)]
pub struct PathMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Geometry in scene coordinates.
    pub path: BezPath,
    /// Fill paint.
    pub fill: Brush,
    /// Optional outline stroke.
    pub stroke: Option<StrokeStyle>,
    /// Rendering order hint.
    pub z_index: i32,
}

impl PathMarkSpec {
    /// Creates an unfilled, unstroked path spec.
    pub fn new(id: MarkId, path: BezPath) -> Self {
        Self {
            id,
            path,
            fill: Brush::Solid(peniko::Color::TRANSPARENT),
            stroke: None,
            z_index: 0,
        }
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the outline stroke.
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Generates the mark.
    pub fn mark(&self) -> Mark {
        let mut builder = Mark::builder(self.id)
            .path()
            .path_const(self.path.clone())
            .z_index(self.z_index)
            .fill_brush_const(self.fill.clone());
        if let Some(stroke) = &self.stroke {
            builder = builder
                .stroke_brush_const(stroke.brush.clone())
                .stroke_width_const(stroke.stroke_width);
        }
        builder.build()
    }
}
