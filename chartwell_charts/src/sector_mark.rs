// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sector (pie slice) mark generation.

use chartwell_core::geometry::to_radians;
use chartwell_core::{Mark, MarkId};
use kurbo::{BezPath, Circle, Point, Shape};
use peniko::Brush;

use crate::path_mark::{PathMarkSpec, StrokeStyle};

/// A pie or donut slice.
///
/// Angles are in degrees, clockwise from the positive x axis.
#[derive(Clone, Debug)]
pub struct SectorMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Center in scene coordinates.
    pub center: Point,
    /// Inner radius (0 for a pie slice).
    pub inner_radius: f64,
    /// Outer radius.
    pub outer_radius: f64,
    /// Start angle in degrees.
    pub start: f64,
    /// Sweep in degrees.
    pub sweep: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Optional outline stroke.
    pub stroke: Option<StrokeStyle>,
    /// Curve flattening tolerance.
    pub tolerance: f64,
    /// Rendering order hint.
    pub z_index: i32,
}

impl SectorMarkSpec {
    /// Creates a new sector mark spec.
    pub fn new(
        id: MarkId,
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
        start: f64,
        sweep: f64,
    ) -> Self {
        Self {
            id,
            center,
            inner_radius,
            outer_radius,
            start,
            sweep,
            fill: Brush::default(),
            stroke: None,
            tolerance: 0.1,
            z_index: crate::z_order::PIE_SLICES,
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

    /// The slice outline.
    pub fn path(&self) -> BezPath {
        let circle = Circle::new(self.center, self.outer_radius);
        let segment = circle.segment(
            self.inner_radius.max(0.0),
            to_radians(self.start),
            to_radians(self.sweep),
        );
        segment.path_elements(self.tolerance).collect()
    }

    /// Generates the mark.
    pub fn mark(&self) -> Mark {
        let mut spec = PathMarkSpec::new(self.id, self.path())
            .with_fill(self.fill.clone())
            .with_z_index(self.z_index);
        if let Some(stroke) = &self.stroke {
            spec = spec.with_stroke(stroke.clone());
        }
        spec.mark()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use chartwell_core::{MarkDiff, MarkKind, MarkPayload, Scene};
    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn sector_emits_a_path_mark_with_bounds() {
        let sector = SectorMarkSpec::new(
            MarkId::from_raw(1),
            Point::new(50.0, 50.0),
            10.0,
            20.0,
            0.0,
            90.0,
        )
        .with_fill(css::TOMATO)
        .with_stroke(StrokeStyle::solid(css::BLACK, 2.0));

        let mut scene = Scene::new();
        let diffs = scene.tick([sector.mark()]);
        let [MarkDiff::Enter { kind, new, bounds, .. }] = &diffs[..] else {
            panic!("expected a single enter diff");
        };
        assert_eq!(*kind, MarkKind::Path);
        let b = bounds.expect("path bounds");
        assert!(b.x0 >= 49.0 && b.y0 >= 49.0, "quarter slice lies right/below the center");
        assert!(b.x1 <= 71.5 && b.y1 <= 71.5, "{b:?}");

        let MarkPayload::Path(p) = &**new else {
            panic!("expected path payload");
        };
        assert_eq!(p.stroke_width, 2.0);
    }
}
