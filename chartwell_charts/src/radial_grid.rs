// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Radar/polar grid.
//!
//! The grid is drawn around the center of its bounds, either as spokes (one per x category) or
//! as rings (one per y tick, each ring a polygon through the spokes). Consecutive spokes or rings
//! enclose interlace bands that alternate between an even and an odd fill.
//!
//! Three marks are produced: the grid lines, the even bands and the odd bands.

extern crate alloc;

use alloc::vec::Vec;

use chartwell_core::geometry::{standard_angle, to_radians};
use chartwell_core::{
    ConsistencyState, DrawError, Drawable, Invalidatable, Invalidation, Mark, MarkId, Signal,
    Signals, VisualBase,
};
use kurbo::{BezPath, Point, Rect};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::path_mark::{PathMarkSpec, StrokeStyle};
use crate::scale::{GridScale, OrdinalScale, RatioScale};
use crate::theme::{GridLayout, RadarGridTheme};
use crate::z_order;

/// Mark index of the grid lines within the grid's namespace.
pub const LINES_MARK: u32 = 0;
/// Mark index of the even interlace bands.
pub const EVEN_FILL_MARK: u32 = 1;
/// Mark index of the odd interlace bands.
pub const ODD_FILL_MARK: u32 = 2;

/// A radar grid component.
#[derive(Debug)]
pub struct RadialGrid {
    base: VisualBase,
    namespace: u32,
    options: RadarGridTheme,
    is_minor: bool,
    x_scale: Option<OrdinalScale>,
    y_scale: Option<GridScale>,
    center: Point,
    radius: f64,
    inner_radius: f64,
    lines: BezPath,
    even: BezPath,
    odd: BezPath,
    output: Vec<Mark>,
}

impl RadialGrid {
    /// Creates a grid whose marks live in `namespace`.
    pub fn new(namespace: u32, options: RadarGridTheme) -> Self {
        Self {
            base: VisualBase::new(
                ConsistencyState::GridsPosition | ConsistencyState::Appearance,
                Signals::empty(),
            ),
            namespace,
            options,
            is_minor: false,
            x_scale: None,
            y_scale: None,
            center: Point::ZERO,
            radius: 0.0,
            inner_radius: 0.0,
            lines: BezPath::new(),
            even: BezPath::new(),
            odd: BezPath::new(),
            output: Vec::new(),
        }
    }

    /// Shared lifecycle state.
    pub fn base(&self) -> &VisualBase {
        &self.base
    }

    /// Shared lifecycle state, mutably.
    pub fn base_mut(&mut self) -> &mut VisualBase {
        &mut self.base
    }

    /// Current options.
    pub fn options(&self) -> &RadarGridTheme {
        &self.options
    }

    /// Replaces the options, invalidating only what the change affects.
    pub fn set_options(&mut self, options: RadarGridTheme) {
        let old = self.options;
        if old == options {
            return;
        }
        self.options = options;
        let geometry = old.layout != options.layout
            || old.inner_radius != options.inner_radius
            || old.start_angle != options.start_angle
            || old.draw_last_line != options.draw_last_line
            || old.stroke_thickness != options.stroke_thickness;
        let state = if geometry {
            ConsistencyState::GridsPosition
        } else {
            ConsistencyState::Appearance
        };
        self.base.invalidate(state, Signal::NeedsRedraw);
    }

    /// Draws minor rather than major y ticks (circuit layout with a linear y scale).
    pub fn set_minor(&mut self, is_minor: bool) {
        if self.is_minor != is_minor {
            self.is_minor = is_minor;
            self.base
                .invalidate(ConsistencyState::GridsPosition, Signal::NeedsRedraw);
        }
    }

    /// Sets the category scale that places spokes.
    pub fn set_x_scale(&mut self, scale: Option<OrdinalScale>) {
        if self.x_scale != scale {
            self.x_scale = scale;
            self.base
                .invalidate(ConsistencyState::GridsPosition, Signal::NeedsRedraw);
        }
    }

    /// Sets the value scale that places rings.
    pub fn set_y_scale(&mut self, scale: Option<GridScale>) {
        if self.y_scale != scale {
            self.y_scale = scale;
            self.base
                .invalidate(ConsistencyState::GridsPosition, Signal::NeedsRedraw);
        }
    }

    /// Center of the last layout.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Outer and inner radius of the last layout.
    pub fn radii(&self) -> (f64, f64) {
        (self.radius, self.inner_radius)
    }

    fn mark_id(&self, index: u32) -> MarkId {
        MarkId::compose(self.namespace, index)
    }

    fn layout(&mut self, bounds: Rect, x_scale: &OrdinalScale) {
        self.lines = BezPath::new();
        self.even = BezPath::new();
        self.odd = BezPath::new();

        self.radius = bounds.width().min(bounds.height()) / 2.0;
        self.inner_radius = self.options.inner_radius.normalize(self.radius);
        if self.inner_radius == self.radius {
            self.inner_radius -= 1.0;
        }
        self.center = Point::new(
            (bounds.x0 + bounds.width() / 2.0).round(),
            (bounds.y0 + bounds.height() / 2.0).round(),
        );

        match self.options.layout {
            GridLayout::Radial => self.layout_radial(x_scale),
            GridLayout::Circuit => {
                if let Some(y_scale) = self.y_scale.clone() {
                    self.layout_circuit(x_scale, &y_scale);
                }
            }
        }
    }

    fn spoke_angles(&self, x_scale: &OrdinalScale) -> Vec<f64> {
        let start = self.options.start_angle - 90.0;
        x_scale
            .ticks()
            .into_iter()
            .map(|t| standard_angle(start + 360.0 * x_scale.value_to_ratio(t)))
            .collect()
    }

    fn rounded_point(&self, radius: f64, angle: f64) -> Point {
        let rad = to_radians(angle);
        Point::new(
            (self.center.x + radius * rad.cos()).round(),
            (self.center.y + radius * rad.sin()).round(),
        )
    }

    /// Inner end of a spoke: the inner circle, or the exact center without a hole.
    fn spoke_foot(&self, angle: f64) -> Point {
        if self.inner_radius != 0.0 {
            self.rounded_point(self.inner_radius, angle)
        } else {
            self.center
        }
    }

    fn layout_radial(&mut self, x_scale: &OrdinalScale) {
        let angles = self.spoke_angles(x_scale);
        let odd_thickness = self.options.stroke_thickness % 2.0 != 0.0;
        let half = if odd_thickness { 0.5 } else { 0.0 };
        let mut prev: Option<Point> = None;

        for (i, &angle) in angles.iter().enumerate() {
            let (dx, dy) = if angle == 0.0 {
                (0.0, -half)
            } else if angle == 90.0 {
                (-half, 0.0)
            } else if angle == 180.0 {
                (0.0, half)
            } else if angle == 270.0 {
                (half, 0.0)
            } else {
                (0.0, 0.0)
            };
            let tip = self.rounded_point(self.radius, angle);
            let foot = self.spoke_foot(angle);
            if let Some(prev) = prev {
                let band = if i % 2 == 0 { &mut self.even } else { &mut self.odd };
                band.move_to(tip);
                band.line_to(foot);
                band.line_to(prev);
                band.close_path();
            }
            if i > 0 || self.options.draw_last_line {
                self.lines.move_to((tip.x + dx, tip.y + dy));
                self.lines.line_to(foot);
            }
            prev = Some(tip);
        }

        // Close the last band back to the first spoke.
        if let Some(prev) = prev {
            let angle = standard_angle(self.options.start_angle - 90.0);
            let tip = self.rounded_point(self.radius, angle);
            let foot = self.spoke_foot(angle);
            let band = if angles.len() % 2 == 0 {
                &mut self.even
            } else {
                &mut self.odd
            };
            band.move_to(tip);
            band.line_to(foot);
            band.line_to(prev);
            band.close_path();
        }
    }

    fn ring_radius(&self, ratio: f64) -> f64 {
        self.inner_radius + (self.radius - self.inner_radius) * ratio
    }

    fn line_circuit(&mut self, angles: &[f64], ratio: f64) {
        if angles.is_empty() {
            return;
        }
        let radius = self.ring_radius(ratio);
        for (i, &angle) in angles.iter().enumerate() {
            let p = self.rounded_point(radius, angle);
            if i == 0 {
                self.lines.move_to(p);
            } else {
                self.lines.line_to(p);
            }
        }
        let close = self.rounded_point(radius, standard_angle(self.options.start_angle - 90.0));
        self.lines.line_to(close);
    }

    fn interlace_circuit(&mut self, angles: &[f64], ratio: f64, prev_ratio: Option<f64>, even: bool) {
        let Some(prev_ratio) = prev_ratio else {
            return;
        };
        if angles.is_empty() {
            return;
        }
        let start = standard_angle(self.options.start_angle - 90.0);
        let outer = self.ring_radius(ratio);
        let inner = self.ring_radius(prev_ratio);
        let mut band = BezPath::new();
        for (i, &angle) in angles.iter().enumerate() {
            let p = self.rounded_point(outer, angle);
            if i == 0 {
                band.move_to(p);
            } else {
                band.line_to(p);
            }
        }
        band.line_to(self.rounded_point(outer, start));
        band.line_to(self.rounded_point(inner, start));
        for &angle in angles.iter().rev() {
            band.line_to(self.rounded_point(inner, angle));
        }
        band.close_path();
        let target = if even { &mut self.even } else { &mut self.odd };
        target.extend(band);
    }

    fn layout_circuit(&mut self, x_scale: &OrdinalScale, y_scale: &GridScale) {
        let angles = self.spoke_angles(x_scale);
        let ticks = match y_scale {
            GridScale::Ordinal(s) => s.ticks(),
            GridScale::Linear(s) if self.is_minor => s.minor_ticks(),
            GridScale::Linear(s) => s.ticks(),
        };
        let last = ticks.len().saturating_sub(1);
        let mut prev_ratio = None;

        for (i, &tick) in ticks.iter().enumerate() {
            let ratio = y_scale.value_to_ratio(tick);
            let even = i % 2 == 0;
            if i == last {
                self.interlace_circuit(&angles, ratio, prev_ratio, even);
                if let GridScale::Ordinal(s) = y_scale {
                    // The last category band ends at the outer ring.
                    let end = s.transform(tick, 1.0);
                    self.interlace_circuit(&angles, end, Some(ratio), !even);
                    self.line_circuit(&angles, ratio);
                    if self.options.draw_last_line {
                        self.line_circuit(&angles, end);
                    }
                } else if self.options.draw_last_line {
                    self.line_circuit(&angles, ratio);
                }
            } else {
                self.interlace_circuit(&angles, ratio, prev_ratio, even);
                if i > 0 || self.inner_radius != 0.0 {
                    self.line_circuit(&angles, ratio);
                }
            }
            prev_ratio = Some(ratio);
        }
    }

    fn rebuild_marks(&mut self) {
        let z = self.base.z_index();
        let stroke = StrokeStyle::solid(self.options.stroke.brush(), self.options.stroke_thickness);
        self.output = alloc::vec![
            PathMarkSpec::new(self.mark_id(LINES_MARK), self.lines.clone())
                .with_stroke(stroke)
                .with_z_index(z + z_order::GRID_LINES)
                .mark(),
            PathMarkSpec::new(self.mark_id(EVEN_FILL_MARK), self.even.clone())
                .with_fill(self.options.even_fill.brush())
                .with_z_index(z + z_order::GRID_INTERLACE)
                .mark(),
            PathMarkSpec::new(self.mark_id(ODD_FILL_MARK), self.odd.clone())
                .with_fill(self.options.odd_fill.brush())
                .with_z_index(z + z_order::GRID_INTERLACE)
                .mark(),
        ];
    }
}

impl Invalidatable for RadialGrid {
    fn invalidation(&self) -> &Invalidation {
        self.base.invalidation()
    }

    fn invalidation_mut(&mut self) -> &mut Invalidation {
        self.base.invalidation_mut()
    }
}

impl Drawable for RadialGrid {
    fn draw(&mut self) -> Result<bool, DrawError> {
        if !self.base.check_drawing_needed(&mut self.output)? {
            return Ok(false);
        }
        let Some(x_scale) = self.x_scale.clone() else {
            tracing::warn!("radial grid: x scale is not set");
            return Err(DrawError::ScaleNotSet { role: "x" });
        };
        if self.options.layout == GridLayout::Circuit && self.y_scale.is_none() {
            tracing::warn!("radial grid: y scale is not set");
            return Err(DrawError::ScaleNotSet { role: "y" });
        }

        let inv = self.base.invalidation_mut();
        if inv.begin(ConsistencyState::ZIndex) {
            inv.mark_consistent(ConsistencyState::ZIndex);
        }
        if inv.begin(ConsistencyState::Container) {
            inv.mark_consistent(ConsistencyState::Container);
        }

        let position = inv.begin(ConsistencyState::GridsPosition);
        let bounds_dirty = inv.begin(ConsistencyState::Bounds);
        if position || bounds_dirty {
            if let Some(bounds) = self.base.parent_bounds() {
                self.layout(bounds, &x_scale);
            }
            self.base
                .invalidation_mut()
                .mark_consistent(ConsistencyState::GridsPosition | ConsistencyState::Bounds);
        }

        let inv = self.base.invalidation_mut();
        if inv.begin(ConsistencyState::Appearance) {
            inv.mark_consistent(ConsistencyState::Appearance);
        }

        self.rebuild_marks();
        Ok(true)
    }

    fn marks(&self) -> &[Mark] {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use chartwell_core::{ContainerId, MarkPayload};
    use kurbo::{PathEl, Shape};

    use super::*;
    use crate::scale::LinearScale;

    fn grid(layout: GridLayout) -> RadialGrid {
        let mut g = RadialGrid::new(
            1,
            RadarGridTheme {
                layout,
                ..RadarGridTheme::default()
            },
        );
        g.base_mut().set_container(Some(ContainerId(0)));
        g.base_mut()
            .set_parent_bounds(Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        g.set_x_scale(Some(OrdinalScale::new(["a", "b", "c", "d"])));
        g
    }

    fn subpaths(path: &BezPath) -> usize {
        path.elements()
            .iter()
            .filter(|e| matches!(e, PathEl::MoveTo(_)))
            .count()
    }

    fn path_of(g: &RadialGrid, index: u32) -> &BezPath {
        let mark = g
            .marks()
            .iter()
            .find(|m| m.id == MarkId::compose(1, index))
            .expect("grid mark");
        let MarkPayload::Path(p) = &mark.payload else {
            panic!("expected a path payload");
        };
        &p.path
    }

    #[test]
    fn missing_scales_are_reported_and_keep_state_dirty() {
        let mut g = grid(GridLayout::Circuit);
        assert_eq!(g.draw(), Err(DrawError::ScaleNotSet { role: "y" }));
        g.set_x_scale(None);
        assert_eq!(g.draw(), Err(DrawError::ScaleNotSet { role: "x" }));
        assert!(!g.is_consistent(), "failed draws clear nothing");

        g.set_x_scale(Some(OrdinalScale::new(["a", "b"])));
        g.set_y_scale(Some(GridScale::Linear(LinearScale::new(0.0, 10.0))));
        assert_eq!(g.draw(), Ok(true));
        assert!(g.is_consistent());
    }

    #[test]
    fn disabled_grid_draws_nothing_without_scales() {
        let mut g = grid(GridLayout::Circuit);
        g.set_x_scale(None);
        g.base_mut().set_enabled(false);
        assert_eq!(g.draw(), Ok(false));
        assert!(g.marks().is_empty());

        g.base_mut().set_enabled(true);
        assert_eq!(g.draw(), Err(DrawError::ScaleNotSet { role: "x" }));
    }

    #[test]
    fn radial_layout_shifts_axis_aligned_spokes_by_half_a_pixel() {
        let mut g = grid(GridLayout::Radial);
        assert_eq!(g.draw(), Ok(true));
        let lines = path_of(&g, LINES_MARK);
        let starts: Vec<Point> = lines
            .elements()
            .iter()
            .filter_map(|e| match e {
                PathEl::MoveTo(p) => Some(*p),
                _ => None,
            })
            .collect();
        // Spokes at 270°, 0°, 90° and 180°.
        assert_eq!(
            starts,
            [
                Point::new(50.5, 0.0),
                Point::new(100.0, 49.5),
                Point::new(49.5, 100.0),
                Point::new(0.0, 50.5),
            ]
        );
        assert_eq!(subpaths(path_of(&g, EVEN_FILL_MARK)), 2);
        assert_eq!(subpaths(path_of(&g, ODD_FILL_MARK)), 2);
    }

    #[test]
    fn even_thickness_is_not_shifted() {
        let mut g = grid(GridLayout::Radial);
        g.set_options(RadarGridTheme {
            stroke_thickness: 2.0,
            ..*g.options()
        });
        g.draw().unwrap();
        let Some(PathEl::MoveTo(p)) = path_of(&g, LINES_MARK).elements().first() else {
            panic!("expected a move");
        };
        assert_eq!(*p, Point::new(50.0, 0.0));
    }

    #[test]
    fn ordinal_circuit_closes_the_last_band() {
        let mut g = grid(GridLayout::Circuit);
        g.set_y_scale(Some(GridScale::Ordinal(OrdinalScale::new(["lo", "mid", "hi"]))));
        g.draw().unwrap();
        assert_eq!(subpaths(path_of(&g, LINES_MARK)), 3);
        assert_eq!(subpaths(path_of(&g, EVEN_FILL_MARK)), 1);
        assert_eq!(subpaths(path_of(&g, ODD_FILL_MARK)), 2);
        let outer = path_of(&g, LINES_MARK).bounding_box();
        assert_eq!(outer, Rect::new(0.0, 0.0, 100.0, 100.0), "last ring reaches the radius");
    }

    #[test]
    fn second_draw_without_changes_does_nothing() {
        let mut g = grid(GridLayout::Radial);
        assert_eq!(g.draw(), Ok(true));
        assert_eq!(g.draw(), Ok(false));
        g.base_mut().set_z_index(4);
        assert_eq!(g.draw(), Ok(true));
        let lines = g
            .marks()
            .iter()
            .find(|m| m.id == MarkId::compose(1, LINES_MARK))
            .expect("lines mark");
        assert_eq!(lines.z_index, 4 + z_order::GRID_LINES);
    }
}
