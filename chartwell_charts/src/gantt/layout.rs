// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar geometry of a gantt row.
//!
//! All functions work in scene pixels. Horizontal positions come from ratios of the visible
//! date window: `x = area.x0 + area.width() * ratio`. Edges are rounded to whole pixels and
//! shifted by half a pixel when the stroke thickness is odd, which keeps hairlines crisp.

use kurbo::{BezPath, Point, Rect};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Share of the row height used by plain bars and milestones.
pub const BAR_HEIGHT_RATIO: f64 = 0.7;
/// Share of the row height used by parent brackets.
pub const PARENT_HEIGHT_RATIO: f64 = 0.4;

/// Half-pixel shift for odd stroke thicknesses.
pub(crate) fn pixel_shift(stroke_thickness: f64) -> f64 {
    if stroke_thickness.round() % 2.0 != 0.0 {
        0.5
    } else {
        0.0
    }
}

/// Rounds every edge of `rect` and applies `shift`.
pub(crate) fn fix_bounds(rect: Rect, shift: f64) -> Rect {
    Rect::new(
        rect.x0.round() + shift,
        rect.y0.round() + shift,
        rect.x1.round() + shift,
        rect.y1.round() + shift,
    )
}

/// Horizontal placement of a row's bars.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowFrame {
    /// Left edge of the visible window.
    pub left: f64,
    /// Width of the visible window.
    pub width: f64,
    /// Top of the row.
    pub top: f64,
    /// Height of the row.
    pub height: f64,
    /// See [`pixel_shift`].
    pub shift: f64,
}

impl RowFrame {
    /// Pixel position of a window ratio.
    pub fn x(&self, ratio: f64) -> f64 {
        self.left + self.width * ratio
    }

    /// Unrounded box of a bar of `height` vertically centered in the row.
    fn centered(&self, start_ratio: f64, end_ratio: f64, height: f64) -> Rect {
        let top = self.top + (self.height - height) / 2.0;
        Rect::new(self.x(start_ratio), top, self.x(end_ratio), top + height)
    }

    /// A plain bar at [`BAR_HEIGHT_RATIO`] of the row.
    pub fn plain_bar(&self, start_ratio: f64, end_ratio: f64) -> Rect {
        fix_bounds(
            self.centered(start_ratio, end_ratio, self.height * BAR_HEIGHT_RATIO),
            self.shift,
        )
    }

    /// A parent bracket's box: top aligned with plain bars, [`PARENT_HEIGHT_RATIO`] high.
    ///
    /// A zero-width parent is widened to its height, centered on its date.
    pub fn parent_bar(&self, start_ratio: f64, end_ratio: f64) -> Rect {
        let height = self.height * PARENT_HEIGHT_RATIO;
        let top = self.top + self.height * (1.0 - BAR_HEIGHT_RATIO) / 2.0;
        let mut left = self.x(start_ratio);
        let mut right = self.x(end_ratio);
        if right - left == 0.0 {
            left -= height / 2.0;
            right = left + height;
        }
        fix_bounds(Rect::new(left, top, right, top + height), self.shift)
    }

    /// A milestone diamond's box, centered on its date.
    pub fn milestone(&self, ratio: f64) -> Rect {
        let half = (self.height * BAR_HEIGHT_RATIO / 2.0).round();
        let center = Point::new(
            self.x(ratio).round() + self.shift,
            (self.top + self.height / 2.0).round() + self.shift,
        );
        Rect::new(center.x - half, center.y - half, center.x + half, center.y + half)
    }

    /// The actual and the planned bar of a baseline row, each half of a plain bar.
    ///
    /// With `baseline_above` the planned bar takes the upper half.
    pub fn baseline_pair(
        &self,
        actual: (f64, f64),
        planned: (f64, f64),
        baseline_above: bool,
    ) -> (Rect, Rect) {
        let height = self.height * BAR_HEIGHT_RATIO;
        let half = height / 2.0;
        let upper = self.top + (self.height - height) / 2.0;
        let (actual_top, planned_top) = if baseline_above {
            (upper + half, upper)
        } else {
            (upper, upper + half)
        };
        let actual = Rect::new(self.x(actual.0), actual_top, self.x(actual.1), actual_top + half);
        let planned = Rect::new(
            self.x(planned.0),
            planned_top,
            self.x(planned.1),
            planned_top + half,
        );
        (fix_bounds(actual, self.shift), fix_bounds(planned, self.shift))
    }
}

/// Visible part test of a bar spanning window ratios `start..end`.
pub(crate) fn is_visible(start_ratio: f64, end_ratio: f64) -> bool {
    end_ratio > 0.0 && start_ratio < 1.0
}

/// The completed part of `bar`.
pub(crate) fn progress_bar(bar: Rect, progress: f64) -> Rect {
    let progress = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
    Rect::new(bar.x0, bar.y0, bar.x0 + bar.width() * progress, bar.y1)
}

/// The summary bracket inside `bounds`: a full-width band with a leg at each end.
pub(crate) fn bracket_path(bounds: Rect) -> BezPath {
    let (l, t, r, b) = (bounds.x0, bounds.y0, bounds.x1, bounds.y1);
    let depth = (bounds.height() / 2.0).min(bounds.width() / 2.0);
    let middle = t + bounds.height() / 2.0;
    let mut path = BezPath::new();
    path.move_to((l, t));
    path.line_to((r, t));
    path.line_to((r, b));
    path.line_to((r - depth, middle));
    path.line_to((l + depth, middle));
    path.line_to((l, b));
    path.line_to((l, t));
    path.close_path();
    path
}

/// A diamond inscribed in `bounds`.
pub(crate) fn diamond_path(bounds: Rect) -> BezPath {
    let c = bounds.center();
    let mut path = BezPath::new();
    path.move_to((c.x, bounds.y0));
    path.line_to((bounds.x1, c.y));
    path.line_to((c.x, bounds.y1));
    path.line_to((bounds.x0, c.y));
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec::Vec;

    use kurbo::PathEl;

    use super::*;

    fn frame(shift: f64) -> RowFrame {
        RowFrame {
            left: 0.0,
            width: 1000.0,
            top: 0.0,
            height: 20.0,
            shift,
        }
    }

    #[test]
    fn plain_bars_are_ratio_linear_and_centered() {
        let bar = frame(0.0).plain_bar(0.1, 0.2);
        assert_eq!(bar, Rect::new(100.0, 3.0, 200.0, 17.0));
        let shifted = frame(pixel_shift(1.0)).plain_bar(0.1, 0.2);
        assert_eq!(shifted.x0, 100.5);
        assert_eq!(shifted.width(), 100.0);
        assert_eq!(pixel_shift(2.0), 0.0);
    }

    #[test]
    fn parent_brackets_use_forty_percent_and_widen_when_flat() {
        let bar = frame(0.0).parent_bar(0.1, 0.3);
        assert_eq!(bar, Rect::new(100.0, 3.0, 300.0, 11.0));
        let flat = frame(0.0).parent_bar(0.5, 0.5);
        assert_eq!(flat, Rect::new(496.0, 3.0, 504.0, 11.0));

        let points: Vec<Point> = bracket_path(bar)
            .elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(points.len(), 7);
        assert_eq!(points[3], Point::new(296.0, 7.0));
        assert_eq!(points[4], Point::new(104.0, 7.0));
    }

    #[test]
    fn milestones_are_centered_diamonds() {
        let b = frame(0.0).milestone(0.25);
        assert_eq!(b.center(), Point::new(250.0, 10.0));
        assert_eq!(b.height() / 2.0, 7.0, "half of 70% of a 20 px row");
        assert_eq!(diamond_path(b).elements().len(), 5);
    }

    #[test]
    fn baseline_pairs_split_the_bar() {
        let (actual, planned) = frame(0.0).baseline_pair((0.1, 0.2), (0.15, 0.3), false);
        assert_eq!(actual, Rect::new(100.0, 3.0, 200.0, 10.0));
        assert_eq!(planned, Rect::new(150.0, 10.0, 300.0, 17.0));
        let (actual, planned) = frame(0.0).baseline_pair((0.1, 0.2), (0.15, 0.3), true);
        assert!(planned.y0 < actual.y0);
    }

    #[test]
    fn progress_is_clamped_to_the_bar() {
        let bar = Rect::new(10.0, 0.0, 110.0, 10.0);
        assert_eq!(progress_bar(bar, 0.25).width(), 25.0);
        assert_eq!(progress_bar(bar, 3.0), bar);
        assert_eq!(progress_bar(bar, f64::NAN).width(), 0.0);
        assert!(is_visible(-0.5, 0.1));
        assert!(!is_visible(1.0, 1.5));
    }
}
