// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orthogonal connector routing between gantt bars.
//!
//! A connector leaves one end of the source bar and enters one end of the target bar. Depending
//! on the bars' relative position it is a direct segment, a three-segment dogleg or a
//! five-segment detour through the row boundary of the target, and it ends in a small
//! triangular arrowhead.

use kurbo::{BezPath, Point, Rect};
use smallvec::SmallVec;

use super::data::ConnectorType;
#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Horizontal clearance between a bar end and a connector bend.
pub const ARROW_MARGIN: f64 = 5.0;
/// Arrowhead size.
pub const ARROW_SIZE: f64 = 4.0;

/// Direction the arrowhead points to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowOrientation {
    /// Pointing left.
    Left,
    /// Pointing right.
    Right,
    /// Pointing up.
    Top,
    /// Pointing down.
    Bottom,
}

/// One end of a connector: the bar bounds and the row holding it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorEnd {
    /// Bar bounds.
    pub bounds: Rect,
    /// Top of the bar's row.
    pub row_top: f64,
    /// Height of the bar's row.
    pub row_height: f64,
}

/// A routed connector polyline.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Polyline points, source end first.
    pub points: SmallVec<[Point; 6]>,
    /// Arrowhead direction at the last point.
    pub orientation: ArrowOrientation,
}

fn snap(value: f64, shift: f64) -> f64 {
    value.round() + shift
}

fn middle(bounds: Rect, shift: f64) -> f64 {
    snap(bounds.y0 + bounds.height() / 2.0, shift)
}

/// Routes a connector of `kind` from `from` to `to`.
pub fn route(kind: ConnectorType, from: &ConnectorEnd, to: &ConnectorEnd, shift: f64) -> Route {
    let (fb, tb) = (from.bounds, to.bounds);
    let from_y = middle(fb, shift);
    let to_y = middle(tb, shift);
    let same_row = fb.y0 == tb.y0;
    let mut points: SmallVec<[Point; 6]> = SmallVec::new();

    let orientation = match kind {
        ConnectorType::FinishFinish => {
            let fx = snap(fb.x1, shift);
            let tx = snap(tb.x1, shift);
            points.push(Point::new(fx, from_y));
            if !same_row {
                let x0 = (fx + ARROW_SIZE + ARROW_MARGIN).max(tx + ARROW_SIZE + ARROW_MARGIN);
                points.push(Point::new(x0, from_y));
                points.push(Point::new(x0, to_y));
            }
            points.push(Point::new(tx, to_y));
            ArrowOrientation::Left
        }
        ConnectorType::StartStart => {
            let fx = snap(fb.x0, shift);
            let tx = snap(tb.x0, shift);
            points.push(Point::new(fx, from_y));
            if !same_row {
                let x0 = (fx - ARROW_SIZE - ARROW_MARGIN).min(tx - ARROW_SIZE - ARROW_MARGIN);
                points.push(Point::new(x0, from_y));
                points.push(Point::new(x0, to_y));
            }
            points.push(Point::new(tx, to_y));
            ArrowOrientation::Right
        }
        ConnectorType::StartFinish => {
            let fx = snap(fb.x0, shift);
            let tx = snap(tb.x1, shift);
            points.push(Point::new(fx, from_y));
            if fx - 2.0 * ARROW_MARGIN - ARROW_SIZE > tx {
                let x0 = tx + ARROW_MARGIN + ARROW_SIZE;
                points.push(Point::new(x0, from_y));
                points.push(Point::new(x0, to_y));
            } else {
                let x0 = fx - ARROW_MARGIN;
                let x1 = tx + ARROW_MARGIN + ARROW_SIZE;
                let y0 = detour_y(to, tb.y0 >= fb.y0, shift);
                points.push(Point::new(x0, from_y));
                points.push(Point::new(x0, y0));
                points.push(Point::new(x1, y0));
                points.push(Point::new(x1, to_y));
            }
            points.push(Point::new(tx, to_y));
            ArrowOrientation::Left
        }
        ConnectorType::FinishStart => {
            let fx = snap(fb.x1, shift);
            let tx = snap(tb.x0, shift);
            points.push(Point::new(fx, from_y));
            if tx >= fx {
                let x = (tx + ARROW_MARGIN).min(snap(tb.x0 + tb.width() / 2.0, shift));
                if tb.y0 > fb.y0 {
                    points.push(Point::new(x, from_y));
                    points.push(Point::new(x, snap(tb.y0, shift)));
                    ArrowOrientation::Bottom
                } else if tb.y0 < fb.y0 {
                    points.push(Point::new(x, from_y));
                    points.push(Point::new(x, snap(tb.y1, shift)));
                    ArrowOrientation::Top
                } else {
                    points.push(Point::new(tx, to_y));
                    ArrowOrientation::Right
                }
            } else {
                let x0 = fx + ARROW_MARGIN;
                let x1 = tx - ARROW_MARGIN - ARROW_SIZE;
                let y0 = detour_y(to, tb.y0 > fb.y0, shift);
                points.push(Point::new(x0, from_y));
                points.push(Point::new(x0, y0));
                points.push(Point::new(x1, y0));
                points.push(Point::new(x1, to_y));
                points.push(Point::new(tx, to_y));
                ArrowOrientation::Right
            }
        }
    };

    // Direct segments on one row may run against the usual direction.
    let orientation = match (points.len(), orientation) {
        (2, ArrowOrientation::Left | ArrowOrientation::Right) => {
            if points[1].x >= points[0].x {
                ArrowOrientation::Right
            } else {
                ArrowOrientation::Left
            }
        }
        (_, o) => o,
    };
    Route {
        points,
        orientation,
    }
}

/// The row boundary a detour runs along: the top of the target row when the target is below,
/// its bottom otherwise.
fn detour_y(to: &ConnectorEnd, target_below: bool, shift: f64) -> f64 {
    if target_below {
        snap(to.row_top, shift)
    } else {
        snap(to.row_top + to.row_height, shift)
    }
}

fn segment_overlaps(a: Point, b: Point, clip: Rect) -> bool {
    let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
    let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
    x0 < clip.x1 && x1 > clip.x0 && y0 <= clip.y1 && y1 >= clip.y0
}

/// The polyline of `route` clipped to `clip`.
///
/// Drawing starts at the first segment touching `clip`; every later segment is kept so the
/// line stays continuous when it leaves the clip and comes back. Returns `None` if no
/// segment touches `clip`.
pub(crate) fn culled_path(route: &Route, clip: Rect) -> Option<BezPath> {
    let mut path = BezPath::new();
    let mut started = false;
    for pair in route.points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if !started {
            if !segment_overlaps(a, b, clip) {
                continue;
            }
            path.move_to(a);
            started = true;
        }
        path.line_to(b);
    }
    started.then_some(path)
}

/// The arrowhead at `tip`, or `None` if the tip lies outside `clip`.
pub(crate) fn arrow_path(tip: Point, orientation: ArrowOrientation, clip: Rect) -> Option<BezPath> {
    let inside = tip.x >= clip.x0 && tip.x <= clip.x1 && tip.y >= clip.y0 && tip.y <= clip.y1;
    if !inside {
        return None;
    }
    let s = ARROW_SIZE;
    let (tip, a, b) = match orientation {
        ArrowOrientation::Left => {
            let t = Point::new(tip.x + 1.0, tip.y);
            (t, Point::new(t.x + s, t.y - s), Point::new(t.x + s, t.y + s))
        }
        ArrowOrientation::Right => {
            let t = Point::new(tip.x - 1.0, tip.y);
            (t, Point::new(t.x - s, t.y - s), Point::new(t.x - s, t.y + s))
        }
        ArrowOrientation::Top => {
            let t = Point::new(tip.x, tip.y + 1.0);
            (t, Point::new(t.x - s, t.y + s), Point::new(t.x + s, t.y + s))
        }
        ArrowOrientation::Bottom => {
            let t = Point::new(tip.x, tip.y - 1.0);
            (t, Point::new(t.x - s, t.y - s), Point::new(t.x + s, t.y - s))
        }
    };
    let mut path = BezPath::new();
    path.move_to(tip);
    path.line_to(a);
    path.line_to(b);
    path.close_path();
    Some(path)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn end(x0: f64, x1: f64, row: u32) -> ConnectorEnd {
        let row_top = f64::from(row) * 20.0;
        ConnectorEnd {
            bounds: Rect::new(x0, row_top + 3.0, x1, row_top + 17.0),
            row_top,
            row_height: 20.0,
        }
    }

    #[test]
    fn same_row_finish_start_is_one_segment_and_an_arrow() {
        let r = route(ConnectorType::FinishStart, &end(10.0, 50.0, 0), &end(80.0, 120.0, 0), 0.0);
        assert_eq!(r.points.as_slice(), &[Point::new(50.0, 10.0), Point::new(80.0, 10.0)]);
        assert_eq!(r.orientation, ArrowOrientation::Right);
        let clip = Rect::new(0.0, 0.0, 200.0, 100.0);
        let arrow = arrow_path(r.points[1], r.orientation, clip).unwrap();
        assert_eq!(arrow.elements().len(), 4);
    }

    #[test]
    fn finish_start_down_into_a_later_bar_enters_from_the_top() {
        let r = route(ConnectorType::FinishStart, &end(10.0, 50.0, 0), &end(80.0, 120.0, 2), 0.0);
        assert_eq!(
            r.points.as_slice(),
            &[Point::new(50.0, 10.0), Point::new(85.0, 10.0), Point::new(85.0, 43.0)]
        );
        assert_eq!(r.orientation, ArrowOrientation::Bottom);
    }

    #[test]
    fn overlapping_finish_start_detours_along_the_target_row() {
        let from = end(10.0, 100.0, 0);
        let to = end(40.0, 120.0, 1);
        let r = route(ConnectorType::FinishStart, &from, &to, 0.0);
        assert_eq!(r.points.len(), 6);
        assert_eq!(r.points[0], Point::new(100.0, 10.0), "source right edge midpoint");
        assert_eq!(r.points[5], Point::new(40.0, 30.0), "target left edge midpoint");
        assert_eq!(r.points[2].y, 20.0, "runs along the top of the target row");
        assert_eq!(r.points[3].x, 40.0 - ARROW_MARGIN - ARROW_SIZE);
        for pair in r.points.windows(2) {
            assert!(pair[0].x == pair[1].x || pair[0].y == pair[1].y, "orthogonal: {pair:?}");
        }
    }

    #[test]
    fn start_start_and_finish_finish_dogleg_outside_both_bars() {
        let ss = route(ConnectorType::StartStart, &end(30.0, 60.0, 0), &end(20.0, 90.0, 1), 0.5);
        assert_eq!(ss.points.len(), 4);
        assert_eq!(ss.points[1].x, 20.5 - ARROW_SIZE - ARROW_MARGIN);
        assert_eq!(ss.points[0], Point::new(30.5, 10.5));
        assert_eq!(ss.points[3], Point::new(20.5, 30.5));
        assert_eq!(ss.orientation, ArrowOrientation::Right);

        let ff = route(ConnectorType::FinishFinish, &end(30.0, 60.0, 1), &end(20.0, 90.0, 0), 0.0);
        assert_eq!(ff.points[1].x, 90.0 + ARROW_SIZE + ARROW_MARGIN);
        assert_eq!(ff.orientation, ArrowOrientation::Left);
    }

    #[test]
    fn start_finish_uses_a_dogleg_when_there_is_room() {
        let r = route(ConnectorType::StartFinish, &end(100.0, 150.0, 0), &end(20.0, 50.0, 1), 0.0);
        assert_eq!(r.points.len(), 4);
        assert_eq!(r.points[1].x, 50.0 + ARROW_MARGIN + ARROW_SIZE);
        let tight = route(ConnectorType::StartFinish, &end(55.0, 150.0, 0), &end(20.0, 50.0, 1), 0.0);
        assert_eq!(tight.points.len(), 6);
    }

    #[test]
    fn culling_starts_at_the_first_visible_segment_and_keeps_continuity() {
        let r = route(ConnectorType::FinishStart, &end(10.0, 100.0, 0), &end(40.0, 120.0, 1), 0.0);
        let clip = Rect::new(0.0, 15.0, 200.0, 100.0);
        let path = culled_path(&r, clip).unwrap();
        let els = path.elements();
        assert_eq!(els[0], kurbo::PathEl::MoveTo(r.points[1]), "first segment is above the clip");
        assert_eq!(els.len(), 5);

        assert!(culled_path(&r, Rect::new(500.0, 0.0, 600.0, 100.0)).is_none());
        assert!(arrow_path(Point::new(-1.0, 5.0), ArrowOrientation::Left, clip).is_none());
    }
}
