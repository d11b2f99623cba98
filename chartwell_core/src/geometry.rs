// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Angle and intersection helpers shared by the chart components.
//!
//! Angles passed around in degrees follow screen conventions: `0°` points right and angles grow
//! clockwise (y grows downward).

use kurbo::{Point, Rect};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Normalizes an angle in degrees into `[0, 360)`.
pub fn standard_angle(degrees: f64) -> f64 {
    let a = degrees % 360.0;
    if a < 0.0 { a + 360.0 } else { a }
}

/// Degrees to radians.
pub fn to_radians(degrees: f64) -> f64 {
    degrees * core::f64::consts::PI / 180.0
}

/// Radians to degrees.
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / core::f64::consts::PI
}

/// Returns the point at `angle` (degrees) on the ellipse with the given radii.
pub fn polar_point(center: Point, radius_x: f64, radius_y: f64, angle: f64) -> Point {
    let rad = to_radians(angle);
    Point::new(
        center.x + radius_x * rad.cos(),
        center.y + radius_y * rad.sin(),
    )
}

/// Rounds `value` to `digits` decimal digits.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let k = 10_f64.powi(digits);
    (value * k).round() / k
}

/// Euclidean distance between two points.
pub fn vector_length(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Signed angle in degrees from vector `u` to vector `v`.
///
/// Degenerate (zero-length) vectors yield `0`.
pub fn angle_between_vectors(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    let len = (ux * ux + uy * uy).sqrt() * (vx * vx + vy * vy).sqrt();
    if len == 0.0 || !len.is_finite() {
        return 0.0;
    }
    let cos = ((ux * vx + uy * vy) / len).clamp(-1.0, 1.0);
    let sign = if ux * vy - uy * vx < 0.0 { -1.0 } else { 1.0 };
    sign * to_degrees(cos.acos())
}

/// Returns `true` if the rectangles overlap with positive area.
///
/// Rectangles that only touch along an edge do not intersect.
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    let a = a.abs();
    let b = b.abs();
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

fn oriented_area(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn ranges_overlap(a: f64, b: f64, c: f64, d: f64) -> bool {
    let (a, b) = if a > b { (b, a) } else { (a, b) };
    let (c, d) = if c > d { (d, c) } else { (c, d) };
    a.max(c) <= b.min(d)
}

/// Returns `true` if segment `a0-a1` touches segment `b0-b1`.
pub fn segments_intersect(a0: Point, a1: Point, b0: Point, b1: Point) -> bool {
    ranges_overlap(a0.x, a1.x, b0.x, b1.x)
        && ranges_overlap(a0.y, a1.y, b0.y, b1.y)
        && oriented_area(a0, a1, b0) * oriented_area(a0, a1, b1) <= 0.0
        && oriented_area(b0, b1, a0) * oriented_area(b0, b1, a1) <= 0.0
}

/// Returns `true` if segment `p0-p1` crosses one of the edges of `rect`.
///
/// A segment lying fully inside the rectangle does not cross an edge.
pub fn segment_intersects_rect(p0: Point, p1: Point, rect: Rect) -> bool {
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    (0..4).any(|i| segments_intersect(corners[i], corners[(i + 1) % 4], p0, p1))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn standard_angle_wraps_negative_and_large_angles() {
        assert_close(standard_angle(-90.0), 270.0);
        assert_close(standard_angle(720.0), 0.0);
        assert_close(standard_angle(361.5), 1.5);
    }

    #[test]
    fn polar_point_uses_screen_orientation() {
        let p = polar_point(Point::new(10.0, 10.0), 5.0, 2.0, 90.0);
        assert_close(p.x, 10.0);
        assert_close(p.y, 12.0);
    }

    #[test]
    fn angle_between_vectors_is_signed_and_degenerate_safe() {
        assert_close(angle_between_vectors(1.0, 0.0, 0.0, 1.0), 90.0);
        assert_close(angle_between_vectors(0.0, 1.0, 1.0, 0.0), -90.0);
        assert_close(angle_between_vectors(0.0, 0.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!rects_intersect(a, Rect::new(0.0, 10.0, 10.0, 20.0)), "edge contact");
        assert!(rects_intersect(a, Rect::new(5.0, 5.0, 15.0, 15.0)), "overlap");
    }

    #[test]
    fn segment_against_rect_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(segment_intersects_rect(
            Point::new(-5.0, 5.0),
            Point::new(5.0, 5.0),
            r
        ), "crosses the left edge");
        assert!(!segment_intersects_rect(
            Point::new(-5.0, -5.0),
            Point::new(-1.0, 20.0),
            r
        ), "passes beside");
        assert_close(round_to(1.234_567_89, 3), 1.235);
    }
}
