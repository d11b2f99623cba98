// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Faces of extruded (3D) pie slices.
//!
//! A 3D slice is the 2D slice squashed vertically by the aspect ratio and extruded downward by
//! the thickness. Which curved faces are visible depends on the quadrants of the slice's start
//! and end angles; a face crossing the horizontal axis is split so that every part lies in the
//! front (lower) or the back (upper) half of the ellipse. All faces of all slices are sorted by
//! depth before painting.

extern crate alloc;

use alloc::vec::Vec;

use chartwell_core::geometry::{round_to, standard_angle, to_radians};
use kurbo::{Arc, BezPath, Point, Vec2};
use smallvec::SmallVec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

const TOLERANCE: f64 = 0.1;

/// The kind of a slice face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceKind {
    /// Upper lid.
    Top,
    /// Lower lid.
    Bottom,
    /// Radial side at the start angle.
    Start,
    /// Radial side at the end angle.
    End,
    /// Visible part of the outer wall.
    OuterFront,
    /// Hidden part of the outer wall.
    OuterBack,
    /// Part of the hole wall seen through the hole.
    InnerBack,
    /// Part of the hole wall facing away.
    InnerFront,
}

/// One paintable face of a 3D slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
    /// Face kind.
    pub kind: FaceKind,
    /// Point index of the owning slice.
    pub index: usize,
    /// Start angle of the face (the slice start for lids, the side angle for radial sides).
    pub start: f64,
    /// End angle of the face.
    pub end: f64,
    /// Sweep of the owning slice.
    pub sweep: f64,
    /// Whether a wall part is known to be in front of the whole slice.
    pub in_front: bool,
    /// Explode offset of the owning slice.
    pub offset: Vec2,
    /// Depth key; faces are painted in ascending order.
    pub sort_weight: f64,
}

/// Quadrant of an angle from its cosine and sine, `1` to `4` clockwise from the positive x axis.
pub fn quadrant(cos: f64, sin: f64) -> u8 {
    if cos >= 0.0 && sin >= 0.0 {
        1
    } else if cos <= 0.0 && sin >= 0.0 {
        2
    } else if cos <= 0.0 && sin < 0.0 {
        3
    } else {
        4
    }
}

struct Corners {
    start_cos: f64,
    end_cos: f64,
    start: u8,
    end: u8,
}

fn corners(start: f64, end: f64) -> Corners {
    let (s, e) = (to_radians(start), to_radians(end));
    let start_cos = round_to(s.cos(), 7);
    let end_cos = round_to(e.cos(), 7);
    Corners {
        start_cos,
        end_cos,
        start: quadrant(start_cos, s.sin()),
        end: quadrant(end_cos, e.sin()),
    }
}

/// Whether the slice shows part of its outer wall.
pub fn has_front_side(start: f64, end: f64) -> bool {
    if start == end {
        return false;
    }
    let c = corners(start, end);
    match c.start {
        1 | 2 => true,
        3 => match c.end {
            1 | 2 => true,
            3 => c.start_cos >= c.end_cos,
            _ => false,
        },
        _ => c.end != 4 || c.start_cos >= c.end_cos,
    }
}

/// Whether the slice shows part of its hole wall.
pub fn has_back_side(start: f64, end: f64, has_hole: bool) -> bool {
    if start == end || !has_hole {
        return false;
    }
    let c = corners(start, end);
    match c.start {
        3 | 4 => true,
        1 => match c.end {
            3 | 4 => true,
            1 => c.start_cos <= c.end_cos,
            _ => false,
        },
        _ => c.end != 2 || c.start_cos <= c.end_cos,
    }
}

type Parts = SmallVec<[(f64, f64, bool); 2]>;

/// The lower-half wall parts of a slice as `(start, end, in_front)`.
pub fn front_sides(start: f64, end: f64) -> Parts {
    let c = corners(start, end);
    let mut parts = Parts::new();
    match (c.start, c.end) {
        (1, 1) if c.start_cos >= c.end_cos => parts.push((start, end, false)),
        (1, 1) => {
            parts.push((start, 180.0, true));
            parts.push((360.0, end, false));
        }
        (1, 2) => parts.push((start, end, true)),
        (1, _) => parts.push((start, 180.0, true)),
        (2, 1) => {
            parts.push((start, 180.0, false));
            parts.push((360.0, end, false));
        }
        (2, 2) if c.start_cos >= c.end_cos => parts.push((start, end, false)),
        (2, 2) => {
            parts.push((start, 180.0, false));
            parts.push((360.0, end, true));
        }
        (2, _) => parts.push((start, 180.0, false)),
        (3 | 4, 1) => parts.push((360.0, end, false)),
        (3 | 4, 2) => parts.push((360.0, end, true)),
        (3, 3) | (4, 4) if c.start_cos >= c.end_cos => parts.push((0.0, 180.0, true)),
        (4, 3) => parts.push((360.0, 180.0, true)),
        _ => {}
    }
    parts
}

/// The upper-half wall parts of a slice as `(start, end, in_front)`.
pub fn back_sides(start: f64, end: f64) -> Parts {
    let c = corners(start, end);
    let mut parts = Parts::new();
    match (c.start, c.end) {
        (1, 1) if c.start_cos <= c.end_cos => parts.push((180.0, 360.0, false)),
        (1 | 2, 3) => parts.push((180.0, end, false)),
        (1 | 2, 4) => parts.push((180.0, end, true)),
        (2, 1) => parts.push((180.0, 360.0, true)),
        (2, 2) if c.start_cos <= c.end_cos => parts.push((180.0, 360.0, true)),
        (3, 1 | 2) => parts.push((start, 360.0, true)),
        (3, 3) | (4, 4) if c.start_cos >= c.end_cos => {
            parts.push((start, 360.0, false));
            parts.push((180.0, end, false));
        }
        (3, 3) | (4, 4) => parts.push((start, end, false)),
        (3, 4) => parts.push((start, end, true)),
        (4, 1 | 2) => parts.push((start, 360.0, false)),
        (4, 3) => {
            parts.push((start, 360.0, false));
            parts.push((180.0, end, false));
        }
        _ => {}
    }
    parts
}

/// Every face of one slice, unsorted.
pub fn slice_faces(index: usize, start: f64, sweep: f64, offset: Vec2, has_hole: bool) -> Vec<Face> {
    let end = start + sweep;
    let face = |kind, start, end, in_front| Face {
        kind,
        index,
        start,
        end,
        sweep,
        in_front,
        offset,
        sort_weight: 0.0,
    };
    let mut faces = Vec::with_capacity(8);
    faces.push(face(FaceKind::Top, start, end, false));
    faces.push(face(FaceKind::Bottom, start, end, false));
    if sweep.abs() != 360.0 {
        faces.push(face(FaceKind::Start, start, start, false));
        faces.push(face(FaceKind::End, end, end, false));
    }
    let walls = |kind, parts: Parts| {
        parts
            .into_iter()
            .map(move |(s, e, in_front)| face(kind, s, e, in_front))
    };
    if has_front_side(start, end) {
        faces.extend(walls(FaceKind::OuterFront, front_sides(start, end)));
    }
    if has_back_side(start, end, has_hole) {
        faces.extend(walls(FaceKind::InnerBack, back_sides(start, end)));
    }
    faces.extend(walls(FaceKind::OuterBack, back_sides(start, end)));
    faces.extend(walls(FaceKind::InnerFront, front_sides(start, end)));
    faces
}

fn wall_sweep(start: f64, end: f64) -> f64 {
    let sweep = standard_angle(end - start);
    if sweep == 0.0 { 360.0 } else { sweep }
}

fn center_sin(start: f64, end: f64) -> f64 {
    let center = start + wall_sweep(start, end) / 2.0;
    round_to(to_radians(center).sin(), 7)
}

/// Assigns depth keys and sorts `faces` back to front.
pub fn sort_faces(faces: &mut [Face]) {
    for face in faces.iter_mut() {
        face.sort_weight = match face.kind {
            FaceKind::Top => 1.0,
            FaceKind::Bottom => -3.0,
            FaceKind::InnerFront => 0.0,
            FaceKind::OuterBack => -2.0,
            FaceKind::OuterFront if face.in_front => 1.0,
            FaceKind::InnerBack if face.in_front => -1.0,
            FaceKind::OuterFront | FaceKind::InnerBack => center_sin(face.start, face.end),
            FaceKind::Start | FaceKind::End => round_to(to_radians(face.start).sin(), 7),
        };
    }
    faces.sort_by(|a, b| a.sort_weight.total_cmp(&b.sort_weight));
}

/// Shape parameters shared by all faces of a pie.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extrusion {
    /// Center of the top lid.
    pub center: Point,
    /// Outer horizontal radius.
    pub radius: f64,
    /// Hole horizontal radius.
    pub inner_radius: f64,
    /// Vertical squash of the lid ellipses.
    pub aspect: f64,
    /// Extrusion depth.
    pub height: f64,
}

impl Extrusion {
    fn point(&self, center: Point, radius: f64, angle: f64) -> Point {
        let rad = to_radians(angle);
        Point::new(
            center.x + radius * rad.cos(),
            center.y + radius * self.aspect * rad.sin(),
        )
    }

    fn arc(&self, center: Point, radius: f64, start: f64, sweep: f64) -> Arc {
        Arc::new(
            center,
            Vec2::new(radius, radius * self.aspect),
            to_radians(start),
            to_radians(sweep),
            0.0,
        )
    }

    /// The outline of `face`.
    pub fn face_path(&self, face: &Face) -> BezPath {
        let center = self.center + face.offset;
        match face.kind {
            FaceKind::Top => self.lid(center, face.start, face.sweep),
            FaceKind::Bottom => self.lid(center + Vec2::new(0.0, self.height), face.start, face.sweep),
            FaceKind::Start | FaceKind::End => self.radial_side(center, face.start),
            FaceKind::OuterFront | FaceKind::OuterBack => {
                let (start, end) = if face.sweep.abs() == 360.0 {
                    (0.0, 180.0)
                } else {
                    (face.start, face.end)
                };
                self.wall(center, self.radius, start, end)
            }
            FaceKind::InnerBack | FaceKind::InnerFront => {
                let (start, end) = if face.sweep.abs() == 360.0 {
                    (180.0, 0.0)
                } else {
                    (face.start, face.end)
                };
                self.wall(center, self.inner_radius, start, end)
            }
        }
    }

    fn lid(&self, center: Point, start: f64, sweep: f64) -> BezPath {
        let (outer, inner) = (self.radius.max(0.0), self.inner_radius.max(0.0));
        let (outer, inner) = if outer < inner { (inner, outer) } else { (outer, inner) };
        let sweep = sweep.clamp(-360.0, 360.0);
        let full = sweep.abs() == 360.0;
        let mut path = BezPath::new();
        if inner <= 0.0 {
            if full {
                path.move_to(self.point(center, outer, start));
            } else {
                path.move_to(center);
                path.line_to(self.point(center, outer, start));
            }
            path.extend(self.arc(center, outer, start, sweep).append_iter(TOLERANCE));
            path.close_path();
            return path;
        }
        path.move_to(self.point(center, outer, start));
        path.extend(self.arc(center, outer, start, sweep).append_iter(TOLERANCE));
        if full {
            path.close_path();
            path.move_to(self.point(center, inner, start + sweep));
        } else {
            path.line_to(self.point(center, inner, start + sweep));
        }
        path.extend(
            self.arc(center, inner, start + sweep, -sweep)
                .append_iter(TOLERANCE),
        );
        path.close_path();
        path
    }

    fn wall(&self, center: Point, radius: f64, start: f64, end: f64) -> BezPath {
        let sweep = wall_sweep(start, end);
        let down = Vec2::new(0.0, self.height);
        let from = self.point(center, radius, start);
        let to = self.point(center, radius, start + sweep);
        let mut path = BezPath::new();
        path.move_to(from);
        path.extend(self.arc(center, radius, start, sweep).append_iter(TOLERANCE));
        path.line_to(to + down);
        path.extend(
            self.arc(center + down, radius, start + sweep, -sweep)
                .append_iter(TOLERANCE),
        );
        path.close_path();
        path
    }

    fn radial_side(&self, center: Point, angle: f64) -> BezPath {
        let down = Vec2::new(0.0, self.height);
        let inner = self.point(center, self.inner_radius, angle);
        let outer = self.point(center, self.radius, angle);
        let mut path = BezPath::new();
        path.move_to(inner);
        path.line_to(outer);
        path.line_to(outer + down);
        path.line_to(inner + down);
        path.close_path();
        path
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Shape;

    use super::*;

    fn kinds(faces: &[Face]) -> Vec<FaceKind> {
        faces.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn quadrants_follow_screen_orientation() {
        assert_eq!(quadrant(1.0, 0.0), 1);
        assert_eq!(quadrant(-0.5, 0.5), 2);
        assert_eq!(quadrant(-0.5, -0.5), 3);
        assert_eq!(quadrant(0.5, -0.5), 4);
    }

    #[test]
    fn lower_half_slices_show_their_outer_wall_only() {
        // 10..80 degrees lies in the front (lower) half.
        assert!(has_front_side(10.0, 80.0));
        assert!(!has_back_side(10.0, 80.0, false));
        assert!(!has_back_side(10.0, 80.0, true));
        assert_eq!(front_sides(10.0, 80.0).as_slice(), &[(10.0, 80.0, false)]);

        // 200..300 lies in the back half: no visible outer wall.
        assert!(!has_front_side(200.0, 300.0));
        assert!(has_back_side(200.0, 300.0, true));
    }

    #[test]
    fn walls_crossing_the_axis_are_split() {
        // 150..390 crosses 180 and wraps to 30.
        let parts = front_sides(150.0, 390.0);
        assert_eq!(parts.as_slice(), &[(150.0, 180.0, false), (360.0, 390.0, false)]);
        let parts = back_sides(300.0, 240.0 + 360.0);
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn full_slices_have_no_radial_sides() {
        let faces = slice_faces(0, -90.0, 360.0, Vec2::ZERO, false);
        assert!(!kinds(&faces).contains(&FaceKind::Start));
        assert!(!kinds(&faces).contains(&FaceKind::End));
        let faces = slice_faces(0, -90.0, 90.0, Vec2::ZERO, true);
        assert!(kinds(&faces).contains(&FaceKind::Start));
        assert!(kinds(&faces).contains(&FaceKind::InnerBack));
    }

    #[test]
    fn sorting_puts_bottoms_first_and_tops_last() {
        let mut faces = slice_faces(0, -90.0, 180.0, Vec2::ZERO, false);
        faces.extend(slice_faces(1, 90.0, 180.0, Vec2::ZERO, false));
        sort_faces(&mut faces);
        assert_eq!(faces.first().map(|f| f.kind), Some(FaceKind::Bottom));
        assert_eq!(faces.last().map(|f| f.sort_weight), Some(1.0));
        let first_top = faces.iter().position(|f| f.kind == FaceKind::Top);
        let last_back = faces.iter().rposition(|f| f.kind == FaceKind::OuterBack);
        assert!(last_back < first_top, "hidden walls are painted before the lids");
        assert!(faces.windows(2).all(|w| w[0].sort_weight <= w[1].sort_weight));
    }

    #[test]
    fn walls_hang_below_the_lid() {
        let extrusion = Extrusion {
            center: Point::new(100.0, 100.0),
            radius: 50.0,
            inner_radius: 0.0,
            aspect: 0.5,
            height: 10.0,
        };
        let faces = slice_faces(0, 0.0, 90.0, Vec2::ZERO, false);
        let top = faces
            .iter()
            .find(|f| f.kind == FaceKind::Top)
            .map(|f| extrusion.face_path(f).bounding_box());
        let wall = faces
            .iter()
            .find(|f| f.kind == FaceKind::OuterFront)
            .map(|f| extrusion.face_path(f).bounding_box());
        let (Some(top), Some(wall)) = (top, wall) else {
            panic!("missing faces");
        };
        assert!((top.y1 - 125.0).abs() < 0.5, "lid reaches the squashed radius");
        assert!((wall.y1 - 135.0).abs() < 0.5, "wall extends by the height");
    }
}
