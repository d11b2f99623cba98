// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie label placement.
//!
//! Inside labels sit on the bisector of their slice and are hidden when they do not fit in it.
//!
//! Outside labels start at their natural position, on an ellipse [`connector_length`] beyond the
//! slice, and are then packed per side into *domains*: vertical stacks of labels whose natural
//! boxes overlap. A domain is stacked around the mean of its labels' natural positions and
//! clamped to the vertical extent of the label ellipse; each label is then moved horizontally
//! onto the ellipse. When a repacked connector deviates from its natural direction by more than
//! the critical angle (or cannot reach the ellipse at all), the smallest label of the domain is
//! dropped and the domain is repacked. Dropped labels get a second chance once all domains of
//! the side are known.
//!
//! Repacking is a fixed-point iteration. It is capped at [`MAX_DOMAIN_ITERATIONS`] rounds per
//! domain; a domain that has not settled by then loses all its labels.
//!
//! [`connector_length`]: LabelFrame::connector_length

extern crate alloc;

use alloc::vec::Vec;

use chartwell_core::geometry::{
    angle_between_vectors, rects_intersect, segment_intersects_rect, segments_intersect,
    standard_angle, to_radians, vector_length,
};
use kurbo::{Point, Rect, Vec2};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::theme::Size;

/// Horizontal run of an outside label connector before it reaches the label.
pub const OUTSIDE_LABELS_CONNECTOR_SIZE: f64 = 5.0;

/// Repacking rounds a single domain may take before its labels are disabled.
pub const MAX_DOMAIN_ITERATIONS: usize = 64;

/// The pie outline outside labels are placed around.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelFrame {
    /// Center of the label ellipse.
    pub center: Point,
    /// Outer radius of the pie.
    pub radius: f64,
    /// Hole radius.
    pub inner_radius: f64,
    /// Vertical squash (`1` for flat pies).
    pub aspect: f64,
    /// Distance between the pie edge and the label ellipse.
    pub connector_length: f64,
    /// Largest connector deviation, in degrees, before a label is dropped.
    pub critical_angle: f64,
}

impl LabelFrame {
    fn ellipse_point(&self, center: Point, radius_x: f64, radius_y: f64, angle: f64) -> Point {
        let rad = to_radians(angle);
        Point::new(center.x + radius_x * rad.cos(), center.y + radius_y * rad.sin())
    }
}

/// What an outside label is placed for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelRequest {
    /// Point index.
    pub index: usize,
    /// Point value; the smallest label of a domain is dropped first.
    pub value: f64,
    /// Slice start angle.
    pub start: f64,
    /// Slice sweep.
    pub sweep: f64,
    /// Explode distance of the slice (`0` when not exploded).
    pub explode: f64,
    /// Explode offset of the slice.
    pub offset: Vec2,
    /// Measured label width.
    pub width: f64,
    /// Measured label height.
    pub height: f64,
}

impl LabelRequest {
    fn middle(&self) -> f64 {
        self.start + self.sweep / 2.0
    }
}

/// A placed outside label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutsideLabel {
    /// Point index.
    pub index: usize,
    /// Whether the label is on the right of the pie (text grows rightward).
    pub right: bool,
    /// Whether the label survived placement.
    pub enabled: bool,
    /// Label anchor: the middle of the side facing the pie.
    pub position: Point,
    /// Where the connector touches the slice.
    pub anchor: Point,
    /// Label width.
    pub width: f64,
    /// Label height.
    pub height: f64,
}

impl OutsideLabel {
    /// Box of the label at its current position.
    pub fn bounds(&self) -> Rect {
        let half = self.height / 2.0;
        let (x0, x1) = if self.right {
            (self.position.x, self.position.x + self.width)
        } else {
            (self.position.x - self.width, self.position.x)
        };
        Rect::new(x0, self.position.y - half, x1, self.position.y + half)
    }

    fn connector_size(&self) -> f64 {
        if self.right {
            OUTSIDE_LABELS_CONNECTOR_SIZE
        } else {
            -OUTSIDE_LABELS_CONNECTOR_SIZE
        }
    }

    /// Where the connector bends into its horizontal run.
    pub fn bend(&self) -> Point {
        Point::new(self.position.x - self.connector_size(), self.position.y)
    }

    /// The connector polyline: slice anchor, bend, label.
    pub fn connector(&self) -> [Point; 3] {
        [self.anchor, self.bend(), self.position]
    }
}

/// Result of [`place_outside_labels`].
#[derive(Clone, Debug, PartialEq)]
pub struct OutsideLabels {
    /// Labels in request order.
    pub labels: Vec<OutsideLabel>,
    /// How far the furthest enabled label sticks out of its allowed area (negative when all fit).
    pub overflow: f64,
    /// Whether a domain hit the iteration cap.
    pub degraded: bool,
}

#[derive(Clone, Debug)]
struct Domain {
    right: bool,
    explode: f64,
    labels: Vec<usize>,
    dropped: Vec<usize>,
    positions: Vec<Point>,
    bounds: Option<Rect>,
    critical: bool,
    drop: Option<usize>,
}

impl Domain {
    fn new(right: bool, explode: f64) -> Self {
        Self {
            right,
            explode,
            labels: Vec::new(),
            dropped: Vec::new(),
            positions: Vec::new(),
            bounds: None,
            critical: false,
            drop: None,
        }
    }

    fn intersects(&self, rect: Rect) -> bool {
        self.bounds.is_some_and(|b| rects_intersect(b, rect))
    }

    fn overlaps(&self, other: &Self) -> bool {
        other.bounds.is_some_and(|b| self.intersects(b))
    }
}

struct Placer<'a> {
    frame: &'a LabelFrame,
    requests: &'a [LabelRequest],
    labels: Vec<OutsideLabel>,
    degraded: bool,
    max_iterations: usize,
}

impl Placer<'_> {
    fn bounds(&self, label: usize) -> Rect {
        self.labels[label].bounds()
    }

    /// Stacks the domain's labels and checks their connectors.
    fn calc(&self, domain: &mut Domain) {
        domain.positions.clear();
        domain.bounds = None;
        domain.critical = false;
        domain.drop = None;
        let Some(&first) = domain.labels.first() else {
            return;
        };

        let f = self.frame;
        let c = f.center;
        let pie_radius = f.radius + domain.explode;
        let pie_radius_y = pie_radius * f.aspect;
        let a = pie_radius + f.connector_length;
        let b_min = pie_radius_y + f.connector_length;
        let label_radius = f.radius + f.connector_length + domain.explode;
        let label_radius_y = pie_radius_y + f.connector_length;
        let bottom_limit = c.y + b_min - 0.1;
        let top_limit = c.y - b_min + 0.1;

        let mut height = 0.0;
        let mut sum = 0.0;
        for &label in &domain.labels {
            let b = self.bounds(label);
            sum += b.y0 - height - b.height() / 2.0;
            height += b.height();
        }
        let mut y = sum / domain.labels.len() as f64;
        let mut start_y = y + height;
        if start_y > bottom_limit {
            start_y = bottom_limit;
            y = bottom_limit - height;
        }
        let first_height = self.labels[first].height;
        if y + first_height < top_limit {
            start_y = top_limit - first_height + height;
            y = top_limit - first_height;
        }

        let side = if domain.right { 1.0 } else { -1.0 };
        let mut left = f64::INFINITY;
        let mut right = f64::NEG_INFINITY;
        for (j, &label) in domain.labels.iter().enumerate() {
            let request = &self.requests[label];
            let current = &self.labels[label];
            let next_height = domain
                .labels
                .get(j + 1)
                .map_or(0.0, |&next| self.labels[next].height);
            let angle = request.middle();

            let dy = start_y - c.y;
            let b = b_min.max(dy.abs());
            let leg = if b > 0.0 {
                a * (b * b - dy * dy).max(0.0).sqrt() / b
            } else {
                0.0
            };
            let x = c.x + side * leg.abs();
            let touch = f.ellipse_point(c, pie_radius, pie_radius_y, angle);
            let natural = f.ellipse_point(c, label_radius, label_radius_y, angle);
            let reach = vector_length(Point::new(x, start_y), c).floor();
            let deviation = angle_between_vectors(
                x - touch.x,
                start_y - touch.y,
                natural.x - touch.x,
                natural.y - touch.y,
            )
            .abs();
            let unreachable = leg < 0.0 || reach > label_radius;
            if deviation > f.critical_angle || unreachable {
                domain.critical = true;
            }

            let label_x = x + current.connector_size();
            let (x0, x1) = if domain.right {
                (label_x, label_x + current.width)
            } else {
                (label_x - current.width, label_x)
            };
            left = left.min(x0);
            right = right.max(x1);
            domain.positions.push(Point::new(label_x, start_y));

            start_y -= current.height / 2.0 + next_height / 2.0;
        }

        let top = y + first_height / 2.0;
        domain.bounds = Some(Rect::new(left, top, right, top + height));
        domain.drop = domain
            .labels
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (pos, &label)| {
                let value = self.requests[label].value;
                match best {
                    Some((_, min)) if min <= value => best,
                    _ => Some((pos, value)),
                }
            })
            .map(|(pos, _)| pos);
    }

    fn soft_add(&self, domain: &mut Domain, label: usize) {
        domain.labels.push(label);
        self.calc(domain);
    }

    fn drop_label(&mut self, domain: &mut Domain, pos: usize) {
        let label = domain.labels.remove(pos);
        self.labels[label].enabled = false;
        domain.dropped.push(label);
    }

    /// Adds a label and repacks until the domain is neither critical nor overlapping its
    /// predecessor.
    fn add(&mut self, domain: &mut Domain, label: usize, domains: &mut Vec<Domain>) {
        domain.labels.push(label);
        for _ in 0..self.max_iterations {
            self.calc(domain);
            if domain.critical {
                if let Some(pos) = domain.drop {
                    self.drop_label(domain, pos);
                }
                self.defragment(domain, domains);
                continue;
            }
            if domains.last().is_some_and(|prev| domain.overlaps(prev)) {
                if let Some(prev) = domains.pop() {
                    let mut labels = prev.labels;
                    labels.append(&mut domain.labels);
                    domain.labels = labels;
                    domain.dropped.extend(prev.dropped);
                    for &label in &domain.labels {
                        self.labels[label].enabled = true;
                    }
                }
                continue;
            }
            return;
        }

        tracing::warn!(
            labels = domain.labels.len(),
            "pie: outside label domain did not settle, disabling its labels"
        );
        self.degraded = true;
        for label in domain.labels.drain(..) {
            self.labels[label].enabled = false;
        }
        self.calc(domain);
    }

    /// Splits a domain that just lost a label into the domains its remaining labels form.
    fn defragment(&mut self, domain: &mut Domain, domains: &mut Vec<Domain>) {
        let labels = domain.labels.clone();
        let count = domains.len();
        let mut has_prev = !domains.is_empty();
        let mut expanded = false;
        let mut tmp: Option<Domain> = None;

        for label in labels {
            let bounds = self.bounds(label);
            let clear_of_prev = !has_prev || domains.last().is_none_or(|p| !p.intersects(bounds));
            if !clear_of_prev {
                self.labels[label].enabled = false;
                if let Some(t) = tmp.as_mut() {
                    t.dropped.push(label);
                }
                continue;
            }
            let joins = tmp.as_ref().is_some_and(|t| t.intersects(bounds));
            if !joins {
                if let Some(t) = tmp.take() {
                    domains.push(t);
                    has_prev = true;
                }
                let mut t = Domain::new(domain.right, domain.explode);
                self.soft_add(&mut t, label);
                tmp = Some(t);
                continue;
            }
            let Some(t) = tmp.as_mut() else {
                continue;
            };
            self.soft_add(t, label);
            if t.critical {
                self.labels[label].enabled = false;
                t.labels.pop();
                t.dropped.push(label);
                self.calc(t);
            } else if has_prev && domains.last().is_some_and(|p| t.overlaps(p)) {
                if let Some(prev) = domains.pop() {
                    let mut merged = prev.labels;
                    merged.append(&mut t.labels);
                    t.labels = merged;
                }
                has_prev = false;
                self.calc(t);
                expanded = true;
            }
        }

        if let Some(mut t) = tmp {
            if domains.len() > count || expanded {
                domain.labels = t.labels;
                domain.dropped.append(&mut t.dropped);
            } else {
                for label in t.dropped {
                    self.labels[label].enabled = true;
                }
            }
        }
    }

    /// Packs one side of one explode level. `compare` holds labels of levels placed before.
    fn place_side(&mut self, side: &[usize], right: bool, explode: f64, compare: &[usize]) {
        let order: Vec<usize> = if right {
            side.iter().rev().copied().collect()
        } else {
            side.to_vec()
        };

        let mut domains: Vec<Domain> = Vec::new();
        let mut current: Option<Domain> = None;
        for &label in &order {
            if !self.labels[label].enabled {
                continue;
            }
            let bounds = self.bounds(label);
            let mut domain = match current.take() {
                Some(d) if d.intersects(bounds) => d,
                other => {
                    domains.extend(other);
                    Domain::new(right, explode)
                }
            };
            self.add(&mut domain, label, &mut domains);
            current = Some(domain);
        }
        domains.extend(current);

        let mut dropped: Vec<usize> = domains
            .iter()
            .flat_map(|d| d.dropped.iter().copied())
            .filter(|&l| !self.labels[l].enabled)
            .collect();
        dropped.sort_unstable_by_key(|&l| self.requests[l].index);
        dropped.dedup();
        if right {
            dropped.reverse();
        }

        let mut tmp: Option<Domain> = None;
        for label in dropped {
            if self.labels[label].enabled {
                continue;
            }
            let bounds = self.bounds(label);
            if domains.iter().any(|d| d.intersects(bounds)) {
                domains.extend(tmp.take());
                continue;
            }
            let t = tmp.get_or_insert_with(|| Domain::new(right, explode));
            self.soft_add(t, label);
            let fits = !t.critical && !domains.iter().any(|d| t.overlaps(d));
            if fits {
                self.labels[label].enabled = true;
            } else {
                t.labels.pop();
                self.calc(t);
                domains.extend(tmp.take());
            }
        }
        domains.extend(tmp);

        for domain in &domains {
            for (&label, &position) in domain.labels.iter().zip(&domain.positions) {
                self.labels[label].position = position;
            }
        }

        // Domains split by defragmentation are only checked against their neighbor; settle any
        // leftover overlap in favor of the larger values.
        let mut by_value: Vec<usize> = side
            .iter()
            .copied()
            .filter(|&l| self.labels[l].enabled)
            .collect();
        by_value.sort_by(|&a, &b| self.requests[b].value.total_cmp(&self.requests[a].value));
        let mut accepted: Vec<Rect> = Vec::with_capacity(by_value.len());
        for label in by_value {
            let bounds = self.bounds(label).inset(-1e-6);
            if accepted.iter().any(|&other| rects_intersect(other, bounds)) {
                self.labels[label].enabled = false;
            } else {
                accepted.push(bounds);
            }
        }

        if compare.is_empty() {
            return;
        }
        for domain in &domains {
            for &label in &domain.labels {
                if self.labels[label].enabled && self.collides(label, compare) {
                    self.labels[label].enabled = false;
                }
            }
        }
    }

    fn slice_edges(&self, label: usize) -> [(Point, Point); 2] {
        let f = self.frame;
        let request = &self.requests[label];
        let center = f.center + request.offset;
        let edge = |angle| {
            (
                f.ellipse_point(center, f.inner_radius, f.inner_radius * f.aspect, angle),
                f.ellipse_point(center, f.radius, f.radius * f.aspect, angle),
            )
        };
        [edge(request.start), edge(request.start + request.sweep)]
    }

    fn collides(&self, label: usize, compare: &[usize]) -> bool {
        let rect = self.bounds(label);
        let own = &self.labels[label];
        let (c0, c1) = (own.anchor, own.bend());
        compare
            .iter()
            .filter(|&&other| other != label && self.labels[other].enabled)
            .any(|&other| {
                let theirs = &self.labels[other];
                let (o0, o1) = (theirs.anchor, theirs.bend());
                rects_intersect(rect, theirs.bounds())
                    || segment_intersects_rect(o0, o1, rect)
                    || segments_intersect(o0, o1, c0, c1)
                    || self.slice_edges(other).iter().any(|&(e0, e1)| {
                        segment_intersects_rect(e0, e1, rect) || segments_intersect(c0, c1, e0, e1)
                    })
            })
    }
}

struct ExplodeLevel {
    explode: f64,
    left: Vec<usize>,
    right: Vec<usize>,
    left2: Vec<usize>,
    right2: Vec<usize>,
}

/// Places outside labels for `requests` (in point order).
///
/// Labels of exploded slices are measured against `content`, the others against `plot`, to
/// compute [`OutsideLabels::overflow`].
pub fn place_outside_labels(
    frame: &LabelFrame,
    requests: &[LabelRequest],
    content: Rect,
    plot: Rect,
) -> OutsideLabels {
    place_with_cap(frame, requests, content, plot, MAX_DOMAIN_ITERATIONS)
}

fn place_with_cap(
    frame: &LabelFrame,
    requests: &[LabelRequest],
    content: Rect,
    plot: Rect,
    max_iterations: usize,
) -> OutsideLabels {
    let mut placer = Placer {
        frame,
        requests,
        labels: Vec::with_capacity(requests.len()),
        degraded: false,
        max_iterations,
    };

    let mut levels: Vec<ExplodeLevel> = Vec::new();
    let mut switch_right = false;
    let mut switch_left = false;
    for (slot, request) in requests.iter().enumerate() {
        let angle = request.middle();
        let degrees = standard_angle(angle);
        let right = !(90.0..=270.0).contains(&degrees);
        let touch = frame.ellipse_point(
            frame.center + request.offset,
            frame.radius,
            frame.radius * frame.aspect,
            angle,
        );
        let position = frame.ellipse_point(
            frame.center,
            frame.radius + frame.connector_length + request.explode,
            (frame.radius + request.explode) * frame.aspect + frame.connector_length,
            angle,
        );
        placer.labels.push(OutsideLabel {
            index: request.index,
            right,
            enabled: true,
            position,
            anchor: touch,
            width: request.width,
            height: request.height,
        });

        let pos = match levels.iter().position(|l| l.explode == request.explode) {
            Some(pos) => pos,
            None => {
                levels.push(ExplodeLevel {
                    explode: request.explode,
                    left: Vec::new(),
                    right: Vec::new(),
                    left2: Vec::new(),
                    right2: Vec::new(),
                });
                levels.len() - 1
            }
        };
        let level = &mut levels[pos];
        if degrees > 270.0 && !(level.left.is_empty() && level.left2.is_empty()) {
            switch_right = true;
        }
        if degrees > 90.0 && !(level.right.is_empty() && level.right2.is_empty()) {
            switch_left = true;
        }
        let target = match (right, switch_right, switch_left) {
            (true, true, _) => &mut level.right2,
            (true, false, _) => &mut level.right,
            (false, _, true) => &mut level.left2,
            (false, _, false) => &mut level.left,
        };
        target.push(slot);
    }

    levels.sort_by(|a, b| b.explode.total_cmp(&a.explode));
    let mut compare: Vec<usize> = Vec::new();
    for level in levels {
        let mut left = level.left2;
        left.extend(level.left);
        let mut right = level.right2;
        right.extend(level.right);
        placer.place_side(&left, false, level.explode, &compare);
        placer.place_side(&right, true, level.explode, &compare);
        compare.extend(left);
        compare.extend(right);
    }

    let overflow = placer
        .labels
        .iter()
        .zip(requests)
        .filter(|(label, _)| label.enabled)
        .map(|(label, request)| {
            let allowed = if request.explode > 0.0 { content } else { plot };
            let b = label.bounds();
            (allowed.x0 - b.x0)
                .max(b.x1 - allowed.x1)
                .max(allowed.y0 - b.y0)
                .max(b.y1 - allowed.y1)
        })
        .fold(f64::NEG_INFINITY, f64::max);

    OutsideLabels {
        labels: placer.labels,
        overflow,
        degraded: placer.degraded,
    }
}

/// Anchor of an inside label: on the bisector, `offset` of the way from the hole to the rim.
///
/// A single slice without a hole puts its label in the center.
pub fn inside_label_position(
    slice_center: Point,
    radius: f64,
    inner_radius: f64,
    aspect: f64,
    offset: Size,
    angle: f64,
    single: bool,
) -> Point {
    let distance = if single && inner_radius == 0.0 {
        0.0
    } else {
        offset.normalize(radius - inner_radius) + inner_radius
    };
    let rad = to_radians(angle);
    Point::new(
        slice_center.x + distance * rad.cos(),
        slice_center.y + distance * aspect * rad.sin(),
    )
}

/// Whether `rect` lies inside the flat slice: within the rim, outside the hole and not
/// crossing either radial edge.
pub fn fits_in_slice(
    rect: Rect,
    center: Point,
    inner_radius: f64,
    radius: f64,
    start: f64,
    sweep: f64,
) -> bool {
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    let inside_rim = corners.iter().all(|&p| vector_length(center, p) <= radius);
    let outside_hole = corners.iter().all(|&p| vector_length(center, p) >= inner_radius);
    if !inside_rim || !outside_hole {
        return false;
    }
    if sweep.abs() >= 360.0 {
        return true;
    }
    [start, start + sweep].iter().all(|&angle| {
        let rad = to_radians(angle);
        let dir = Vec2::new(rad.cos(), rad.sin());
        !segment_intersects_rect(center + dir * inner_radius, center + dir * radius, rect)
    })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn frame() -> LabelFrame {
        LabelFrame {
            center: Point::new(200.0, 200.0),
            radius: 100.0,
            inner_radius: 0.0,
            aspect: 1.0,
            connector_length: 20.0,
            critical_angle: 60.0,
        }
    }

    fn request(index: usize, value: f64, start: f64, sweep: f64) -> LabelRequest {
        LabelRequest {
            index,
            value,
            start,
            sweep,
            explode: 0.0,
            offset: Vec2::ZERO,
            width: 40.0,
            height: 12.0,
        }
    }

    fn pie_requests(values: &[f64]) -> Vec<LabelRequest> {
        let sum: f64 = values.iter().sum();
        let mut start = -90.0;
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let sweep = v / sum * 360.0;
                let r = request(i, v, start, sweep);
                start += sweep;
                r
            })
            .collect()
    }

    fn everything() -> Rect {
        Rect::new(-1000.0, -1000.0, 1000.0, 1000.0)
    }

    #[test]
    fn lone_labels_stay_at_their_natural_position() {
        let requests = pie_requests(&[1.0, 1.0]);
        let placed = place_outside_labels(&frame(), &requests, everything(), everything());
        let [right, left] = placed.labels.as_slice() else {
            panic!("two labels expected");
        };
        assert!(right.enabled && left.enabled);
        assert!(right.right && !left.right);
        // Bisectors at 0 and 180 degrees; labels sit on the 120 px ellipse plus the run.
        assert!((right.position.x - 325.0).abs() < 1e-9);
        assert!((right.position.y - 200.0).abs() < 1e-9);
        assert!((left.position.x - 75.0).abs() < 1e-9);
        let [anchor, bend, end] = right.connector();
        assert!((anchor.x - 300.0).abs() < 1e-9);
        assert_eq!(bend, Point::new(320.0, right.position.y));
        assert_eq!(end, right.position);
        assert!(placed.overflow < 0.0);
        assert!(!placed.degraded);
    }

    #[test]
    fn crowded_labels_are_stacked_without_overlap() {
        // Many thin slices on the right side all want to sit near the same spot.
        let mut values = std::vec![2.0; 6];
        values.push(100.0);
        let requests = pie_requests(&values);
        let placed = place_outside_labels(&frame(), &requests, everything(), everything());
        // Stacked labels share edges; ignore rounding noise along them.
        let enabled: Vec<Rect> = placed
            .labels
            .iter()
            .filter(|l| l.enabled)
            .map(|l| l.bounds().inset(-1e-6))
            .collect();
        assert!(enabled.len() >= 2);
        for (i, a) in enabled.iter().enumerate() {
            for b in &enabled[i + 1..] {
                assert!(!rects_intersect(*a, *b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn impossible_layouts_drop_the_smallest_labels() {
        // Labels far taller than the pie: at most a few can be stacked.
        let mut requests = pie_requests(&[5.0, 1.0, 4.0, 2.0, 3.0, 30.0]);
        for r in &mut requests {
            r.height = 60.0;
        }
        let placed = place_outside_labels(&frame(), &requests, everything(), everything());
        let disabled: Vec<usize> = placed
            .labels
            .iter()
            .filter(|l| !l.enabled)
            .map(|l| l.index)
            .collect();
        assert!(!disabled.is_empty());
        assert!(!disabled.contains(&5), "the largest slice keeps its label");
    }

    #[test]
    fn unsettled_domains_lose_their_labels() {
        let mut values = std::vec![2.0; 6];
        values.push(100.0);
        let requests = pie_requests(&values);
        let settled = place_outside_labels(&frame(), &requests, everything(), everything());
        assert!(!settled.degraded);

        // One round is not enough to merge the stacked thin labels.
        let placed = place_with_cap(&frame(), &requests, everything(), everything(), 1);
        assert!(placed.degraded);
        assert!(placed.labels[..6].iter().any(|l| !l.enabled));
        assert!(placed.labels[6].enabled, "the lone left label settles at once");
    }

    #[test]
    fn overflow_measures_the_furthest_label() {
        let requests = pie_requests(&[1.0, 1.0]);
        let tight = Rect::new(90.0, 90.0, 310.0, 310.0);
        let placed = place_outside_labels(&frame(), &requests, tight, tight);
        // The right label ends at 325 + 40.
        assert!((placed.overflow - 55.0).abs() < 1e-9);
    }

    #[test]
    fn inside_labels_sit_on_the_bisector() {
        let p = inside_label_position(
            Point::new(0.0, 0.0),
            100.0,
            20.0,
            1.0,
            Size::Percent(50.0),
            0.0,
            false,
        );
        assert_eq!(p, Point::new(60.0, 0.0));
        let center = inside_label_position(
            Point::new(5.0, 5.0),
            100.0,
            0.0,
            1.0,
            Size::Percent(50.0),
            0.0,
            true,
        );
        assert_eq!(center, Point::new(5.0, 5.0));
    }

    #[test]
    fn labels_must_fit_between_the_edges() {
        let c = Point::ZERO;
        let small = Rect::from_center_size((60.0, 30.0), (10.0, 6.0));
        assert!(fits_in_slice(small, c, 0.0, 100.0, 0.0, 90.0));
        let across = Rect::from_center_size((60.0, 0.0), (10.0, 6.0));
        assert!(!fits_in_slice(across, c, 0.0, 100.0, 0.0, 90.0), "crosses the start edge");
        let beyond = Rect::from_center_size((98.0, 30.0), (10.0, 6.0));
        assert!(!fits_in_slice(beyond, c, 0.0, 100.0, 0.0, 90.0));
        assert!(fits_in_slice(across, c, 0.0, 100.0, -90.0, 360.0));
    }
}
