// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pie/donut component.
//!
//! Mark indexes within the pie namespace:
//! - 2D slices: the point index,
//! - 3D faces: their rank in paint order,
//! - label connectors: [`CONNECTOR_MARKS`] + point index,
//! - labels: [`LABEL_MARKS`] + point index.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

use chartwell_core::geometry::to_radians;
use chartwell_core::{
    ConsistencyState, DrawError, Drawable, Invalidatable, Invalidation, Mark, MarkId, Signal,
    TextAnchor, VisualBase,
};
use kurbo::{BezPath, Point, Rect, Shape, Vec2};
use peniko::Brush;

use super::animation::{AnimationFrame, PieAnimation};
use super::data::{
    DEFAULT_START_ANGLE, PiePoint, SliceAngles, Statistics, TOO_MANY_POINTS, slice_angles,
};
use super::labels::{
    LabelFrame, LabelRequest, OutsideLabel, fits_in_slice, inside_label_position,
    place_outside_labels,
};
use super::three_d::{Extrusion, Face, FaceKind, slice_faces, sort_faces};
#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::measure::{HeuristicTextMeasurer, TextMeasurer};
use crate::path_mark::{PathMarkSpec, StrokeStyle};
use crate::sector_mark::SectorMarkSpec;
use crate::text_mark::TextMarkSpec;
use crate::theme::{Fill, Pie3dTheme, PieTheme};
use crate::z_order;

/// First mark index of outside label connectors.
pub const CONNECTOR_MARKS: u32 = 1 << 30;
/// First mark index of labels.
pub const LABEL_MARKS: u32 = 1 << 31;

/// Rounds of radius reduction made to fit outside labels.
const MAX_FIT_ROUNDS: usize = 5;
/// Label overflow tolerated without shrinking the pie.
const OVERFLOW_TOLERANCE: f64 = 10.0;

/// A laid out slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieSlice {
    /// Point index.
    pub index: usize,
    /// Start angle, degrees clockwise from the positive x axis.
    pub start: f64,
    /// Sweep.
    pub sweep: f64,
    /// Whether the slice is drawn exploded.
    pub exploded: bool,
    /// Pie center moved by the explode offset.
    pub center: Point,
    /// Bounding box of everything drawn for the slice.
    pub bounds: Rect,
}

impl PieSlice {
    /// Bisecting angle.
    pub fn middle(&self) -> f64 {
        self.start + self.sweep / 2.0
    }
}

/// A laid out label.
#[derive(Clone, Debug, PartialEq)]
pub struct PieLabel {
    /// Point index.
    pub index: usize,
    /// Label text.
    pub text: String,
    /// Text anchor point.
    pub position: Point,
    /// How the text hangs off [`position`](Self::position).
    pub anchor: TextAnchor,
    /// Measured label box.
    pub bounds: Rect,
    /// Connector polyline of outside labels.
    pub connector: Option<[Point; 3]>,
    /// Whether the label is drawn.
    pub visible: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Geometry {
    center: Point,
    radius: f64,
    inner_radius: f64,
    explode: f64,
    connector_length: f64,
    aspect: f64,
    height: f64,
}

/// Pie and donut chart.
#[derive(Debug)]
pub struct Pie<M: TextMeasurer + Debug = HeuristicTextMeasurer> {
    base: VisualBase,
    namespace: u32,
    theme: PieTheme,
    theme3d: Pie3dTheme,
    mode3d: bool,
    points: Vec<PiePoint>,
    exploded: Vec<bool>,
    statistics: Statistics,
    angles: Vec<SliceAngles>,
    geometry: Geometry,
    slices: Vec<PieSlice>,
    faces: Vec<Face>,
    labels: Vec<PieLabel>,
    labels_degraded: bool,
    animation: PieAnimation,
    frame: Option<AnimationFrame>,
    measurer: M,
    output: Vec<Mark>,
}

impl Pie {
    /// Creates an empty pie whose marks live in `namespace`.
    pub fn new(namespace: u32, theme: PieTheme) -> Self {
        Self::with_measurer(namespace, theme, HeuristicTextMeasurer)
    }
}

impl<M: TextMeasurer + Debug> Pie<M> {
    /// Creates an empty pie measuring labels with `measurer`.
    pub fn with_measurer(namespace: u32, theme: PieTheme, measurer: M) -> Self {
        Self {
            base: VisualBase::new(
                ConsistencyState::PieData
                    | ConsistencyState::PieLabels
                    | ConsistencyState::Appearance,
                Signal::DataChanged.into(),
            ),
            namespace,
            theme,
            theme3d: Pie3dTheme::default(),
            mode3d: false,
            points: Vec::new(),
            exploded: Vec::new(),
            statistics: Statistics::default(),
            angles: Vec::new(),
            geometry: Geometry::default(),
            slices: Vec::new(),
            faces: Vec::new(),
            labels: Vec::new(),
            labels_degraded: false,
            animation: PieAnimation::default(),
            frame: None,
            measurer,
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

    /// Current theme.
    pub fn theme(&self) -> &PieTheme {
        &self.theme
    }

    /// Replaces the theme, invalidating only what the change affects.
    pub fn set_theme(&mut self, theme: PieTheme) {
        if self.theme == theme {
            return;
        }
        let old = core::mem::replace(&mut self.theme, theme);
        let new = &self.theme;
        let state = if old.start_angle != new.start_angle {
            ConsistencyState::PieData
        } else if old.radius != new.radius
            || old.inner_radius != new.inner_radius
            || old.explode != new.explode
            || old.connector_length != new.connector_length
            || old.outside_labels_space != new.outside_labels_space
        {
            ConsistencyState::Bounds
        } else if old.outside_labels != new.outside_labels
            || old.outside_labels_critical_angle != new.outside_labels_critical_angle
            || old.inside_labels_offset != new.inside_labels_offset
            || old.label_font_size != new.label_font_size
        {
            ConsistencyState::PieLabels
        } else {
            ConsistencyState::Appearance
        };
        self.base.invalidate(state, Signal::NeedsRedraw);
    }

    /// Replaces the 3D options.
    pub fn set_theme3d(&mut self, theme3d: Pie3dTheme) {
        if self.theme3d != theme3d {
            self.theme3d = theme3d;
            if self.mode3d {
                self.base
                    .invalidate(ConsistencyState::Bounds, Signal::NeedsRedraw);
            }
        }
    }

    /// Whether slices are drawn extruded.
    pub fn mode3d(&self) -> bool {
        self.mode3d
    }

    /// Switches between flat and extruded slices.
    pub fn set_mode3d(&mut self, mode3d: bool) {
        if self.mode3d != mode3d {
            self.mode3d = mode3d;
            if mode3d {
                self.animation.stop();
                self.frame = None;
            }
            self.base
                .invalidate(ConsistencyState::Bounds, Signal::NeedsRedraw);
        }
    }

    /// Replaces the data. Explode flags of surviving indexes are kept.
    pub fn set_data(&mut self, points: Vec<PiePoint>) {
        self.exploded.resize(points.len(), false);
        self.points = points;
        self.base.invalidate(
            ConsistencyState::PieData,
            Signal::NeedsRedraw | Signal::DataChanged,
        );
    }

    /// The data.
    pub fn points(&self) -> &[PiePoint] {
        &self.points
    }

    /// Statistics of the last drawn data.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Slices of the last layout, in point order (missing points have none).
    pub fn slices(&self) -> &[PieSlice] {
        &self.slices
    }

    /// 3D faces of the last layout in paint order (empty in 2D).
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Labels of the last layout.
    pub fn labels(&self) -> &[PieLabel] {
        &self.labels
    }

    /// Whether outside label placement gave up on some labels.
    pub fn labels_degraded(&self) -> bool {
        self.labels_degraded
    }

    /// Center of the last layout (the top lid center in 3D).
    pub fn center(&self) -> Point {
        self.geometry.center
    }

    /// Outer radius of the last layout.
    pub fn radius(&self) -> f64 {
        self.geometry.radius
    }

    /// Hole radius of the last layout.
    pub fn inner_radius(&self) -> f64 {
        self.geometry.inner_radius
    }

    /// Whether the point at `index` is marked exploded.
    pub fn is_exploded(&self, index: usize) -> bool {
        self.exploded.get(index).copied().unwrap_or(false)
    }

    fn set_exploded(&mut self, index: usize, exploded: bool) -> bool {
        let Some(flag) = self.exploded.get_mut(index) else {
            return false;
        };
        if *flag == exploded {
            return false;
        }
        *flag = exploded;
        self.base.invalidate(
            ConsistencyState::PieLabels | ConsistencyState::Appearance,
            Signal::NeedsRedraw,
        );
        true
    }

    /// Explodes the point at `index`. Returns whether anything changed.
    pub fn select(&mut self, index: usize) -> bool {
        self.set_exploded(index, true)
    }

    /// Puts the point at `index` back. Returns whether anything changed.
    pub fn unselect(&mut self, index: usize) -> bool {
        self.set_exploded(index, false)
    }

    /// Flips the explode state of the point at `index` and returns the new state.
    pub fn toggle_explode(&mut self, index: usize) -> bool {
        let exploded = !self.is_exploded(index);
        self.set_exploded(index, exploded);
        self.is_exploded(index)
    }

    /// Plays the appear animation from `now` (ms) over the theme's animation duration.
    ///
    /// Extruded pies are not animated.
    pub fn animate(&mut self, now: f64) {
        if self.mode3d {
            tracing::debug!("pie: 3D mode is not animated");
            return;
        }
        self.animation.start(now, self.theme.animation_duration);
        self.frame = self
            .animation
            .tick(now)
            .filter(|frame| *frame != AnimationFrame::DONE);
        self.base
            .invalidate(ConsistencyState::Appearance, Signal::NeedsRedraw);
    }

    /// Advances the animation to `now`. Returns `true` when the pie has to be drawn again.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(frame) = self.animation.tick(now) else {
            return false;
        };
        self.frame = (frame != AnimationFrame::DONE).then_some(frame);
        self.base
            .invalidate(ConsistencyState::Appearance, Signal::NeedsRedraw);
        true
    }

    /// Whether the animation is playing.
    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    /// Frame drawn by the next pass, `None` once the animation finished.
    pub fn animation_frame(&self) -> Option<AnimationFrame> {
        self.frame
    }

    fn mark_id(&self, index: u32) -> MarkId {
        MarkId::compose(self.namespace, index)
    }

    fn aspect(&self) -> f64 {
        if self.mode3d { self.theme3d.aspect } else { 1.0 }
    }

    fn recalculate(&mut self) {
        self.statistics = Statistics::of(&self.points);
        self.angles = slice_angles(&self.points, self.theme.start_angle);
        if self.points.len() > TOO_MANY_POINTS {
            tracing::warn!(
                points = self.points.len(),
                "pie: more than {TOO_MANY_POINTS} points are hard to read"
            );
        }
    }

    fn explode_allowed(&self) -> bool {
        self.angles.len() > 1 && self.angles.iter().all(|a| a.sweep.abs() < 360.0)
    }

    /// Sizes the pie inside `bounds` for the given outer radius limit.
    fn size(&mut self, bounds: Rect, radius: f64) {
        let g = &mut self.geometry;
        g.radius = radius.max(0.0);
        let connector = if self.mode3d {
            self.theme3d.connector_length
        } else {
            self.theme.connector_length
        };
        g.connector_length = connector.normalize(g.radius);
        g.inner_radius = self.theme.inner_radius.normalize(g.radius).clamp(0.0, g.radius);
        g.height = if self.mode3d {
            g.radius * self.theme3d.thickness
        } else {
            0.0
        };
        g.center = bounds.center() - Vec2::new(0.0, g.height / 2.0);
    }

    fn layout(&mut self, bounds: Rect) {
        let min_side = bounds.width().min(bounds.height());
        let explode = if self.mode3d {
            self.theme3d.explode
        } else {
            self.theme.explode
        };
        self.geometry.explode = explode.normalize(min_side);
        self.geometry.aspect = self.aspect();

        let space = if self.theme.outside_labels {
            self.theme.outside_labels_space.normalize(min_side)
        } else {
            0.0
        };
        let margin = space + self.geometry.explode;
        let area = Rect::new(
            bounds.x0 + margin,
            bounds.y0 + margin,
            (bounds.x1 - margin).max(bounds.x0 + margin),
            (bounds.y1 - margin).max(bounds.y0 + margin),
        );
        let mut radius = self.theme.radius.normalize(min_side);
        if self.mode3d {
            let depth = 2.0 * self.theme3d.aspect + self.theme3d.thickness;
            radius = radius.min(area.width() / 2.0);
            if depth > 0.0 {
                radius = radius.min(area.height() / depth);
            }
        } else {
            radius = radius.min(area.width().min(area.height()) / 2.0);
        }
        self.size(area, radius);
        self.place_slices();

        if self.theme.outside_labels {
            let plot = Rect::new(
                bounds.x0 + self.geometry.explode,
                bounds.y0 + self.geometry.explode,
                bounds.x1 - self.geometry.explode,
                bounds.y1 - self.geometry.explode,
            );
            for _ in 0..MAX_FIT_ROUNDS {
                let overflow = self.place_outside(bounds, plot);
                if overflow.round() <= OVERFLOW_TOLERANCE || self.geometry.radius <= 0.0 {
                    break;
                }
                let radius = self.geometry.radius - overflow;
                self.size(area, radius);
                self.place_slices();
            }
        } else {
            self.place_inside();
        }
    }

    fn explode_offset(&self, angle: f64) -> Vec2 {
        let rad = to_radians(angle);
        let e = self.geometry.explode;
        Vec2::new(e * rad.cos(), e * self.geometry.aspect * rad.sin())
    }

    fn place_slices(&mut self) {
        let allowed = self.explode_allowed();
        let g = self.geometry;
        let extrusion = self.extrusion();
        self.faces.clear();
        self.slices.clear();
        for angles in &self.angles {
            let exploded = allowed && self.is_exploded(angles.index);
            let offset = if exploded {
                self.explode_offset(angles.middle())
            } else {
                Vec2::ZERO
            };
            let bounds = if self.mode3d {
                let faces = slice_faces(
                    angles.index,
                    angles.start,
                    angles.sweep,
                    offset,
                    g.inner_radius > 0.0,
                );
                let bounds = faces
                    .iter()
                    .map(|f| extrusion.face_path(f).bounding_box())
                    .reduce(|a, b| a.union(b))
                    .unwrap_or_default();
                self.faces.extend(faces);
                bounds
            } else {
                SectorMarkSpec::new(
                    MarkId(0),
                    g.center + offset,
                    g.inner_radius,
                    g.radius,
                    angles.start,
                    angles.sweep,
                )
                .path()
                .bounding_box()
            };
            self.slices.push(PieSlice {
                index: angles.index,
                start: angles.start,
                sweep: angles.sweep,
                exploded,
                center: g.center + offset,
                bounds,
            });
        }
        sort_faces(&mut self.faces);
    }

    fn extrusion(&self) -> Extrusion {
        let g = &self.geometry;
        Extrusion {
            center: g.center,
            radius: g.radius,
            inner_radius: g.inner_radius,
            aspect: g.aspect,
            height: g.height,
        }
    }

    fn label_text(&self, index: usize) -> String {
        let value = self.points[index].value.unwrap_or(0.0);
        let percent = self.statistics.percent(value).unwrap_or(0.0);
        format!("{percent:.1}%")
    }

    fn place_inside(&mut self) {
        let g = self.geometry;
        let single = self.slices.len() == 1;
        let font_size = self.theme.label_font_size;
        self.labels = self
            .slices
            .iter()
            .map(|slice| {
                let text = self.label_text(slice.index);
                let (width, height) = self.measurer.measure(&text, font_size);
                let position = inside_label_position(
                    slice.center,
                    g.radius,
                    g.inner_radius,
                    g.aspect,
                    self.theme.inside_labels_offset,
                    slice.middle(),
                    single,
                );
                let rect = Rect::from_center_size(position, (width, height));
                let visible = self.mode3d
                    || fits_in_slice(
                        rect,
                        slice.center,
                        g.inner_radius,
                        g.radius,
                        slice.start,
                        slice.sweep,
                    );
                PieLabel {
                    index: slice.index,
                    text,
                    position,
                    anchor: TextAnchor::Middle,
                    bounds: rect,
                    connector: None,
                    visible,
                }
            })
            .collect();
        self.labels_degraded = false;
    }

    /// Places outside labels and returns how far they overflow.
    fn place_outside(&mut self, content: Rect, plot: Rect) -> f64 {
        let g = self.geometry;
        let frame = LabelFrame {
            center: g.center + Vec2::new(0.0, g.height / 2.0),
            radius: g.radius,
            inner_radius: g.inner_radius,
            aspect: g.aspect,
            connector_length: g.connector_length,
            critical_angle: self.theme.outside_labels_critical_angle,
        };
        let font_size = self.theme.label_font_size;
        let mut texts = Vec::with_capacity(self.slices.len());
        let requests: Vec<LabelRequest> = self
            .slices
            .iter()
            .map(|slice| {
                let text = self.label_text(slice.index);
                let (width, height) = self.measurer.measure(&text, font_size);
                texts.push(text);
                LabelRequest {
                    index: slice.index,
                    value: self.points[slice.index].value.unwrap_or(0.0),
                    start: slice.start,
                    sweep: slice.sweep,
                    explode: if slice.exploded { g.explode } else { 0.0 },
                    offset: slice.center - g.center,
                    width,
                    height,
                }
            })
            .collect();

        let placed = place_outside_labels(&frame, &requests, content, plot);
        self.labels_degraded = placed.degraded;
        self.labels = placed
            .labels
            .iter()
            .zip(texts)
            .map(|(label, text)| PieLabel {
                index: label.index,
                text,
                position: label.position,
                anchor: if label.right {
                    TextAnchor::Start
                } else {
                    TextAnchor::End
                },
                bounds: label.bounds(),
                connector: Some(label.connector()),
                visible: label.enabled,
            })
            .collect();
        placed.overflow
    }

    /// Center, radii, start and sweep a slice is drawn with in the current frame.
    fn sector(&self, slice: &PieSlice) -> (Point, f64, f64, f64, f64) {
        let g = &self.geometry;
        let Some(frame) = self.frame else {
            return (slice.center, g.inner_radius, g.radius, slice.start, slice.sweep);
        };
        let start = frame.grow(self.theme.start_angle + DEFAULT_START_ANGLE, slice.start);
        let sweep = frame.grow(0.0, slice.sweep);
        let center = if slice.exploded {
            g.center + self.explode_offset(start + sweep / 2.0)
        } else {
            g.center
        };
        (
            center,
            frame.grow(0.0, g.inner_radius),
            frame.grow(0.0, g.radius),
            start,
            sweep,
        )
    }

    fn slice_fill(&self, index: usize) -> Fill {
        let palette = &self.theme.palette;
        if palette.is_empty() {
            Fill::None
        } else {
            palette[index % palette.len()]
        }
    }

    fn rebuild_marks(&mut self) {
        let z = self.base.z_index();
        let stroke = StrokeStyle::solid(self.theme.slice_stroke.brush(), 1.0);
        self.output.clear();

        if self.mode3d {
            let extrusion = self.extrusion();
            for (rank, face) in self.faces.iter().enumerate() {
                let Ok(rank) = u32::try_from(rank) else {
                    break;
                };
                let fill = shade(self.slice_fill(face.index), face.kind);
                self.output.push(
                    PathMarkSpec::new(self.mark_id(rank), extrusion.face_path(face))
                        .with_fill(fill)
                        .with_z_index(z + z_order::PIE_SLICES)
                        .mark(),
                );
            }
        } else {
            for slice in &self.slices {
                let Ok(index) = u32::try_from(slice.index) else {
                    continue;
                };
                let (center, inner_radius, radius, start, sweep) = self.sector(slice);
                self.output.push(
                    SectorMarkSpec::new(
                        self.mark_id(index),
                        center,
                        inner_radius,
                        radius,
                        start,
                        sweep,
                    )
                    .with_fill(self.slice_fill(slice.index).brush())
                    .with_stroke(stroke.clone())
                    .with_z_index(z + z_order::PIE_SLICES)
                    .mark(),
                );
            }
        }

        let opacity = self.frame.map_or(1.0, |frame| frame.labels);
        if opacity <= 0.0 {
            return;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "opacity is in [0, 1]"
        )]
        let fade = |brush: Brush| brush.multiply_alpha(opacity as f32);
        let connector_stroke =
            StrokeStyle::solid(fade(self.theme.connector_stroke.brush()), 1.0);
        let label_fill = fade(self.theme.label_fill.brush());
        for label in self.labels.iter().filter(|l| l.visible) {
            let Ok(index) = u32::try_from(label.index) else {
                continue;
            };
            if let Some([anchor, bend, end]) = label.connector {
                let mut path = BezPath::new();
                path.move_to(anchor);
                path.line_to(bend);
                path.line_to(end);
                let hidden = self.mode3d && anchor.y < self.geometry.center.y;
                let order = if hidden {
                    z_order::PIE_HIDDEN_CONNECTORS
                } else {
                    z_order::PIE_CONNECTORS
                };
                self.output.push(
                    PathMarkSpec::new(self.mark_id(CONNECTOR_MARKS + index), path)
                        .with_stroke(connector_stroke.clone())
                        .with_z_index(z + order)
                        .mark(),
                );
            }
            self.output.push(
                TextMarkSpec::in_box(
                    self.mark_id(LABEL_MARKS + index),
                    label.bounds,
                    label.text.clone(),
                    label.anchor,
                )
                .with_font_size(self.theme.label_font_size)
                .with_fill(label_fill.clone())
                .with_z_index(z + z_order::PIE_LABELS)
                .mark(),
            );
        }
    }
}

/// Face paint: lids keep the slice color, walls and sides are darkened.
fn shade(fill: Fill, kind: FaceKind) -> Brush {
    let factor: f32 = match kind {
        FaceKind::Top => return fill.brush(),
        FaceKind::Bottom | FaceKind::OuterBack | FaceKind::InnerFront => 0.6,
        FaceKind::Start | FaceKind::End => 0.75,
        FaceKind::OuterFront | FaceKind::InnerBack => 0.85,
    };
    match fill {
        Fill::None => fill.brush(),
        Fill::Solid(color) => Brush::Solid(color.map_lightness(|l| l * factor)),
    }
}

impl<M: TextMeasurer + Debug> Invalidatable for Pie<M> {
    fn invalidation(&self) -> &Invalidation {
        self.base.invalidation()
    }

    fn invalidation_mut(&mut self) -> &mut Invalidation {
        self.base.invalidation_mut()
    }
}

impl<M: TextMeasurer + Debug> Drawable for Pie<M> {
    fn draw(&mut self) -> Result<bool, DrawError> {
        if !self.base.check_drawing_needed(&mut self.output)? {
            return Ok(false);
        }

        let inv = self.base.invalidation_mut();
        if inv.begin(ConsistencyState::ZIndex) {
            inv.mark_consistent(ConsistencyState::ZIndex);
        }
        if inv.begin(ConsistencyState::Container) {
            inv.mark_consistent(ConsistencyState::Container);
        }

        let data = inv.begin(ConsistencyState::PieData);
        if data {
            self.recalculate();
        }

        let inv = self.base.invalidation_mut();
        let bounds_dirty = inv.begin(ConsistencyState::Bounds);
        let labels = inv.begin(ConsistencyState::PieLabels);
        if data || bounds_dirty || labels {
            if let Some(bounds) = self.base.parent_bounds() {
                self.layout(bounds);
            }
            self.base.invalidation_mut().mark_consistent(
                ConsistencyState::PieData
                    | ConsistencyState::Bounds
                    | ConsistencyState::PieLabels,
            );
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
