// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gantt timeline component.
//!
//! A [`Timeline`] owns the task tree, the date-time scale and the rows controller. Mutations of
//! the tree or the scale are picked up at the next [`Drawable::draw`] through their revision
//! counters: a tree change rebuilds rows and refits the scale, a scale change re-lays out bars
//! and connectors.
//!
//! Mark indexes within the timeline namespace:
//! - bars: `row * 256 + slot` (slot 0 the bar, 1 its progress, 2 the baseline, 3.. periods),
//! - connectors: [`CONNECTOR_MARKS`] + `2 * n` for the line and `+ 1` for the arrow,
//! - edit controls: [`EDIT_MARKS`] + a fixed slot.

extern crate alloc;

use alloc::vec::Vec;

use chartwell_core::{
    ConsistencyState, DrawError, Drawable, Invalidatable, Invalidation, Mark, MarkId, Signal,
    VisualBase,
};
use hashbrown::HashMap;
use kurbo::{BezPath, Line, Point, Rect, Shape};

use super::connector::{ConnectorEnd, arrow_path, culled_path, route};
use super::controller::RowsController;
use super::data::{Connector, ConnectorType, ItemId, ItemShape, TaskTree};
use super::edit::{
    BarKind, DragSession, EditControls, EditError, EditHandle, EditOutcome, EditTarget, Gesture,
};
use super::layout::{RowFrame, bracket_path, diamond_path, is_visible, pixel_shift, progress_bar};
use crate::datetime_scale::DateTimeScale;
#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::path_mark::{PathMarkSpec, StrokeStyle};
use crate::rect_mark::RectMarkSpec;
use crate::theme::TimelineTheme;
use crate::z_order;

/// Mark slots reserved per row.
pub const BAR_SLOTS: u32 = 256;
/// First mark index of connectors.
pub const CONNECTOR_MARKS: u32 = 1 << 30;
/// First mark index of edit controls.
pub const EDIT_MARKS: u32 = 1 << 31;

const SLOT_BAR: u32 = 0;
const SLOT_PROGRESS: u32 = 1;
const SLOT_BASELINE: u32 = 2;
const SLOT_FIRST_PERIOD: u32 = 3;

/// A laid out bar: what is painted and what pointer hits are tested against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineBar {
    /// Bar kind.
    pub kind: BarKind,
    /// Owning item.
    pub item: ItemId,
    /// Period position for resource bars.
    pub period: Option<usize>,
    /// Row index.
    pub row: usize,
    /// Pixel bounds.
    pub bounds: Rect,
    /// Start date.
    pub start: f64,
    /// End date.
    pub end: f64,
    /// Unrounded x of the start date (the center date of milestones).
    pub start_x: f64,
    /// Progress overlay share (plain bars).
    pub progress: Option<f64>,
    /// Whether any part is inside the visible window.
    pub visible: bool,
}

impl TimelineBar {
    fn target(&self) -> EditTarget {
        EditTarget {
            item: self.item,
            period: self.period,
            kind: self.kind,
            bounds: self.bounds,
            progress: self.progress,
        }
    }

    fn same_bar(&self, selection: &Selection) -> bool {
        self.item == selection.item && self.period == selection.period && self.kind == selection.kind
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Selection {
    item: ItemId,
    period: Option<usize>,
    kind: BarKind,
}

#[derive(Clone, Debug)]
struct DrawnConnector {
    line: BezPath,
    arrow: Option<BezPath>,
}

/// Gantt timeline: bars, connectors and live editing.
#[derive(Debug)]
pub struct Timeline {
    base: VisualBase,
    namespace: u32,
    theme: TimelineTheme,
    tree: TaskTree,
    scale: DateTimeScale,
    controller: RowsController,
    bars: Vec<TimelineBar>,
    connectors: Vec<DrawnConnector>,
    selection: Option<Selection>,
    controls: Option<EditControls>,
    gesture: Gesture,
    pressed: Option<TimelineBar>,
    tree_revision: Option<u64>,
    scale_revision: Option<u64>,
    output: Vec<Mark>,
}

impl Timeline {
    /// Creates an empty timeline whose marks live in `namespace`.
    pub fn new(namespace: u32, theme: TimelineTheme) -> Self {
        Self {
            base: VisualBase::new(
                ConsistencyState::GanttData
                    | ConsistencyState::GanttPosition
                    | ConsistencyState::Appearance,
                Signal::DataChanged.into(),
            ),
            namespace,
            controller: RowsController::new(theme.row_height),
            theme,
            tree: TaskTree::new(),
            scale: DateTimeScale::new(),
            bars: Vec::new(),
            connectors: Vec::new(),
            selection: None,
            controls: None,
            gesture: Gesture::Idle,
            pressed: None,
            tree_revision: None,
            scale_revision: None,
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
    pub fn theme(&self) -> &TimelineTheme {
        &self.theme
    }

    /// Replaces the options, invalidating only what the change affects.
    pub fn set_theme(&mut self, theme: TimelineTheme) {
        if self.theme == theme {
            return;
        }
        let old = core::mem::replace(&mut self.theme, theme);
        let state = if old.row_height != self.theme.row_height {
            self.controller.set_default_row_height(self.theme.row_height);
            ConsistencyState::GanttData
        } else if old.header_height != self.theme.header_height
            || old.stroke_thickness != self.theme.stroke_thickness
            || old.baseline_above != self.theme.baseline_above
        {
            ConsistencyState::GanttPosition
        } else {
            ConsistencyState::Appearance
        };
        self.base.invalidate(state, Signal::NeedsRedraw);
    }

    /// The task tree.
    pub fn tree(&self) -> &TaskTree {
        &self.tree
    }

    /// The task tree, mutably. Changes are picked up by the next draw.
    ///
    /// Mutating the tree while a gesture is in flight makes its commit fail with
    /// [`EditError::TreeMutated`].
    pub fn tree_mut(&mut self) -> &mut TaskTree {
        &mut self.tree
    }

    /// The date-time scale.
    pub fn scale(&self) -> &DateTimeScale {
        &self.scale
    }

    /// The date-time scale, mutably. Changes are picked up by the next draw.
    pub fn scale_mut(&mut self) -> &mut DateTimeScale {
        &mut self.scale
    }

    /// The rows controller.
    pub fn controller(&self) -> &RowsController {
        &self.controller
    }

    /// Switches to resource rows: one bar per period instead of one bar per task.
    pub fn set_resources(&mut self, resources: bool) {
        self.controller.set_resources(resources);
        self.tree_revision = None;
        self.base
            .invalidate(ConsistencyState::GanttData, Signal::NeedsRedraw);
    }

    /// Bars of the last layout, in row order.
    pub fn bars(&self) -> &[TimelineBar] {
        &self.bars
    }

    /// Number of connectors drawn by the last layout.
    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// The current gesture.
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Edit controls of the selected bar, as of the last draw.
    pub fn edit_controls(&self) -> Option<&EditControls> {
        self.controls.as_ref()
    }

    /// Area below the header where rows are drawn.
    pub fn rows_area(&self) -> Option<Rect> {
        let b = self.base.parent_bounds()?;
        let top = (b.y0 + self.theme.header_height).min(b.y1);
        Some(Rect::new(b.x0, top, b.x1, b.y1))
    }

    /// Fits the scale to the data.
    ///
    /// The first fit shows the first tenth of the total range; later fits keep the visible
    /// span and re-anchor it at the (possibly moved) window start.
    pub fn init_scale(&mut self) {
        let fresh = self.scale.is_empty();
        let old_span = if fresh { 0.0 } else { self.scale.range().span() };
        self.scale.suspend_signals_dispatching();
        match self.controller.date_range() {
            Some((min, max)) => self.scale.set_data_range(min, max),
            None => self.scale.set_data_range(f64::NAN, f64::NAN),
        }
        if fresh {
            if self.scale.data_range().is_some() {
                let total = self.scale.total_range();
                self.scale
                    .zoom_to(total.min, Some(total.min + (total.span() / 10.0).round()));
            }
        } else if old_span != 0.0 {
            let range = self.scale.range();
            self.scale.zoom_to(range.min, Some(range.min + old_span));
        }
        self.scale.resume_signals_dispatching(true);
    }

    /// Scrolls by pixels.
    ///
    /// A user scroll (`drag_scrolling == false`) ends any gesture and clears the selection.
    /// Auto-scroll during a bar drag may move the window past the data; connector drags stay
    /// inside the total range.
    pub fn scroll(&mut self, dx: f64, dy: f64, drag_scrolling: bool) {
        if !drag_scrolling {
            self.end_gesture();
            self.selection = None;
        }
        if dy != 0.0 && dy.is_finite() {
            let position = self.controller.scroll_position();
            self.controller.scroll_to(position + dy);
            self.base
                .invalidate(ConsistencyState::GanttPosition, Signal::NeedsRedraw);
        }
        if dx != 0.0 {
            if let Some(area) = self.rows_area().filter(|a| a.width() > 0.0) {
                let ratio = dx / area.width();
                let force = drag_scrolling
                    && self
                        .gesture
                        .session()
                        .is_some_and(|s| !s.handle.is_connector());
                if force {
                    self.scale.ratio_force_scroll(ratio);
                    if let Some(session) = self.gesture.session_mut() {
                        session.forced = true;
                    }
                } else {
                    self.scale.ratio_scroll(ratio);
                }
            }
        }
        self.base
            .invalidate(ConsistencyState::Appearance, Signal::NeedsRedraw);
    }

    /// The topmost visible bar under `point`.
    pub fn hit_test(&self, point: Point) -> Option<&TimelineBar> {
        self.bars
            .iter()
            .rev()
            .find(|bar| bar.visible && bar.bounds.contains(point))
    }

    /// Selects the bar of `item` (and `period`), showing its edit controls.
    ///
    /// Returns `false` if no such bar was laid out.
    pub fn select(&mut self, item: ItemId, period: Option<usize>) -> bool {
        let bar = self
            .bars
            .iter()
            .filter(|b| b.item == item && b.period == period)
            .min_by_key(|b| b.kind == BarKind::Baseline);
        self.selection = bar.map(|b| Selection {
            item: b.item,
            period: b.period,
            kind: b.kind,
        });
        self.base
            .invalidate(ConsistencyState::Appearance, Signal::NeedsRedraw);
        self.selection.is_some()
    }

    /// The selected bar.
    pub fn selected(&self) -> Option<&TimelineBar> {
        let selection = self.selection?;
        self.bars.iter().find(|b| b.same_bar(&selection))
    }

    /// Clears the selection and any gesture.
    pub fn clear_selection(&mut self) {
        self.end_gesture();
        if self.selection.take().is_some() {
            self.base
                .invalidate(ConsistencyState::Appearance, Signal::NeedsRedraw);
        }
    }

    /// Presses the pointer.
    ///
    /// A press on a handle of the selected bar arms that handle; a press on another bar selects
    /// it and arms its preview; a press elsewhere clears the selection. Any previous gesture is
    /// torn down first.
    pub fn pointer_down(&mut self, point: Point) -> Option<EditHandle> {
        self.end_gesture();
        let from_controls = self.selected().and_then(|bar| {
            EditControls::new(&bar.target(), bar.bounds)
                .hit(point)
                .map(|handle| (*bar, handle))
        });
        let pressed = from_controls
            .or_else(|| self.hit_test(point).map(|bar| (*bar, EditHandle::Preview)));
        self.base
            .invalidate(ConsistencyState::Appearance, Signal::NeedsRedraw);
        let Some((bar, handle)) = pressed else {
            self.selection = None;
            return None;
        };
        self.selection = Some(Selection {
            item: bar.item,
            period: bar.period,
            kind: bar.kind,
        });
        self.pressed = Some(bar);
        self.gesture = Gesture::Armed(DragSession {
            handle,
            target: bar.target(),
            origin: point,
            pointer: point,
            auto_scroll: Default::default(),
            tree_revision: self.tree.revision(),
            forced: false,
        });
        Some(handle)
    }

    /// Moves the pointer at time `now` (ms).
    pub fn pointer_move(&mut self, point: Point, now: f64) {
        if self.gesture.is_idle() {
            return;
        }
        self.gesture.start_drag();
        let area = self.rows_area();
        if let Some(session) = self.gesture.session_mut() {
            session.pointer = point;
            if let (Some(vertical), Some(area)) = (session.scroll_axes(), area) {
                session.auto_scroll.update(point, area, vertical, now);
            }
        }
        self.base
            .invalidate(ConsistencyState::Appearance, Signal::NeedsRedraw);
    }

    /// Advances the auto-scroll timer of the gesture. Returns `true` if it scrolled.
    pub fn tick(&mut self, now: f64) -> bool {
        let delta = match &mut self.gesture {
            Gesture::Dragging(s) | Gesture::Connecting(s) => s.auto_scroll.tick(now),
            _ => None,
        };
        match delta {
            Some(delta) => {
                self.scroll(delta.x, delta.y, true);
                true
            }
            None => false,
        }
    }

    /// Drops the gesture without changing data.
    pub fn cancel_gesture(&mut self) {
        self.end_gesture();
        self.base
            .invalidate(ConsistencyState::Appearance, Signal::NeedsRedraw);
    }

    /// Tears down the gesture without committing.
    ///
    /// A window force-scrolled past the data is brought back inside the total range.
    fn end_gesture(&mut self) {
        self.pressed = None;
        if self.gesture.cancel().is_some_and(|session| session.forced) {
            self.init_scale();
        }
    }

    /// Releases the pointer, committing the gesture.
    ///
    /// Data is written in one batch, so tree listeners are notified once; the scale is then
    /// refitted and the selection cleared. On error the data is left untouched, and a window
    /// force-scrolled during the drag is still brought back inside the total range.
    pub fn pointer_up(&mut self, point: Point) -> Result<EditOutcome, EditError> {
        let armed_only = matches!(self.gesture, Gesture::Armed(_));
        let Some(mut session) = self.gesture.commit() else {
            return Err(EditError::NotDragging);
        };
        let pressed = self.pressed.take();
        self.base
            .invalidate(ConsistencyState::Appearance, Signal::NeedsRedraw);
        session.pointer = point;
        let result = if armed_only {
            Ok(EditOutcome::Unchanged)
        } else {
            self.finish(&session, pressed)
        };
        match result {
            Ok(outcome) if outcome != EditOutcome::Unchanged => {
                self.selection = None;
                self.apply_data_change();
            }
            _ if session.forced => self.init_scale(),
            _ => {}
        }
        result
    }

    fn finish(
        &mut self,
        session: &DragSession,
        pressed: Option<TimelineBar>,
    ) -> Result<EditOutcome, EditError> {
        if self.tree.revision() != session.tree_revision {
            tracing::warn!(item = %session.target.item, "task tree changed during the gesture");
            return Err(EditError::TreeMutated);
        }
        let Some(bar) = pressed else {
            return Err(EditError::NotDragging);
        };
        self.commit(session, bar.start, bar.end, bar.start_x)
    }

    /// Adds a connector from `from` to `to` (items or periods), finish-start by default.
    pub fn add_connector(
        &mut self,
        from: ItemId,
        to: ItemId,
        kind: Option<ConnectorType>,
    ) -> Result<(), EditError> {
        if from == to {
            return Err(EditError::SelfConnection);
        }
        if !self.tree.contains(to) && self.tree.find_period(to).is_none() {
            return Err(EditError::UnknownItem(to));
        }
        let connector = Connector::new(to, kind.unwrap_or_default());
        let owner = if self.tree.contains(from) {
            (from, None)
        } else {
            let (owner, pos) = self
                .tree
                .find_period(from)
                .ok_or(EditError::UnknownItem(from))?;
            (owner, Some(pos))
        };
        self.tree
            .batch(|tree| {
                tree.update(owner.0, |item| match owner.1 {
                    Some(pos) => {
                        if let Some(period) = item.periods.get_mut(pos) {
                            period.connectors.push(connector);
                        }
                    }
                    None => item.connectors.push(connector),
                })
            })
            .map_err(|_| EditError::UnknownItem(owner.0))?;
        tracing::debug!(%from, %to, kind = ?connector.kind, "connector added");
        self.apply_data_change();
        Ok(())
    }

    fn commit(
        &mut self,
        session: &DragSession,
        start: f64,
        end: f64,
        start_x: f64,
    ) -> Result<EditOutcome, EditError> {
        let target = session.target;
        let dx = session.pointer.x - session.origin.x;
        match session.handle {
            EditHandle::Preview => {
                let new_start = self.timestamp_at(start_x + dx);
                if new_start.is_nan() {
                    tracing::warn!(item = %target.item, "dragged bar maps to no date, edit abandoned");
                    return Err(EditError::InvalidTimestamp);
                }
                let delta = new_start - start;
                if delta == 0.0 {
                    return Ok(EditOutcome::Unchanged);
                }
                let new_end = if target.kind == BarKind::Milestone {
                    new_start
                } else {
                    end + delta
                };
                self.write_dates(&target, new_start, new_end)?;
                Ok(EditOutcome::Moved {
                    start: new_start,
                    end: new_end,
                })
            }
            EditHandle::LeftThumb | EditHandle::RightThumb => {
                let Some(preview) = self.thumb_preview(session, start, end) else {
                    return Err(EditError::InvalidTimestamp);
                };
                let (new_start, new_end) = if session.handle == EditHandle::LeftThumb {
                    (self.timestamp_at(preview.x0), end)
                } else {
                    (start, self.timestamp_at(preview.x1))
                };
                if !(new_start < new_end) {
                    tracing::warn!(item = %target.item, "resized bar maps to no date range, edit abandoned");
                    return Err(EditError::InvalidTimestamp);
                }
                self.write_dates(&target, new_start, new_end)?;
                Ok(EditOutcome::Resized {
                    start: new_start,
                    end: new_end,
                })
            }
            EditHandle::Progress => {
                let progress = (session.pointer.x - target.bounds.x0) / target.bounds.width();
                if progress.is_nan() {
                    tracing::warn!(item = %target.item, "progress maps to no value, edit abandoned");
                    return Err(EditError::InvalidTimestamp);
                }
                let progress = progress.clamp(0.0, 1.0);
                self.tree
                    .batch(|tree| tree.update(target.item, |item| item.progress = Some(progress)))
                    .map_err(|_| EditError::UnknownItem(target.item))?;
                Ok(EditOutcome::Progress(progress))
            }
            EditHandle::StartConnector | EditHandle::FinishConnector => {
                let Some(drop) = self.hit_test(session.pointer).copied() else {
                    return Ok(EditOutcome::Unchanged);
                };
                if drop.item == target.item && drop.period == target.period {
                    return Err(EditError::SelfConnection);
                }
                let ratio = (session.pointer.x - drop.bounds.x0) / drop.bounds.width();
                let kind = session
                    .handle
                    .connector_type(ratio)
                    .unwrap_or_default();
                let from = self.connector_id(target.item, target.period);
                let to = self.connector_id(drop.item, drop.period);
                self.add_connector(from, to, Some(kind))?;
                Ok(EditOutcome::Connected(kind))
            }
        }
    }

    fn connector_id(&self, item: ItemId, period: Option<usize>) -> ItemId {
        period
            .and_then(|p| self.tree.get(item)?.periods.get(p).map(|p| p.id))
            .unwrap_or(item)
    }

    fn write_dates(&mut self, target: &EditTarget, start: f64, end: f64) -> Result<(), EditError> {
        if !start.is_finite() || !end.is_finite() {
            tracing::warn!(item = %target.item, "edited dates are not finite, edit abandoned");
            return Err(EditError::InvalidTimestamp);
        }
        let (kind, period) = (target.kind, target.period);
        self.tree
            .batch(|tree| {
                tree.update(target.item, |item| match kind {
                    BarKind::Period => {
                        if let Some(p) = period.and_then(|i| item.periods.get_mut(i)) {
                            p.start = start;
                            p.end = end;
                        }
                    }
                    BarKind::Baseline => {
                        item.baseline_start = Some(start);
                        item.baseline_end = Some(end);
                    }
                    BarKind::Milestone => {
                        item.actual_start = Some(start);
                        if item.actual_end.is_some() {
                            item.actual_end = Some(end);
                        }
                    }
                    BarKind::Plain | BarKind::Parent => {
                        item.actual_start = Some(start);
                        item.actual_end = Some(end);
                    }
                })
            })
            .map_err(|_| EditError::UnknownItem(target.item))?;
        tracing::debug!(item = %target.item, start, end, "dates committed");
        Ok(())
    }

    /// Timestamp under pixel `x`, NaN when the window or the area has no width.
    fn timestamp_at(&self, x: f64) -> f64 {
        let Some(area) = self.rows_area() else {
            return f64::NAN;
        };
        if area.width() <= 0.0 || self.scale.range().span() == 0.0 {
            return f64::NAN;
        }
        self.scale
            .ratio_to_timestamp((x - area.x0) / area.width())
    }

    fn x_of(&self, area: Rect, timestamp: f64) -> f64 {
        area.x0 + area.width() * self.scale.timestamp_to_ratio(timestamp)
    }

    /// Preview of a resize: the fixed end stays at its date, the dragged end follows the
    /// pointer inside the rows area.
    fn thumb_preview(&self, session: &DragSession, start: f64, end: f64) -> Option<Rect> {
        let area = self.rows_area()?;
        let b = session.target.bounds;
        let x = session.pointer.x.clamp(area.x0, area.x1);
        Some(if session.handle == EditHandle::LeftThumb {
            let right = self.x_of(area, end);
            Rect::new(x.min(right - 1.0), b.y0, right, b.y1)
        } else {
            let left = self.x_of(area, start);
            Rect::new(left, b.y0, x.max(left + 1.0), b.y1)
        })
    }

    fn apply_data_change(&mut self) {
        self.controller.rebuild(&self.tree);
        self.tree_revision = Some(self.tree.revision());
        self.init_scale();
        self.base
            .invalidate(ConsistencyState::GanttPosition, Signal::NeedsRedraw);
    }

    fn sync_revisions(&mut self) {
        if self.tree_revision != Some(self.tree.revision()) {
            self.base
                .invalidate(ConsistencyState::GanttData, Signal::NeedsRedraw);
        }
        if self.scale_revision != Some(self.scale.revision()) {
            self.base
                .invalidate(ConsistencyState::GanttPosition, Signal::NeedsRedraw);
        }
    }

    fn layout(&mut self, area: Rect) {
        self.controller.set_available_height(area.height());
        self.bars.clear();
        self.connectors.clear();
        let shift = pixel_shift(self.theme.stroke_thickness);
        let resources = self.controller.resources();
        let mut ends: HashMap<ItemId, ConnectorEnd> = HashMap::new();

        for row in self.controller.visible_range() {
            let r = self.controller.rows()[row];
            let Some(item) = self.tree.get(r.id) else {
                continue;
            };
            let top = self.controller.row_top(row, area.y0);
            let frame = RowFrame {
                left: area.x0,
                width: area.width(),
                top,
                height: r.height,
                shift,
            };
            let end_of = |bounds: Rect| ConnectorEnd {
                bounds,
                row_top: top,
                row_height: r.height,
            };
            let ratio = |t: f64| self.scale.timestamp_to_ratio(t);
            let bar = |kind, period, bounds, start: f64, end: f64, progress| TimelineBar {
                kind,
                item: r.id,
                period,
                row,
                bounds,
                start,
                end,
                start_x: frame.x(ratio(start)),
                progress,
                visible: is_visible(ratio(start), ratio(end)),
            };

            if resources {
                for (pos, period) in item.periods.iter().enumerate() {
                    if !period.is_valid() {
                        continue;
                    }
                    let bounds = frame.plain_bar(ratio(period.start), ratio(period.end));
                    self.bars
                        .push(bar(BarKind::Period, Some(pos), bounds, period.start, period.end, None));
                    ends.insert(period.id, end_of(bounds));
                }
                continue;
            }

            let Some(info) = self.controller.item_info(&self.tree, row) else {
                continue;
            };
            match info.shape() {
                ItemShape::Baseline => {
                    let (Some(bs), Some(be)) = (item.baseline_start, item.baseline_end) else {
                        continue;
                    };
                    let actual = match (info.start, info.end) {
                        (Some(s), Some(e)) if info.is_valid_task => Some((s, e)),
                        _ => None,
                    };
                    let (a, e) = actual.unwrap_or((bs, be));
                    let (actual_bounds, planned_bounds) = frame.baseline_pair(
                        (ratio(a), ratio(e)),
                        (ratio(bs), ratio(be)),
                        self.theme.baseline_above,
                    );
                    self.bars
                        .push(bar(BarKind::Baseline, None, planned_bounds, bs, be, None));
                    if actual.is_some() {
                        self.bars
                            .push(bar(BarKind::Plain, None, actual_bounds, a, e, info.progress));
                        ends.insert(r.id, end_of(actual_bounds));
                    } else {
                        ends.insert(r.id, end_of(planned_bounds));
                    }
                }
                ItemShape::Parent => {
                    let (Some(s), Some(e)) = (info.start.or(info.end), info.end.or(info.start))
                    else {
                        continue;
                    };
                    let bounds = frame.parent_bar(ratio(s), ratio(e));
                    self.bars.push(bar(BarKind::Parent, None, bounds, s, e, None));
                    ends.insert(r.id, end_of(bounds));
                }
                ItemShape::Milestone => {
                    let Some(s) = info.start else {
                        continue;
                    };
                    let t = ratio(s);
                    let bounds = frame.milestone(t);
                    let mut b = bar(BarKind::Milestone, None, bounds, s, s, None);
                    b.visible = (0.0..=1.0).contains(&t);
                    self.bars.push(b);
                    ends.insert(r.id, end_of(bounds));
                }
                ItemShape::Task => {
                    let (Some(s), Some(e)) = (info.start, info.end) else {
                        continue;
                    };
                    let bounds = frame.plain_bar(ratio(s), ratio(e));
                    self.bars
                        .push(bar(BarKind::Plain, None, bounds, s, e, info.progress));
                    ends.insert(r.id, end_of(bounds));
                }
                ItemShape::Nothing => {}
            }
        }

        self.route_connectors(area, &ends, shift);
    }

    fn route_connectors(&mut self, area: Rect, ends: &HashMap<ItemId, ConnectorEnd>, shift: f64) {
        let resources = self.controller.resources();
        for row in self.controller.visible_range() {
            let Some(item) = self.tree.get(self.controller.rows()[row].id) else {
                continue;
            };
            let sources: Vec<(ItemId, &[Connector])> = if resources {
                item.periods
                    .iter()
                    .map(|p| (p.id, p.connectors.as_slice()))
                    .collect()
            } else {
                alloc::vec![(item.id, item.connectors.as_slice())]
            };
            for (source, connectors) in sources {
                let Some(from) = ends.get(&source) else {
                    continue;
                };
                for connector in connectors {
                    let Some(to) = ends.get(&connector.connect_to) else {
                        if !self.tree.contains(connector.connect_to)
                            && self.tree.find_period(connector.connect_to).is_none()
                        {
                            tracing::warn!(
                                from = %source,
                                to = %connector.connect_to,
                                "connector target does not exist, dropped"
                            );
                        }
                        continue;
                    };
                    let routed = route(connector.kind, from, to, shift);
                    let Some(line) = culled_path(&routed, area) else {
                        continue;
                    };
                    let arrow = routed
                        .points
                        .last()
                        .and_then(|&tip| arrow_path(tip, routed.orientation, area));
                    self.connectors.push(DrawnConnector { line, arrow });
                }
            }
        }
    }

    fn update_controls(&mut self) {
        self.controls = match self.gesture.session() {
            Some(session) => {
                let pressed = self.pressed;
                let mut target = session.target;
                let preview = match (session.handle, pressed) {
                    (EditHandle::Preview, _) if !matches!(self.gesture, Gesture::Armed(_)) => {
                        let dx = session.pointer.x - session.origin.x;
                        Some(target.bounds + kurbo::Vec2::new(dx, 0.0))
                    }
                    (EditHandle::LeftThumb | EditHandle::RightThumb, Some(bar)) => {
                        self.thumb_preview(session, bar.start, bar.end)
                    }
                    (EditHandle::Progress, _) => {
                        let b = target.bounds;
                        target.progress =
                            Some(((session.pointer.x - b.x0) / b.width()).clamp(0.0, 1.0))
                                .filter(|p| p.is_finite());
                        Some(b)
                    }
                    _ => Some(target.bounds),
                };
                preview.map(|p| EditControls::new(&target, p))
            }
            None => self
                .selected()
                .map(|bar| EditControls::new(&bar.target(), bar.bounds)),
        };
    }

    fn bar_mark_id(&self, row: usize, slot: u32) -> Option<MarkId> {
        let row = u32::try_from(row).ok()?;
        let index = row.checked_mul(BAR_SLOTS)?.checked_add(slot)?;
        (index < CONNECTOR_MARKS).then(|| MarkId::compose(self.namespace, index))
    }

    fn rebuild_marks(&mut self) {
        let z = self.base.z_index();
        let theme = &self.theme;
        let mut out = Vec::with_capacity(self.bars.len() + 2 * self.connectors.len() + 8);

        for bar in self.bars.iter().filter(|b| b.visible) {
            let slot = match (bar.kind, bar.period) {
                (BarKind::Baseline, _) => SLOT_BASELINE,
                (BarKind::Period, Some(p)) => match u32::try_from(p)
                    .ok()
                    .and_then(|p| p.checked_add(SLOT_FIRST_PERIOD))
                    .filter(|s| *s < BAR_SLOTS)
                {
                    Some(slot) => slot,
                    None => continue,
                },
                _ => SLOT_BAR,
            };
            let Some(id) = self.bar_mark_id(bar.row, slot) else {
                continue;
            };
            let mark = match bar.kind {
                BarKind::Plain => RectMarkSpec::new(id, bar.bounds)
                    .with_fill(theme.base_fill.brush())
                    .with_z_index(z + z_order::GANTT_BARS)
                    .mark(),
                BarKind::Period => RectMarkSpec::new(id, bar.bounds)
                    .with_fill(theme.period_fill.brush())
                    .with_z_index(z + z_order::GANTT_BARS)
                    .mark(),
                BarKind::Baseline => RectMarkSpec::new(id, bar.bounds)
                    .with_fill(theme.baseline_fill.brush())
                    .with_z_index(z + z_order::GANTT_BASELINES)
                    .mark(),
                BarKind::Parent => PathMarkSpec::new(id, bracket_path(bar.bounds))
                    .with_fill(theme.parent_fill.brush())
                    .with_z_index(z + z_order::GANTT_BARS)
                    .mark(),
                BarKind::Milestone => PathMarkSpec::new(id, diamond_path(bar.bounds))
                    .with_fill(theme.milestone_fill.brush())
                    .with_z_index(z + z_order::GANTT_BARS)
                    .mark(),
            };
            out.push(mark);
            if let (BarKind::Plain, Some(progress)) = (bar.kind, bar.progress) {
                if progress > 0.0 {
                    if let Some(id) = self.bar_mark_id(bar.row, SLOT_PROGRESS) {
                        out.push(
                            RectMarkSpec::new(id, progress_bar(bar.bounds, progress))
                                .with_fill(theme.progress_fill.brush())
                                .with_z_index(z + z_order::GANTT_PROGRESS)
                                .mark(),
                        );
                    }
                }
            }
        }

        let stroke = StrokeStyle::solid(theme.connector_fill.brush(), theme.stroke_thickness);
        for (n, connector) in self.connectors.iter().enumerate() {
            let Some(index) = u32::try_from(n)
                .ok()
                .and_then(|n| n.checked_mul(2))
                .and_then(|n| n.checked_add(CONNECTOR_MARKS))
                .filter(|i| *i < EDIT_MARKS)
            else {
                break;
            };
            out.push(
                PathMarkSpec::new(MarkId::compose(self.namespace, index), connector.line.clone())
                    .with_stroke(stroke.clone())
                    .with_z_index(z + z_order::GANTT_CONNECTORS)
                    .mark(),
            );
            if let Some(arrow) = &connector.arrow {
                out.push(
                    PathMarkSpec::new(MarkId::compose(self.namespace, index + 1), arrow.clone())
                        .with_fill(theme.connector_fill.brush())
                        .with_z_index(z + z_order::GANTT_CONNECTORS)
                        .mark(),
                );
            }
        }

        if let Some(controls) = &self.controls {
            let edit_z = z + z_order::GANTT_EDIT;
            let id = |slot: u32| MarkId::compose(self.namespace, EDIT_MARKS + slot);
            let fill = theme.edit_fill.brush();
            out.push(
                PathMarkSpec::new(id(0), controls.preview.to_path(0.1))
                    .with_stroke(StrokeStyle::solid(fill.clone(), 1.0))
                    .with_z_index(edit_z)
                    .mark(),
            );
            let thumbs = [(1, controls.left_thumb), (2, controls.right_thumb)];
            for (slot, rect) in thumbs.into_iter().filter_map(|(s, r)| Some((s, r?))) {
                out.push(
                    RectMarkSpec::new(id(slot), rect)
                        .with_fill(fill.clone())
                        .with_z_index(edit_z)
                        .mark(),
                );
            }
            if let Some(thumb) = &controls.progress_thumb {
                out.push(
                    PathMarkSpec::new(id(3), thumb.clone())
                        .with_fill(fill.clone())
                        .with_z_index(edit_z)
                        .mark(),
                );
            }
            let handles = [(4, controls.start_connector), (5, controls.finish_connector)];
            for (slot, circle) in handles.into_iter().filter_map(|(s, c)| Some((s, c?))) {
                out.push(
                    PathMarkSpec::new(id(slot), circle.to_path(0.1))
                        .with_fill(fill.clone())
                        .with_z_index(edit_z)
                        .mark(),
                );
            }
            if let Gesture::Connecting(session) = &self.gesture {
                let handle = match session.handle {
                    EditHandle::StartConnector => controls.start_connector,
                    _ => controls.finish_connector,
                };
                if let Some(handle) = handle {
                    let line = Line::new(handle.center, session.pointer);
                    out.push(
                        PathMarkSpec::new(id(6), line.to_path(0.1))
                            .with_stroke(stroke.clone())
                            .with_z_index(edit_z)
                            .mark(),
                    );
                }
            }
        }

        self.output = out;
    }
}

impl Invalidatable for Timeline {
    fn invalidation(&self) -> &Invalidation {
        self.base.invalidation()
    }

    fn invalidation_mut(&mut self) -> &mut Invalidation {
        self.base.invalidation_mut()
    }
}

impl Drawable for Timeline {
    fn draw(&mut self) -> Result<bool, DrawError> {
        self.sync_revisions();
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

        if inv.begin(ConsistencyState::GanttData) {
            self.apply_data_change();
            self.base
                .invalidation_mut()
                .mark_consistent(ConsistencyState::GanttData);
        }

        let inv = self.base.invalidation_mut();
        let position = inv.begin(ConsistencyState::GanttPosition);
        let bounds_dirty = inv.begin(ConsistencyState::Bounds);
        if position || bounds_dirty {
            if let Some(area) = self.rows_area() {
                self.layout(area);
            }
            self.scale_revision = Some(self.scale.revision());
            self.base
                .invalidation_mut()
                .mark_consistent(ConsistencyState::GanttPosition | ConsistencyState::Bounds);
        }

        let inv = self.base.invalidation_mut();
        if inv.begin(ConsistencyState::Appearance) {
            inv.mark_consistent(ConsistencyState::Appearance);
        }

        self.update_controls();
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

    use chartwell_core::ContainerId;

    use super::*;
    use crate::gantt::data::{Period, TaskItem};

    /// A 1000 x 200 px timeline with a fixed 0..1000 total range, drawn twice so the window
    /// shows the whole total range.
    fn shown(items: &[(Option<u64>, TaskItem)]) -> Timeline {
        let theme = TimelineTheme {
            stroke_thickness: 2.0,
            ..TimelineTheme::default()
        };
        let mut timeline = Timeline::new(7, theme);
        timeline.base_mut().set_container(Some(ContainerId(1)));
        timeline
            .base_mut()
            .set_parent_bounds(Some(Rect::new(0.0, 0.0, 1000.0, 200.0)));
        timeline.scale_mut().set_minimum(Some(0.0));
        timeline.scale_mut().set_maximum(Some(1000.0));
        for (parent, item) in items {
            timeline
                .tree_mut()
                .add(parent.map(ItemId), item.clone())
                .unwrap();
        }
        assert_eq!(timeline.draw(), Ok(true));
        timeline.scale_mut().set_range(0.0, 1000.0);
        assert_eq!(timeline.draw(), Ok(true));
        timeline
    }

    fn two_tasks() -> Timeline {
        shown(&[
            (None, TaskItem::new(ItemId(1), "design").with_dates(100.0, 200.0)),
            (None, TaskItem::new(ItemId(2), "build").with_dates(300.0, 400.0)),
        ])
    }

    #[test]
    fn first_fit_shows_a_tenth_of_the_total_range() {
        let theme = TimelineTheme::default();
        let mut timeline = Timeline::new(0, theme);
        timeline.base_mut().set_container(Some(ContainerId(1)));
        timeline
            .base_mut()
            .set_parent_bounds(Some(Rect::new(0.0, 0.0, 500.0, 100.0)));
        timeline.scale_mut().set_minimum(Some(0.0));
        timeline.scale_mut().set_maximum(Some(1000.0));
        timeline
            .tree_mut()
            .add(None, TaskItem::new(ItemId(1), "a").with_dates(100.0, 200.0))
            .unwrap();
        timeline.draw().unwrap();
        let range = timeline.scale().range();
        assert_eq!((range.min, range.max), (0.0, 100.0));
    }

    #[test]
    fn bars_follow_the_visible_window() {
        let mut timeline = two_tasks();
        let bar = timeline.bars()[0];
        assert_eq!(bar.kind, BarKind::Plain);
        assert_eq!(bar.bounds, Rect::new(100.0, 4.0, 200.0, 18.0));
        assert_eq!(timeline.bars()[1].bounds.y0, 25.0);
        assert!(
            timeline
                .marks()
                .iter()
                .any(|m| m.id == MarkId::compose(7, 0))
        );
        assert_eq!(timeline.draw(), Ok(false));

        timeline.scale_mut().set_range(100.0, 600.0);
        assert_eq!(timeline.draw(), Ok(true));
        assert_eq!(timeline.bars()[0].bounds.x0, 0.0);
        assert_eq!(timeline.bars()[0].bounds.width(), 200.0);
    }

    #[test]
    fn parents_and_milestones_get_their_own_shapes() {
        let timeline = shown(&[
            (None, TaskItem::new(ItemId(1), "phase")),
            (Some(1), TaskItem::new(ItemId(2), "work").with_dates(100.0, 300.0)),
            (None, TaskItem::new(ItemId(3), "launch").with_start(500.0)),
        ]);
        let kinds: std::vec::Vec<BarKind> = timeline.bars().iter().map(|b| b.kind).collect();
        assert_eq!(kinds, [BarKind::Parent, BarKind::Plain, BarKind::Milestone]);
        let parent = timeline.bars()[0].bounds;
        assert_eq!((parent.x0, parent.x1, parent.height()), (100.0, 300.0, 8.0));
        let milestone = timeline.bars()[2].bounds;
        assert_eq!(milestone.center(), Point::new(500.0, 53.0));
        assert_eq!(milestone.height(), 14.0);
    }

    #[test]
    fn dragging_a_bar_moves_both_dates() {
        let mut timeline = two_tasks();
        assert_eq!(
            timeline.pointer_down(Point::new(150.0, 11.0)),
            Some(EditHandle::Preview)
        );
        timeline.pointer_move(Point::new(250.0, 11.0), 0.0);
        assert!(matches!(timeline.gesture(), Gesture::Dragging(_)));
        let outcome = timeline.pointer_up(Point::new(250.0, 11.0));
        assert_eq!(
            outcome,
            Ok(EditOutcome::Moved {
                start: 200.0,
                end: 300.0
            })
        );
        let item = timeline.tree().get(ItemId(1)).unwrap();
        assert_eq!((item.actual_start, item.actual_end), (Some(200.0), Some(300.0)));
        assert!(timeline.gesture().is_idle());
        assert_eq!(timeline.draw(), Ok(true));
        assert_eq!(timeline.bars()[0].bounds.x0, 200.0);
    }

    #[test]
    fn a_collapsed_window_abandons_the_edit() {
        let mut timeline = two_tasks();
        timeline.pointer_down(Point::new(150.0, 11.0));
        timeline.pointer_move(Point::new(250.0, 11.0), 0.0);
        timeline.scale_mut().set_range(500.0, 500.0);
        assert_eq!(
            timeline.pointer_up(Point::new(250.0, 11.0)),
            Err(EditError::InvalidTimestamp)
        );
        let item = timeline.tree().get(ItemId(1)).unwrap();
        assert_eq!((item.actual_start, item.actual_end), (Some(100.0), Some(200.0)));
    }

    #[test]
    fn tree_changes_during_a_gesture_abort_the_commit() {
        let mut timeline = two_tasks();
        timeline.pointer_down(Point::new(150.0, 11.0));
        timeline.pointer_move(Point::new(250.0, 11.0), 0.0);
        timeline
            .tree_mut()
            .update(ItemId(2), |item| item.name = "renamed".into())
            .unwrap();
        assert_eq!(
            timeline.pointer_up(Point::new(250.0, 11.0)),
            Err(EditError::TreeMutated)
        );
        assert_eq!(
            timeline.tree().get(ItemId(1)).unwrap().actual_start,
            Some(100.0)
        );
    }

    #[test]
    fn dropping_a_finish_handle_near_a_start_adds_finish_start() {
        let mut timeline = two_tasks();
        timeline.pointer_down(Point::new(150.0, 11.0));
        assert_eq!(
            timeline.pointer_up(Point::new(150.0, 11.0)),
            Ok(EditOutcome::Unchanged)
        );
        assert_eq!(timeline.draw(), Ok(true));
        assert!(timeline.edit_controls().is_some());

        assert_eq!(
            timeline.pointer_down(Point::new(205.0, 11.0)),
            Some(EditHandle::FinishConnector)
        );
        timeline.pointer_move(Point::new(310.0, 32.0), 0.0);
        assert!(matches!(timeline.gesture(), Gesture::Connecting(_)));
        assert_eq!(
            timeline.pointer_up(Point::new(310.0, 32.0)),
            Ok(EditOutcome::Connected(ConnectorType::FinishStart))
        );
        let item = timeline.tree().get(ItemId(1)).unwrap();
        assert_eq!(
            item.connectors.as_slice(),
            [Connector::new(ItemId(2), ConnectorType::FinishStart)]
        );
        assert_eq!(timeline.draw(), Ok(true));
        assert_eq!(timeline.connector_count(), 1);
    }

    #[test]
    fn connectors_refuse_self_and_unknown_targets() {
        let mut timeline = two_tasks();
        assert_eq!(
            timeline.add_connector(ItemId(1), ItemId(1), None),
            Err(EditError::SelfConnection)
        );
        assert_eq!(
            timeline.add_connector(ItemId(1), ItemId(9), None),
            Err(EditError::UnknownItem(ItemId(9)))
        );
        timeline
            .add_connector(ItemId(2), ItemId(1), Some(ConnectorType::StartStart))
            .unwrap();
        assert_eq!(timeline.tree().get(ItemId(2)).unwrap().connectors.len(), 1);
    }

    #[test]
    fn auto_scroll_runs_while_the_pointer_is_outside() {
        let mut timeline = two_tasks();
        timeline.pointer_down(Point::new(150.0, 11.0));
        timeline.pointer_move(Point::new(995.0, 11.0), 0.0);
        assert!(!timeline.tick(50.0));
        assert!(timeline.tick(100.0));
        assert!(
            timeline
                .gesture()
                .session()
                .is_some_and(|s| s.auto_scroll.is_running())
        );
        timeline.pointer_move(Point::new(500.0, 11.0), 120.0);
        assert!(!timeline.tick(300.0));
    }

    #[test]
    fn user_scrolling_ends_the_gesture_and_the_selection() {
        let mut timeline = two_tasks();
        timeline.pointer_down(Point::new(150.0, 11.0));
        timeline.scroll(0.0, 5.0, false);
        assert!(timeline.gesture().is_idle());
        assert!(timeline.selected().is_none());
        assert_eq!(timeline.controller().scroll_position(), 0.0);
    }

    /// A 1000 x 200 px timeline without manual bounds, fitted to its data.
    fn unbounded() -> Timeline {
        let mut timeline = Timeline::new(7, TimelineTheme::default());
        timeline.base_mut().set_container(Some(ContainerId(1)));
        timeline
            .base_mut()
            .set_parent_bounds(Some(Rect::new(0.0, 0.0, 1000.0, 200.0)));
        let tree = timeline.tree_mut();
        tree.add(None, TaskItem::new(ItemId(1), "survey").with_dates(100_000.0, 200_000.0))
            .unwrap();
        tree.add(None, TaskItem::new(ItemId(2), "build").with_dates(300_000.0, 1_100_000.0))
            .unwrap();
        assert_eq!(timeline.draw(), Ok(true));
        timeline
    }

    /// Presses the first bar and auto-scrolls left past the data for two seconds.
    fn drag_past_the_start(timeline: &mut Timeline) {
        let y = timeline.bars()[0].bounds.center().y;
        assert_eq!(
            timeline.pointer_down(Point::new(150.0, y)),
            Some(EditHandle::Preview)
        );
        timeline.pointer_move(Point::new(2.0, y), 0.0);
        for step in 1..=20 {
            assert!(timeline.tick(f64::from(step) * 100.0));
        }
        let total = timeline.scale().total_range();
        assert!(timeline.scale().range().min < total.min, "window left the data");
        assert!(timeline.scale().data_range().is_none());
    }

    fn assert_window_inside_total(timeline: &Timeline) {
        let range = timeline.scale().range();
        let total = timeline.scale().total_range();
        assert!(
            total.min <= range.min && range.max <= total.max,
            "{range:?} escaped {total:?}"
        );
        assert!(timeline.scale().data_range().is_some());
    }

    #[test]
    fn cancelling_a_force_scrolled_drag_refits_the_scale() {
        let mut timeline = unbounded();
        let span = timeline.scale().range().span();
        drag_past_the_start(&mut timeline);
        timeline.cancel_gesture();
        assert_window_inside_total(&timeline);
        assert_eq!(timeline.scale().range().span(), span);
        assert_eq!(timeline.draw(), Ok(true));
        assert_window_inside_total(&timeline);
        let item = timeline.tree().get(ItemId(1)).unwrap();
        assert_eq!(item.actual_start, Some(100_000.0));
    }

    #[test]
    fn failed_and_interrupted_drags_refit_the_scale() {
        let mut timeline = unbounded();
        drag_past_the_start(&mut timeline);
        timeline
            .tree_mut()
            .update(ItemId(2), |item| item.name = "renamed".into())
            .unwrap();
        assert_eq!(
            timeline.pointer_up(Point::new(2.0, 11.0)),
            Err(EditError::TreeMutated)
        );
        assert_window_inside_total(&timeline);

        let mut timeline = unbounded();
        drag_past_the_start(&mut timeline);
        timeline.scroll(-10.0, 0.0, false);
        assert!(timeline.gesture().is_idle());
        assert_window_inside_total(&timeline);

        let mut timeline = unbounded();
        drag_past_the_start(&mut timeline);
        timeline.pointer_down(Point::new(900.0, 190.0));
        assert_window_inside_total(&timeline);
    }

    #[test]
    fn resize_thumbs_keep_the_start_before_the_end() {
        let mut timeline = two_tasks();
        assert!(timeline.select(ItemId(1), None));
        assert_eq!(timeline.draw(), Ok(true));
        assert_eq!(
            timeline.pointer_down(Point::new(101.0, 11.0)),
            Some(EditHandle::LeftThumb)
        );
        timeline.pointer_move(Point::new(160.0, 11.0), 0.0);
        assert_eq!(
            timeline.pointer_up(Point::new(160.0, 11.0)),
            Ok(EditOutcome::Resized {
                start: 160.0,
                end: 200.0
            })
        );

        assert_eq!(timeline.draw(), Ok(true));
        assert!(timeline.select(ItemId(1), None));
        assert_eq!(timeline.draw(), Ok(true));
        assert_eq!(
            timeline.pointer_down(Point::new(161.0, 11.0)),
            Some(EditHandle::LeftThumb)
        );
        timeline.pointer_move(Point::new(500.0, 11.0), 0.0);
        assert_eq!(
            timeline.pointer_up(Point::new(500.0, 11.0)),
            Ok(EditOutcome::Resized {
                start: 199.0,
                end: 200.0
            }),
            "the start stops one pixel before the end"
        );

        assert_eq!(timeline.draw(), Ok(true));
        assert!(timeline.select(ItemId(2), None));
        assert_eq!(timeline.draw(), Ok(true));
        let y = timeline.bars()[1].bounds.center().y;
        assert_eq!(
            timeline.pointer_down(Point::new(399.0, y)),
            Some(EditHandle::RightThumb)
        );
        timeline.pointer_move(Point::new(20.0, y), 0.0);
        assert_eq!(
            timeline.pointer_up(Point::new(20.0, y)),
            Ok(EditOutcome::Resized {
                start: 300.0,
                end: 301.0
            })
        );
        let item = timeline.tree().get(ItemId(2)).unwrap();
        assert_eq!((item.actual_start, item.actual_end), (Some(300.0), Some(301.0)));
    }

    #[test]
    fn progress_drags_are_clamped_to_the_bar() {
        let mut timeline = shown(&[(
            None,
            TaskItem::new(ItemId(1), "paint")
                .with_dates(100.0, 200.0)
                .with_progress(0.5),
        )]);
        for (x, expected) in [(175.0, 0.75), (400.0, 1.0), (-50.0, 0.0)] {
            assert!(timeline.select(ItemId(1), None));
            assert_eq!(timeline.draw(), Ok(true));
            let thumb = timeline
                .edit_controls()
                .and_then(|c| c.progress_thumb.as_ref())
                .map(|t| t.bounding_box().center())
                .unwrap();
            assert_eq!(timeline.pointer_down(thumb), Some(EditHandle::Progress));
            timeline.pointer_move(Point::new(x, thumb.y), 0.0);
            assert_eq!(
                timeline.pointer_up(Point::new(x, thumb.y)),
                Ok(EditOutcome::Progress(expected))
            );
            assert_eq!(timeline.tree().get(ItemId(1)).unwrap().progress, Some(expected));
            assert_eq!(timeline.draw(), Ok(true));
        }
    }

    #[test]
    fn resource_rows_draw_one_bar_per_period() {
        let mut timeline = shown(&[(
            None,
            TaskItem::new(ItemId(1), "crane")
                .with_period(Period::new(ItemId(10), 100.0, 250.0))
                .with_period(Period::new(ItemId(11), 400.0, 500.0)),
        )]);
        assert!(timeline.bars().is_empty(), "periods are hidden in task mode");

        timeline.set_resources(true);
        assert_eq!(timeline.draw(), Ok(true));
        let bars = timeline.bars();
        assert_eq!(bars.len(), 2);
        assert!(bars.iter().all(|b| b.kind == BarKind::Period && b.row == 0));
        assert_eq!((bars[0].period, bars[1].period), (Some(0), Some(1)));
        assert_eq!((bars[0].bounds.x0, bars[0].bounds.x1), (100.0, 250.0));
        assert_eq!((bars[1].bounds.x0, bars[1].bounds.x1), (400.0, 500.0));
        for slot in [SLOT_FIRST_PERIOD, SLOT_FIRST_PERIOD + 1] {
            assert!(
                timeline
                    .marks()
                    .iter()
                    .any(|m| m.id == MarkId::compose(7, slot))
            );
        }

        timeline.add_connector(ItemId(10), ItemId(11), None).unwrap();
        assert_eq!(timeline.tree().get(ItemId(1)).unwrap().periods[0].connectors.len(), 1);
        assert_eq!(timeline.draw(), Ok(true));
        assert_eq!(timeline.connector_count(), 1);
    }

    #[test]
    fn baseline_rows_split_into_actual_and_planned_bars() {
        let mut timeline = shown(&[(
            None,
            TaskItem::new(ItemId(1), "pour")
                .with_dates(100.0, 200.0)
                .with_baseline(150.0, 300.0),
        )]);
        let bars = timeline.bars();
        assert_eq!(bars.len(), 2);
        let (planned, actual) = (bars[0], bars[1]);
        assert_eq!((planned.kind, actual.kind), (BarKind::Baseline, BarKind::Plain));
        assert_eq!((planned.bounds.x0, planned.bounds.x1), (150.0, 300.0));
        assert_eq!((actual.bounds.x0, actual.bounds.x1), (100.0, 200.0));
        assert_eq!(planned.bounds.height(), actual.bounds.height());
        assert_eq!(actual.bounds.y1, planned.bounds.y0, "planned bar below by default");
        for slot in [SLOT_BAR, SLOT_BASELINE] {
            assert!(
                timeline
                    .marks()
                    .iter()
                    .any(|m| m.id == MarkId::compose(7, slot))
            );
        }

        let theme = TimelineTheme {
            baseline_above: true,
            ..timeline.theme().clone()
        };
        timeline.set_theme(theme);
        assert_eq!(timeline.draw(), Ok(true));
        let bars = timeline.bars();
        assert_eq!(bars[0].bounds.y1, bars[1].bounds.y0, "planned bar above");
    }
}
