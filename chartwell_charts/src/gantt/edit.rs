// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live-edit gestures of a gantt timeline.
//!
//! One gesture slot holds what the pointer is doing: nothing, pressed on a handle, dragging a
//! bar handle, or drawing a new connector. A gesture owns its auto-scroll timer, so ending or
//! cancelling the gesture also stops scrolling.

use kurbo::{BezPath, Circle, Point, Rect, Vec2};
use thiserror::Error;

use super::data::{ConnectorType, ItemId};
#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Interval of auto-scroll steps while the pointer is outside the rows (ms).
pub const AUTO_SCROLL_STEP_MS: f64 = 100.0;
/// Pixels scrolled per auto-scroll step.
pub const AUTO_SCROLL_PIXELS: f64 = 30.0;
/// Distance from the viewport edges at which auto-scroll kicks in.
pub const AUTO_SCROLL_INSIDE_MARGIN: f64 = 10.0;
/// Width of the resize thumbs.
pub const THUMB_WIDTH: f64 = 4.0;
/// Size of the progress thumb triangle.
pub const PROGRESS_THUMB_SIZE: f64 = 5.0;
/// Radius of the connector handles.
pub const CONNECTOR_HANDLE_RADIUS: f64 = 5.0;

/// A drag handle of the selected bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditHandle {
    /// The whole bar: moves both dates.
    Preview,
    /// The progress thumb.
    Progress,
    /// Resizes the start.
    LeftThumb,
    /// Resizes the end.
    RightThumb,
    /// Draws a connector from the bar start.
    StartConnector,
    /// Draws a connector from the bar finish.
    FinishConnector,
}

impl EditHandle {
    /// Returns `true` for the connector handles.
    pub fn is_connector(self) -> bool {
        matches!(self, Self::StartConnector | Self::FinishConnector)
    }

    /// The connector created by dropping this handle at `drop_ratio` of the target bar width.
    ///
    /// Dropping on the first half joins the target start, the second half its finish.
    pub fn connector_type(self, drop_ratio: f64) -> Option<ConnectorType> {
        let to_start = drop_ratio < 0.5;
        match (self, to_start) {
            (Self::StartConnector, true) => Some(ConnectorType::StartStart),
            (Self::StartConnector, false) => Some(ConnectorType::StartFinish),
            (Self::FinishConnector, true) => Some(ConnectorType::FinishStart),
            (Self::FinishConnector, false) => Some(ConnectorType::FinishFinish),
            _ => None,
        }
    }
}

/// What kind of bar a gesture edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BarKind {
    /// A task bar.
    Plain,
    /// A summary bracket.
    Parent,
    /// A milestone diamond.
    Milestone,
    /// A planned (baseline) bar.
    Baseline,
    /// A resource period.
    Period,
}

/// The bar a gesture edits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditTarget {
    /// Owning item.
    pub item: ItemId,
    /// Period position for resource bars.
    pub period: Option<usize>,
    /// Bar kind.
    pub kind: BarKind,
    /// Bar bounds when the gesture started.
    pub bounds: Rect,
    /// Progress when the gesture started.
    pub progress: Option<f64>,
}

/// Shapes of the edit controls around the selected bar.
#[derive(Clone, Debug, PartialEq)]
pub struct EditControls {
    /// Outline following the pointer.
    pub preview: Rect,
    /// Progress thumb (plain tasks only).
    pub progress_thumb: Option<BezPath>,
    /// Start resize thumb.
    pub left_thumb: Option<Rect>,
    /// End resize thumb.
    pub right_thumb: Option<Rect>,
    /// Connector handle at the start.
    pub start_connector: Option<Circle>,
    /// Connector handle at the finish.
    pub finish_connector: Option<Circle>,
}

impl EditControls {
    /// Controls of `target` with its preview at `preview`.
    ///
    /// Milestones get no resize thumbs and baseline bars no connector handles.
    pub fn new(target: &EditTarget, preview: Rect) -> Self {
        let thumbs = target.kind != BarKind::Milestone;
        let connectors = target.kind != BarKind::Baseline;
        let mid_y = preview.y0 + preview.height() / 2.0;
        let progress_thumb = match (target.kind, target.progress) {
            (BarKind::Plain, Some(progress)) => {
                let p = preview.x0 + preview.width() * progress.clamp(0.0, 1.0);
                let (b, s) = (preview.y1, PROGRESS_THUMB_SIZE);
                let mut path = BezPath::new();
                path.move_to((p, b - s));
                path.line_to((p + s, b));
                path.line_to((p + s, b + s));
                path.line_to((p - s, b + s));
                path.line_to((p - s, b));
                path.close_path();
                Some(path)
            }
            _ => None,
        };
        Self {
            preview,
            progress_thumb,
            left_thumb: thumbs.then(|| {
                Rect::new(preview.x0 - 1.0, preview.y0, preview.x0 - 1.0 + THUMB_WIDTH, preview.y1)
            }),
            right_thumb: thumbs.then(|| {
                Rect::new(preview.x1 + 1.0 - THUMB_WIDTH, preview.y0, preview.x1 + 1.0, preview.y1)
            }),
            start_connector: connectors.then(|| {
                Circle::new(
                    (preview.x0 - CONNECTOR_HANDLE_RADIUS, mid_y),
                    CONNECTOR_HANDLE_RADIUS,
                )
            }),
            finish_connector: connectors.then(|| {
                Circle::new(
                    (preview.x1 + CONNECTOR_HANDLE_RADIUS, mid_y),
                    CONNECTOR_HANDLE_RADIUS,
                )
            }),
        }
    }

    /// The handle under `point`, most specific first.
    pub fn hit(&self, point: Point) -> Option<EditHandle> {
        let in_circle = |c: &Option<Circle>| {
            c.is_some_and(|c| (point - c.center).hypot() <= c.radius)
        };
        if in_circle(&self.start_connector) {
            return Some(EditHandle::StartConnector);
        }
        if in_circle(&self.finish_connector) {
            return Some(EditHandle::FinishConnector);
        }
        if self.left_thumb.is_some_and(|r| r.contains(point)) {
            return Some(EditHandle::LeftThumb);
        }
        if self.right_thumb.is_some_and(|r| r.contains(point)) {
            return Some(EditHandle::RightThumb);
        }
        if let Some(thumb) = &self.progress_thumb {
            if kurbo::Shape::bounding_box(thumb).contains(point) {
                return Some(EditHandle::Progress);
            }
        }
        self.preview.contains(point).then_some(EditHandle::Preview)
    }
}

/// Repeats scroll steps while a drag pointer is outside the rows area.
///
/// The timer is driven by explicit [`tick`](Self::tick) calls with the current time; it runs
/// only between [`update`](Self::update) seeing the pointer outside and the pointer coming back
/// (or [`stop`](Self::stop)).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AutoScroll {
    next_tick: Option<f64>,
    direction: Vec2,
}

impl AutoScroll {
    /// Returns `true` while the timer runs.
    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Direction of the pending scroll: the sign of each component, or 0.
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Recomputes the scroll direction for `pointer` and starts or stops the timer.
    ///
    /// `area` is the rows area; the pointer must be at least
    /// [`AUTO_SCROLL_INSIDE_MARGIN`] inside it to stop scrolling.
    pub fn update(&mut self, pointer: Point, area: Rect, vertical: bool, now: f64) {
        let left = area.x0 + AUTO_SCROLL_INSIDE_MARGIN;
        let right = area.x1 - AUTO_SCROLL_INSIDE_MARGIN;
        let top = area.y0 + AUTO_SCROLL_INSIDE_MARGIN;
        let bottom = area.y1 - AUTO_SCROLL_INSIDE_MARGIN;
        let sign = |value: f64, lo: f64, hi: f64| {
            if value < lo {
                -1.0
            } else if value > hi {
                1.0
            } else {
                0.0
            }
        };
        let dx = sign(pointer.x, left, right);
        let dy = if vertical { sign(pointer.y, top, bottom) } else { 0.0 };
        self.direction = Vec2::new(dx, dy);
        if self.direction == Vec2::ZERO {
            self.next_tick = None;
        } else if self.next_tick.is_none() {
            self.next_tick = Some(now + AUTO_SCROLL_STEP_MS);
        }
    }

    /// Returns the pixels to scroll for every step elapsed up to `now`.
    pub fn tick(&mut self, now: f64) -> Option<Vec2> {
        let next = self.next_tick?;
        if now < next {
            return None;
        }
        let steps = ((now - next) / AUTO_SCROLL_STEP_MS).floor() + 1.0;
        self.next_tick = Some(next + steps * AUTO_SCROLL_STEP_MS);
        Some(self.direction * (AUTO_SCROLL_PIXELS * steps))
    }

    /// Stops the timer.
    pub fn stop(&mut self) {
        self.next_tick = None;
        self.direction = Vec2::ZERO;
    }
}

/// State of a pressed or dragged handle.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    /// Pressed handle.
    pub handle: EditHandle,
    /// Edited bar.
    pub target: EditTarget,
    /// Pointer position at press time.
    pub origin: Point,
    /// Latest pointer position.
    pub pointer: Point,
    /// Scrolling while the pointer is outside.
    pub auto_scroll: AutoScroll,
    /// Task tree revision at press time.
    pub tree_revision: u64,
    /// Whether auto-scroll moved the window past the total range.
    pub forced: bool,
}

impl DragSession {
    /// Whether auto-scroll may scroll at all, and vertically.
    ///
    /// Progress drags never scroll; thumbs scroll horizontally only.
    pub fn scroll_axes(&self) -> Option<bool> {
        match self.handle {
            EditHandle::Progress => None,
            EditHandle::LeftThumb | EditHandle::RightThumb => Some(false),
            EditHandle::Preview | EditHandle::StartConnector | EditHandle::FinishConnector => {
                Some(true)
            }
        }
    }
}

/// The single gesture slot of a timeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    /// No pointer interaction.
    #[default]
    Idle,
    /// A handle is pressed but the pointer has not moved yet.
    Armed(DragSession),
    /// A bar handle is being dragged.
    Dragging(DragSession),
    /// A connector is being drawn.
    Connecting(DragSession),
}

impl Gesture {
    /// Returns `true` when nothing is pressed.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The active session.
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Idle => None,
            Self::Armed(s) | Self::Dragging(s) | Self::Connecting(s) => Some(s),
        }
    }

    /// The active session, mutably.
    pub fn session_mut(&mut self) -> Option<&mut DragSession> {
        match self {
            Self::Idle => None,
            Self::Armed(s) | Self::Dragging(s) | Self::Connecting(s) => Some(s),
        }
    }

    /// Moves an armed gesture into dragging (or connecting for connector handles).
    pub fn start_drag(&mut self) {
        *self = match core::mem::take(self) {
            Self::Armed(s) if s.handle.is_connector() => Self::Connecting(s),
            Self::Armed(s) => Self::Dragging(s),
            other => other,
        };
    }

    /// Ends the gesture, returning the session to commit. Its timer stops.
    pub fn commit(&mut self) -> Option<DragSession> {
        let mut session = match core::mem::take(self) {
            Self::Idle => return None,
            Self::Armed(s) | Self::Dragging(s) | Self::Connecting(s) => s,
        };
        session.auto_scroll.stop();
        Some(session)
    }

    /// Drops the gesture without committing, returning its session. Its timer stops.
    pub fn cancel(&mut self) -> Option<DragSession> {
        let session = self.commit()?;
        tracing::debug!(handle = ?session.handle, item = %session.target.item, "gesture cancelled");
        Some(session)
    }
}

/// Why a gesture commit left the data untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EditError {
    /// No handle is pressed.
    #[error("no gesture in progress")]
    NotDragging,
    /// The pointer position maps to no valid timestamp.
    #[error("edited dates are not valid timestamps")]
    InvalidTimestamp,
    /// The edited item no longer exists.
    #[error("unknown item {0}")]
    UnknownItem(ItemId),
    /// The task tree changed while the gesture was in flight.
    #[error("task tree was modified during the gesture")]
    TreeMutated,
    /// A connector was dropped on its own bar.
    #[error("a bar cannot be connected to itself")]
    SelfConnection,
}

/// What a committed gesture changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditOutcome {
    /// Nothing: the handle was released without a drag or over no target.
    Unchanged,
    /// Both dates moved by the same amount.
    Moved {
        /// New start.
        start: f64,
        /// New end.
        end: f64,
    },
    /// One date changed.
    Resized {
        /// New start.
        start: f64,
        /// New end.
        end: f64,
    },
    /// Progress changed.
    Progress(f64),
    /// A connector was added.
    Connected(ConnectorType),
}
