// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gantt date-time scale.
//!
//! The scale tracks three nested ranges:
//! - the *data* range (earliest and latest dates of the task tree),
//! - the *total* range (data range widened by the configured gaps, or pinned by soft/manual
//!   bounds), which limits scrolling,
//! - the *visible* range, the window currently mapped onto the timeline width.
//!
//! Every change of the visible or total range bumps [`DateTimeScale::revision`] and dispatches
//! [`Signal::NeedsRecalculation`] to listeners.

extern crate alloc;

use alloc::vec::Vec;

use chartwell_core::{Invalidatable, Invalidation, Signal, States};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::time::{Interval, MS_IN_DAY, MS_IN_MINUTE, TickSpan, utc_midnight};

/// Default zoom factor of [`DateTimeScale::zoom_in`] / [`DateTimeScale::zoom_out`].
pub const DEFAULT_ZOOM_FACTOR: f64 = 1.25;

/// Default gap added on each side of the data range, as a share of the data span.
pub const DEFAULT_GAP: f64 = 0.01;

/// A `[min, max]` pair of timestamps (ms).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DateRange {
    /// Start (ms).
    pub min: f64,
    /// End (ms).
    pub max: f64,
}

impl DateRange {
    /// Width of the range (ms).
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Which date a unit zoom is anchored to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RangeAnchor {
    /// Earliest data date; the window extends forward.
    #[default]
    FirstDate,
    /// Start of the visible window; the window extends forward.
    FirstVisibleDate,
    /// End of the visible window; the window extends backward.
    LastVisibleDate,
    /// Latest data date; the window extends backward.
    LastDate,
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Date-time scale of a gantt timeline.
#[derive(Debug)]
pub struct DateTimeScale {
    invalidation: Invalidation,
    min: Option<f64>,
    max: Option<f64>,
    total_min: Option<f64>,
    total_max: Option<f64>,
    data_min: Option<f64>,
    data_max: Option<f64>,
    manual_min: Option<f64>,
    manual_max: Option<f64>,
    soft_min: Option<f64>,
    soft_max: Option<f64>,
    minimum_gap: f64,
    maximum_gap: f64,
    consistent: bool,
    reference_now: f64,
    revision: u64,
}

impl Default for DateTimeScale {
    fn default() -> Self {
        Self::new()
    }
}

impl DateTimeScale {
    /// Creates an empty scale.
    pub fn new() -> Self {
        Self {
            invalidation: Invalidation::new(States::empty(), Signal::NeedsRecalculation.into()),
            min: None,
            max: None,
            total_min: None,
            total_max: None,
            data_min: None,
            data_max: None,
            manual_min: None,
            manual_max: None,
            soft_min: None,
            soft_max: None,
            minimum_gap: DEFAULT_GAP,
            maximum_gap: DEFAULT_GAP,
            consistent: false,
            reference_now: 0.0,
            revision: 0,
        }
    }

    /// Counter bumped whenever the visible or total range changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Sets the "now" timestamp used for the empty range.
    pub fn set_reference_now(&mut self, now: f64) {
        if now.is_finite() && now != self.reference_now {
            self.reference_now = now;
            if self.is_empty() {
                self.changed();
            }
        }
    }

    /// Returns `true` when neither a visible nor a data range is known.
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.data_min.is_none() && self.data_max.is_none()
    }

    /// Forgets every range (soft and manual bounds are kept).
    pub fn reset(&mut self) {
        self.min = None;
        self.max = None;
        self.total_min = None;
        self.total_max = None;
        self.data_min = None;
        self.data_max = None;
        self.consistent = false;
        self.changed();
    }

    /// Range reported while the scale is empty: the UTC day containing the reference "now".
    pub fn empty_range(&self) -> DateRange {
        let min = utc_midnight(self.reference_now);
        DateRange {
            min,
            max: min + MS_IN_DAY,
        }
    }

    /// Sets the visible range.
    ///
    /// Ignored if either bound is not finite or nothing changes. The range is clamped into the
    /// total range.
    pub fn set_range(&mut self, min: f64, max: f64) {
        if !min.is_finite() || !max.is_finite() {
            return;
        }
        if self.min != Some(min) || self.max != Some(max) {
            self.min = Some(min);
            self.max = Some(max);
            self.consistent = false;
            self.calculate();
            self.changed();
        }
    }

    /// Sets the data range; non-finite bounds clear it.
    ///
    /// The total range is recomputed from the new data.
    pub fn set_data_range(&mut self, min: f64, max: f64) {
        let (min, max) = (finite(min), finite(max));
        if self.data_min != min || self.data_max != max {
            self.data_min = min;
            self.data_max = max;
            self.total_min = None;
            self.total_max = None;
            self.consistent = false;
            self.calculate();
            self.changed();
        }
    }

    /// The data range, if known.
    pub fn data_range(&self) -> Option<DateRange> {
        Some(DateRange {
            min: self.data_min?,
            max: self.data_max?,
        })
    }

    /// The visible range.
    pub fn range(&self) -> DateRange {
        if self.is_empty() {
            return self.empty_range();
        }
        DateRange {
            min: self.min.unwrap_or(f64::NAN),
            max: self.max.unwrap_or(f64::NAN),
        }
    }

    /// The total range; bounds that cannot be resolved are `NaN`.
    pub fn total_range(&self) -> DateRange {
        if self.is_empty() {
            return self.empty_range();
        }
        let (min, max) = self.resolve_total();
        DateRange {
            min: min.unwrap_or(f64::NAN),
            max: max.unwrap_or(f64::NAN),
        }
    }

    /// Hard lower bound of the total range.
    pub fn set_minimum(&mut self, value: Option<f64>) {
        let value = value.and_then(finite);
        if self.manual_min != value {
            self.manual_min = value;
            self.total_min = None;
            self.recalculate();
        }
    }

    /// Hard upper bound of the total range.
    pub fn set_maximum(&mut self, value: Option<f64>) {
        let value = value.and_then(finite);
        if self.manual_max != value {
            self.manual_max = value;
            self.total_max = None;
            self.recalculate();
        }
    }

    /// Lower bound the total range always includes.
    pub fn set_soft_minimum(&mut self, value: Option<f64>) {
        let value = value.and_then(finite);
        if self.soft_min != value {
            self.soft_min = value;
            self.total_min = None;
            self.recalculate();
        }
    }

    /// Upper bound the total range always includes.
    pub fn set_soft_maximum(&mut self, value: Option<f64>) {
        let value = value.and_then(finite);
        if self.soft_max != value {
            self.soft_max = value;
            self.total_max = None;
            self.recalculate();
        }
    }

    /// Share of the data span added before the data range. Non-finite values count as 0.
    pub fn set_minimum_gap(&mut self, gap: f64) {
        let gap = finite(gap).unwrap_or(0.0);
        if self.minimum_gap != gap {
            self.minimum_gap = gap;
            self.total_min = None;
            self.recalculate();
        }
    }

    /// Share of the data span added after the data range. Non-finite values count as 0.
    pub fn set_maximum_gap(&mut self, gap: f64) {
        let gap = finite(gap).unwrap_or(0.0);
        if self.maximum_gap != gap {
            self.maximum_gap = gap;
            self.total_max = None;
            self.recalculate();
        }
    }

    /// Shows the whole total range.
    pub fn fit_all(&mut self) {
        if !self.is_empty() {
            let total = self.total_range();
            self.set_range(total.min, total.max);
        }
    }

    /// Zooms in by `factor` around the window center. The window never gets narrower than one
    /// minute.
    pub fn zoom_in(&mut self, factor: f64) {
        if self.is_empty() {
            return;
        }
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            DEFAULT_ZOOM_FACTOR
        };
        let range = self.range();
        let interval = (range.span() * (1.0 / factor - 1.0) / 2.0).round();
        let mut new_min = range.min - interval;
        let mut new_max = range.max + interval;
        if (new_min - new_max).abs() <= MS_IN_MINUTE {
            let middle = (range.min + range.max) / 2.0;
            new_min = middle - MS_IN_MINUTE / 2.0;
            new_max = middle + MS_IN_MINUTE / 2.0;
        }
        self.set_range(new_min, new_max);
    }

    /// Zooms out by `factor`, anchoring to a total-range edge when the window would leave it.
    pub fn zoom_out(&mut self, factor: f64) {
        if self.min_reached() && self.max_reached() {
            return;
        }
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            DEFAULT_ZOOM_FACTOR
        };
        let range = self.range();
        let interval = (range.span() * (factor - 1.0) / 2.0).round();
        let new_min = range.min - interval;
        let new_max = range.max + interval;
        let total = self.total_range();

        let below = new_min < total.min;
        let above = new_max > total.max;
        match (below, above) {
            (true, true) => self.set_range(total.min, total.max),
            (true, false) => self.set_range(total.min, new_max + (total.min - new_min)),
            (false, true) => self.set_range(new_min - (new_max - total.max), total.max),
            (false, false) => self.set_range(new_min, new_max),
        }
    }

    /// Shows `[start, end]`, or a window of the current width starting at `start`.
    ///
    /// The window is shifted (never shrunk below its requested width, unless wider than the
    /// total range) so it stays inside the total range.
    pub fn zoom_to(&mut self, start: f64, end: Option<f64>) {
        self.calculate();
        let (start, end, range) = match end {
            Some(end) => (start, end, end - start),
            None => {
                let span = self.range().span();
                (start, start + span, span)
            }
        };
        self.zoom_clamped(start, end, range);
    }

    /// Shows `count` calendar units starting (or ending) at `anchor`.
    pub fn zoom_to_unit(&mut self, interval: Interval, count: u32, anchor: RangeAnchor) {
        if count == 0 {
            return;
        }
        self.calculate();
        let steps = i32::try_from(count).unwrap_or(i32::MAX);
        let (anchor_date, steps) = match anchor {
            RangeAnchor::FirstDate => (self.data_min, steps),
            RangeAnchor::LastDate => (self.data_max, -steps),
            RangeAnchor::LastVisibleDate => (self.max, -steps),
            RangeAnchor::FirstVisibleDate => (self.min, steps),
        };
        let Some(anchor_date) = anchor_date else {
            return;
        };
        let other = interval.add(anchor_date, steps);
        if other.is_nan() {
            return;
        }
        let start = anchor_date.min(other);
        let end = anchor_date.max(other);
        self.zoom_clamped(start, end, end - start);
    }

    fn zoom_clamped(&mut self, mut start: f64, mut end: f64, range: f64) {
        let total = self.total_range();
        let range = range.min(total.span());
        if end > total.max {
            end = total.max;
            start = end - range;
        }
        if start < total.min {
            start = total.min;
            end = start + range;
        }
        self.set_range(start, end);
    }

    /// Scrolls the window by `ratio` of its width, stopping at the total range edges.
    pub fn ratio_scroll(&mut self, ratio: f64) {
        if ratio == 0.0 || !ratio.is_finite() || self.is_empty() {
            return;
        }
        let total = self.total_range();
        let range = self.range();
        let ms = (range.span() * ratio).round();
        let interval = if ms >= 0.0 {
            (total.max - range.max).min(ms)
        } else {
            (total.min - range.min).max(ms)
        };
        self.set_range(range.min + interval, range.max + interval);
    }

    /// Scrolls the window by `ratio` of its width, past the total range if needed.
    ///
    /// Used while dragging: the data range is dropped so the next
    /// [`set_data_range`](Self::set_data_range) rebuilds the total range around the edited data.
    /// Refuses to pass a manual bound.
    pub fn ratio_force_scroll(&mut self, ratio: f64) {
        if ratio == 0.0 || !ratio.is_finite() || self.is_empty() {
            return;
        }
        self.cache_total();
        let range = self.range();
        let ms = (range.span() * ratio).round();
        let new_min = range.min + ms;
        let new_max = range.max + ms;
        if self.manual_min.is_some_and(|m| new_min < m) || self.manual_max.is_some_and(|m| new_max > m)
        {
            return;
        }
        self.data_min = None;
        self.data_max = None;
        self.min = Some(new_min);
        self.max = Some(new_max);
        self.changed();
    }

    /// Position of `value` in the visible window; values outside map below 0 or above 1.
    ///
    /// A zero-width window maps everything to 0.
    pub fn timestamp_to_ratio(&self, value: f64) -> f64 {
        let range = self.range();
        let span = range.span();
        if span == 0.0 {
            return 0.0;
        }
        (value - range.min) / span
    }

    /// Timestamp at `ratio` of the visible window, rounded to the millisecond.
    pub fn ratio_to_timestamp(&self, ratio: f64) -> f64 {
        let range = self.range();
        (ratio * range.span() + range.min).round()
    }

    /// Calendar tick spans covering the visible window.
    pub fn ticks(&self, interval: Interval, count: u32) -> Vec<TickSpan> {
        let range = self.range();
        interval.ticks(range.min, range.max, count)
    }

    fn min_reached(&self) -> bool {
        self.is_empty() || self.min.is_some_and(|m| m <= self.total_range().min)
    }

    fn max_reached(&self) -> bool {
        self.is_empty() || self.max.is_some_and(|m| m >= self.total_range().max)
    }

    fn resolve_total(&self) -> (Option<f64>, Option<f64>) {
        let total_min = self.total_min.or_else(|| {
            if let Some(manual) = self.manual_min {
                return Some(manual);
            }
            let data_min = self.data_min?;
            if let Some(soft) = self.soft_min {
                return Some(soft.min(data_min));
            }
            let max = match (self.manual_max, self.soft_max) {
                (Some(manual), _) => manual,
                (None, Some(soft)) => self.data_max?.max(soft),
                (None, None) => self.data_max?,
            };
            Some(data_min - (max - data_min) * self.minimum_gap)
        });
        let total_max = self.total_max.or_else(|| {
            if let Some(manual) = self.manual_max {
                return Some(manual);
            }
            let data_max = self.data_max?;
            if let Some(soft) = self.soft_max {
                return Some(soft.max(data_max));
            }
            let min = match (self.manual_min, self.soft_min) {
                (Some(manual), _) => manual,
                (None, Some(soft)) => self.data_min?.min(soft),
                (None, None) => self.data_min?,
            };
            Some(data_max + (data_max - min) * self.maximum_gap)
        });
        (total_min, total_max)
    }

    fn cache_total(&mut self) {
        let (min, max) = self.resolve_total();
        self.total_min = min;
        self.total_max = max;
    }

    fn calculate(&mut self) {
        if self.consistent || self.is_empty() {
            return;
        }
        self.consistent = true;
        self.cache_total();
        let (t_min, t_max) = (self.total_min, self.total_max);

        match t_min {
            None => {
                if self.min.is_some() {
                    self.data_min = self.min;
                }
            }
            Some(t) => self.min = Some(self.min.map_or(t, |m| m.max(t))),
        }
        match t_max {
            None => {
                if self.max.is_some() {
                    self.data_max = self.max;
                }
            }
            Some(t) => self.max = Some(self.max.map_or(t, |m| m.min(t))),
        }

        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                let range = min - max;
                let new_min = t_min.map_or(max, |t| max.max(t));
                let new_max = t_max.map_or(new_min + range, |t| (new_min + range).min(t));
                self.min = Some(new_min);
                self.max = Some(new_max);
            }
        }
    }

    fn recalculate(&mut self) {
        self.consistent = false;
        self.calculate();
        self.changed();
    }

    fn changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.invalidation
            .dispatch_signal(Signal::NeedsRecalculation);
    }
}

impl Invalidatable for DateTimeScale {
    fn invalidation(&self) -> &Invalidation {
        &self.invalidation
    }

    fn invalidation_mut(&mut self) -> &mut Invalidation {
        &mut self.invalidation
    }
}
