// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible rows and vertical scrolling of a gantt timeline.
//!
//! Rows are the items of the task tree that no collapsed ancestor hides. Every row is followed
//! by a separator line; `height_cache[i]` is the height of rows `0..=i` including their
//! separators. The controller keeps a start row and a pixel offset into it, and derives the
//! last visible row from the available height.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;

use super::data::{AutoValues, ItemId, ProjectItemInfo, TaskTree};
use crate::time::MS_IN_DAY;

/// A visible row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Row {
    /// Item shown in the row.
    pub id: ItemId,
    /// Nesting depth.
    pub depth: usize,
    /// Whether the item has children.
    pub has_children: bool,
    /// Row height without the separator.
    pub height: f64,
}

/// Which end of the viewport is pinned to a row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Anchor {
    Start(usize),
    End(usize),
}

/// Rows, heights and vertical scroll state.
#[derive(Debug)]
pub struct RowsController {
    default_row_height: f64,
    row_separation: f64,
    available_height: f64,
    anchor: Anchor,
    start_index: usize,
    end_index: usize,
    vertical_offset: f64,
    rows: Vec<Row>,
    height_cache: Vec<f64>,
    auto: HashMap<ItemId, AutoValues>,
    date_range: Option<(f64, f64)>,
    resources: bool,
    tree_revision: Option<u64>,
}

impl RowsController {
    /// Creates a controller for rows of `default_row_height` separated by 1 px lines.
    pub fn new(default_row_height: f64) -> Self {
        Self {
            default_row_height,
            row_separation: 1.0,
            available_height: 0.0,
            anchor: Anchor::Start(0),
            start_index: 0,
            end_index: 0,
            vertical_offset: 0.0,
            rows: Vec::new(),
            height_cache: Vec::new(),
            auto: HashMap::new(),
            date_range: None,
            resources: false,
            tree_revision: None,
        }
    }

    /// Sets the height of rows without an override. Takes effect on the next rebuild.
    pub fn set_default_row_height(&mut self, height: f64) {
        if height.is_finite() && height > 0.0 && height != self.default_row_height {
            self.default_row_height = height;
            self.tree_revision = None;
        }
    }

    /// Thickness of the line below every row.
    pub fn row_separation(&self) -> f64 {
        self.row_separation
    }

    /// Sets the separator thickness. Takes effect on the next rebuild.
    pub fn set_row_separation(&mut self, separation: f64) {
        if separation.is_finite() && separation >= 0.0 && separation != self.row_separation {
            self.row_separation = separation;
            self.tree_revision = None;
        }
    }

    /// Switches between project rows and resource rows (dates come from periods).
    pub fn set_resources(&mut self, resources: bool) {
        if self.resources != resources {
            self.resources = resources;
            self.tree_revision = None;
        }
    }

    /// Whether rows show resource periods.
    pub fn resources(&self) -> bool {
        self.resources
    }

    /// Rebuilds rows, heights, derived values and the date range if the tree changed.
    ///
    /// Returns `true` if anything was rebuilt.
    pub fn sync(&mut self, tree: &TaskTree) -> bool {
        if self.tree_revision == Some(tree.revision()) {
            return false;
        }
        self.rebuild(tree);
        true
    }

    /// Rebuilds unconditionally.
    pub fn rebuild(&mut self, tree: &TaskTree) {
        self.tree_revision = Some(tree.revision());
        self.auto = if self.resources {
            HashMap::new()
        } else {
            tree.auto_values()
        };

        self.rows.clear();
        self.height_cache.clear();
        let mut total = 0.0;
        for (item, depth) in tree.expanded() {
            let height = item.row_height.unwrap_or(self.default_row_height);
            total += height + self.row_separation;
            self.rows.push(Row {
                id: item.id,
                depth,
                has_children: tree.num_children(item.id) > 0,
                height,
            });
            self.height_cache.push(total);
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut track = |value: Option<f64>| {
            if let Some(v) = value.filter(|v| v.is_finite()) {
                min = min.min(v);
                max = max.max(v);
            }
        };
        for (item, _) in tree.iter() {
            if self.resources {
                for period in &item.periods {
                    track(Some(period.start));
                    track(Some(period.end));
                }
            } else {
                let auto = self.auto.get(&item.id).copied().unwrap_or_default();
                track(item.actual_start.or(auto.start));
                track(item.actual_end.or(auto.end));
                track(item.baseline_start);
                track(item.baseline_end);
            }
        }
        self.date_range = if min.is_finite() && max.is_finite() {
            if min == max {
                Some((min - MS_IN_DAY / 2.0, max + MS_IN_DAY / 2.0))
            } else {
                Some((min, max))
            }
        } else {
            None
        };
        self.recalculate();
    }

    /// Earliest and latest date of the data, widened when only one date is known.
    pub fn date_range(&self) -> Option<(f64, f64)> {
        self.date_range
    }

    /// Derived values of a parent item.
    pub fn auto_values(&self, id: ItemId) -> AutoValues {
        self.auto.get(&id).copied().unwrap_or_default()
    }

    /// Classification of the item in `row`.
    pub fn item_info(&self, tree: &TaskTree, row: usize) -> Option<ProjectItemInfo> {
        let r = self.rows.get(row)?;
        let item = tree.get(r.id)?;
        Some(ProjectItemInfo::new(item, r.has_children, self.auto_values(r.id)))
    }

    /// All rows not hidden by a collapsed ancestor.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row index of `id`, if visible.
    pub fn row_of(&self, id: ItemId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    /// Height available to rows.
    pub fn available_height(&self) -> f64 {
        self.available_height
    }

    /// Sets the height available to rows and recalculates the visible range.
    pub fn set_available_height(&mut self, height: f64) {
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        if height != self.available_height {
            self.available_height = height;
            self.recalculate();
        }
    }

    /// First (partially) visible row.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Last (partially) visible row.
    pub fn end_index(&self) -> usize {
        self.end_index
    }

    /// Pixels of the start row scrolled out at the top.
    pub fn vertical_offset(&self) -> f64 {
        self.vertical_offset
    }

    /// Range of visible row indexes.
    pub fn visible_range(&self) -> core::ops::Range<usize> {
        if self.rows.is_empty() {
            0..0
        } else {
            self.start_index..self.end_index + 1
        }
    }

    /// Height of all rows including separators.
    pub fn total_height(&self) -> f64 {
        self.height_cache.last().copied().unwrap_or(0.0)
    }

    /// Height of rows `start..=end` including separators.
    pub fn height_by_indexes(&self, start: usize, end: usize) -> f64 {
        if self.height_cache.is_empty() || start > end {
            return 0.0;
        }
        let end = end.min(self.height_cache.len() - 1);
        self.height_cache[end] - self.height_before(start)
    }

    /// Index of the row that contains the pixel `height` (from the top of the first row).
    pub fn index_by_height(&self, height: f64) -> usize {
        let i = self.height_cache.partition_point(|&h| h <= height);
        i.min(self.height_cache.len().saturating_sub(1))
    }

    /// Current scroll position in pixels from the top of the first row.
    pub fn scroll_position(&self) -> f64 {
        self.height_before(self.start_index) + self.vertical_offset
    }

    /// Top of `row` relative to `rows_top`, the top of the rows area.
    pub fn row_top(&self, row: usize, rows_top: f64) -> f64 {
        rows_top + self.row_separation + self.height_before(row) - self.scroll_position()
    }

    /// Scrolls so `pixels` from the top of the first row is at the top of the viewport.
    pub fn scroll_to(&mut self, pixels: f64) {
        if self.rows.is_empty() {
            return;
        }
        let pixels = if pixels.is_finite() { pixels.max(0.0) } else { 0.0 };
        if pixels > self.total_height() - self.available_height {
            self.anchor = Anchor::End(self.rows.len() - 1);
        } else {
            let start = self.index_by_height(pixels);
            self.anchor = Anchor::Start(start);
            self.vertical_offset = pixels - self.height_before(start);
        }
        self.recalculate();
    }

    /// Scrolls `row` to the top.
    pub fn scroll_to_row(&mut self, row: usize) {
        self.anchor = Anchor::Start(row);
        self.vertical_offset = 0.0;
        self.recalculate();
    }

    /// Scrolls the last row into view at the bottom.
    pub fn scroll_to_end(&mut self) {
        self.anchor = Anchor::End(self.rows.len().saturating_sub(1));
        self.recalculate();
    }

    /// Derives the visible range from the anchor, keeping the viewport filled.
    pub fn recalculate(&mut self) {
        if self.rows.is_empty() {
            self.start_index = 0;
            self.end_index = 0;
            self.vertical_offset = 0.0;
            return;
        }
        let last = self.rows.len() - 1;
        let total = self.total_height();
        let available = self.available_height;
        if available >= total {
            self.anchor = Anchor::Start(0);
            self.start_index = 0;
            self.end_index = last;
            self.vertical_offset = 0.0;
            return;
        }
        match self.anchor {
            Anchor::Start(start) => {
                let start = start.min(last);
                if self.height_by_indexes(start, last) - self.vertical_offset < available {
                    self.pin_to_end(last);
                } else {
                    self.start_index = start;
                    self.end_index = self
                        .index_by_height(self.height_before(start) + available + self.vertical_offset);
                }
            }
            Anchor::End(end) => {
                let end = end.min(last);
                if self.height_cache[end] < available {
                    self.start_index = 0;
                    self.vertical_offset = 0.0;
                    self.end_index = self.index_by_height(available);
                } else {
                    self.pin_to_end(end);
                }
            }
        }
    }

    fn pin_to_end(&mut self, end: usize) {
        let start = self.index_by_height(self.height_cache[end] - self.available_height);
        self.start_index = start;
        self.end_index = end;
        self.vertical_offset = self.height_by_indexes(start, end) - self.available_height;
    }

    fn height_before(&self, row: usize) -> f64 {
        if row == 0 {
            0.0
        } else {
            self.height_cache
                .get(row - 1)
                .or(self.height_cache.last())
                .copied()
                .unwrap_or(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::gantt::data::TaskItem;

    fn tree(rows: u64) -> TaskTree {
        let mut tree = TaskTree::new();
        for i in 0..rows {
            let start = i as f64 * 100.0;
            tree.add(None, TaskItem::new(ItemId(i), "task").with_dates(start, start + 50.0))
                .unwrap();
        }
        tree
    }

    fn controller(rows: u64, available: f64) -> RowsController {
        let mut c = RowsController::new(20.0);
        c.rebuild(&tree(rows));
        c.set_available_height(available);
        c
    }

    #[test]
    fn height_cache_accumulates_rows_and_separators() {
        let c = controller(10, 1000.0);
        assert_eq!(c.total_height(), 210.0);
        assert_eq!(c.height_by_indexes(2, 4), 63.0);
        assert_eq!(c.index_by_height(0.0), 0);
        assert_eq!(c.index_by_height(21.0), 1, "a row boundary belongs to the next row");
        assert_eq!(c.index_by_height(5000.0), 9);
        assert_eq!(c.visible_range(), 0..10);
        assert_eq!(c.date_range(), Some((0.0, 950.0)));
    }

    #[test]
    fn scrolling_past_the_end_pins_the_last_row() {
        let mut c = controller(10, 100.0);
        assert_eq!((c.start_index(), c.end_index()), (0, 4));

        c.scroll_to(30.0);
        assert_eq!(c.start_index(), 1);
        assert_eq!(c.vertical_offset(), 9.0);
        assert_eq!(c.scroll_position(), 30.0);

        c.scroll_to(1_000.0);
        assert_eq!(c.end_index(), 9);
        assert_eq!(c.start_index(), 5);
        assert_eq!(c.vertical_offset(), 5.0);
        assert_eq!(c.scroll_position(), 110.0, "bottom of the last row meets the viewport bottom");

        c.scroll_to(-50.0);
        assert_eq!((c.start_index(), c.vertical_offset()), (0, 0.0));
    }

    #[test]
    fn row_tops_follow_the_scroll_position() {
        let mut c = controller(10, 100.0);
        assert_eq!(c.row_top(0, 0.0), 1.0);
        assert_eq!(c.row_top(3, 0.0), 64.0);
        c.scroll_to_row(2);
        assert_eq!(c.row_top(2, 10.0), 11.0);
        assert_eq!(c.row_top(1, 10.0), -10.0);
    }

    #[test]
    fn growing_the_viewport_refills_from_the_end() {
        let mut c = controller(10, 100.0);
        c.scroll_to_row(8);
        assert_eq!(c.end_index(), 9, "too few rows below row 8 to fill the viewport");
        assert!(c.start_index() < 8);
        c.set_available_height(500.0);
        assert_eq!(c.visible_range(), 0..10);
    }

    #[test]
    fn empty_trees_have_no_rows_or_dates() {
        let mut c = RowsController::new(20.0);
        c.rebuild(&TaskTree::new());
        c.scroll_to(50.0);
        assert_eq!(c.visible_range(), 0..0);
        assert_eq!(c.date_range(), None);
    }

    #[test]
    fn single_dates_widen_to_a_day() {
        let mut t = TaskTree::new();
        t.add(None, TaskItem::new(ItemId(1), "m").with_start(MS_IN_DAY)).unwrap();
        let mut c = RowsController::new(20.0);
        assert!(c.sync(&t));
        assert!(!c.sync(&t), "unchanged tree is not rebuilt");
        assert_eq!(c.date_range(), Some((MS_IN_DAY / 2.0, MS_IN_DAY * 1.5)));
    }
}
