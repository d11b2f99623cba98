// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gantt task tree.
//!
//! The tree owns the project items and is the only place dates are stored. Auto-computed dates
//! of parent items live in the rows controller's side-table, never in the items themselves.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use chartwell_core::{Invalidatable, Invalidation, Signal, Signals, States};
use hashbrown::HashMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::theme::parse_percent;

/// Stable identity of a task or resource period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which ends of two bars a connector joins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectorType {
    /// Start of the source to start of the target.
    StartStart,
    /// Start of the source to finish of the target.
    StartFinish,
    /// Finish of the source to start of the target.
    #[default]
    FinishStart,
    /// Finish of the source to finish of the target.
    FinishFinish,
}

/// An unrecognized connector type name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown connector type {0:?}")]
pub struct ParseConnectorTypeError(pub String);

impl FromStr for ConnectorType {
    type Err = ParseConnectorTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let names = [
            ("start-start", Self::StartStart),
            ("start-finish", Self::StartFinish),
            ("finish-start", Self::FinishStart),
            ("finish-finish", Self::FinishFinish),
        ];
        names
            .iter()
            .find(|(name, _)| {
                name.eq_ignore_ascii_case(t) || name.replace('-', "").eq_ignore_ascii_case(t)
            })
            .map(|(_, kind)| *kind)
            .ok_or_else(|| ParseConnectorTypeError(s.into()))
    }
}

/// A dependency arrow from the owning item (or period) to another one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connector {
    /// Target item or period.
    pub connect_to: ItemId,
    /// Joined ends.
    pub kind: ConnectorType,
}

impl Connector {
    /// Creates a connector to `connect_to`.
    pub fn new(connect_to: ItemId, kind: ConnectorType) -> Self {
        Self { connect_to, kind }
    }
}

/// The deprecated single-connector form of older project files.
///
/// It is converted once, on import, into the regular connector list; see
/// [`TaskItem::with_legacy_connector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegacyConnector {
    /// Target item.
    pub connect_to: ItemId,
    /// Joined ends; finish-start when absent.
    pub connector_type: Option<ConnectorType>,
}

impl From<LegacyConnector> for Connector {
    fn from(legacy: LegacyConnector) -> Self {
        Self::new(legacy.connect_to, legacy.connector_type.unwrap_or_default())
    }
}

/// One booking of a resource row.
#[derive(Clone, Debug, PartialEq)]
pub struct Period {
    /// Identity used by connectors.
    pub id: ItemId,
    /// Start timestamp (ms).
    pub start: f64,
    /// End timestamp (ms).
    pub end: f64,
    /// Outgoing connectors.
    pub connectors: SmallVec<[Connector; 2]>,
}

impl Period {
    /// Creates a period without connectors.
    pub fn new(id: ItemId, start: f64, end: f64) -> Self {
        Self {
            id,
            start,
            end,
            connectors: SmallVec::new(),
        }
    }

    /// Adds an outgoing connector.
    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connectors.push(connector);
        self
    }

    /// Returns `true` when both dates are finite.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Parses a progress value given as a ratio (`"0.25"`) or a percent string (`"25%"`).
///
/// The result is clamped to `[0, 1]`.
pub fn parse_progress(text: &str) -> Option<f64> {
    let value = if text.trim().ends_with('%') {
        parse_percent(text).ok()? / 100.0
    } else {
        f64::from_str(text.trim()).ok()?
    };
    finite(value).map(|v| v.clamp(0.0, 1.0))
}

/// A project task or resource row.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskItem {
    /// Identity used by connectors and the tree index.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Actual start timestamp (ms).
    pub actual_start: Option<f64>,
    /// Actual end timestamp (ms).
    pub actual_end: Option<f64>,
    /// Planned start timestamp (ms).
    pub baseline_start: Option<f64>,
    /// Planned end timestamp (ms).
    pub baseline_end: Option<f64>,
    /// Completed share in `[0, 1]`.
    pub progress: Option<f64>,
    /// Bookings of a resource row.
    pub periods: Vec<Period>,
    /// Outgoing connectors.
    pub connectors: SmallVec<[Connector; 2]>,
    /// Whether children are hidden.
    pub collapsed: bool,
    /// Row height override.
    pub row_height: Option<f64>,
    /// Whether children are loaded lazily (drawn as a parent).
    pub loadable: bool,
}

impl TaskItem {
    /// Creates an item without dates.
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            actual_start: None,
            actual_end: None,
            baseline_start: None,
            baseline_end: None,
            progress: None,
            periods: Vec::new(),
            connectors: SmallVec::new(),
            collapsed: false,
            row_height: None,
            loadable: false,
        }
    }

    /// Sets the actual dates; non-finite values are treated as missing.
    pub fn with_dates(mut self, start: f64, end: f64) -> Self {
        self.actual_start = finite(start);
        self.actual_end = finite(end);
        self
    }

    /// Sets only the actual start.
    pub fn with_start(mut self, start: f64) -> Self {
        self.actual_start = finite(start);
        self
    }

    /// Sets the planned dates.
    pub fn with_baseline(mut self, start: f64, end: f64) -> Self {
        self.baseline_start = finite(start);
        self.baseline_end = finite(end);
        self
    }

    /// Sets the progress, clamped to `[0, 1]`.
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = finite(progress).map(|p| p.clamp(0.0, 1.0));
        self
    }

    /// Adds a resource period.
    pub fn with_period(mut self, period: Period) -> Self {
        self.periods.push(period);
        self
    }

    /// Adds an outgoing connector.
    pub fn with_connector(mut self, connector: Connector) -> Self {
        self.connectors.push(connector);
        self
    }

    /// Imports a deprecated scalar connector.
    ///
    /// It becomes the first entry of the connector list, ahead of connectors given in the list
    /// form.
    pub fn with_legacy_connector(mut self, legacy: LegacyConnector) -> Self {
        tracing::debug!(item = %self.id, target = %legacy.connect_to, "importing legacy connector");
        self.connectors.insert(0, legacy.into());
        self
    }

    /// Sets the collapsed flag.
    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// Overrides the row height.
    pub fn with_row_height(mut self, height: f64) -> Self {
        self.row_height = finite(height).filter(|h| *h > 0.0);
        self
    }

    /// Marks the item as lazily loaded.
    pub fn with_loadable(mut self, loadable: bool) -> Self {
        self.loadable = loadable;
        self
    }
}

/// Dates and progress a parent derives from its children.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AutoValues {
    /// Earliest child date.
    pub start: Option<f64>,
    /// Latest child date.
    pub end: Option<f64>,
    /// Duration-weighted child progress.
    pub progress: Option<f64>,
}

/// How an item is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemShape {
    /// Actual bar paired with a planned bar.
    Baseline,
    /// Summary bracket.
    Parent,
    /// Diamond.
    Milestone,
    /// Plain bar with a progress overlay.
    Task,
    /// Nothing to draw (missing dates).
    Nothing,
}

/// Classification of an item from its own and derived values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectItemInfo {
    /// Own start, else the derived one.
    pub start: Option<f64>,
    /// Own end, else the derived one.
    pub end: Option<f64>,
    /// Own progress, else the derived one.
    pub progress: Option<f64>,
    /// Both dates are known and differ.
    pub is_valid_task: bool,
    /// A parent whose dates collapse to a single point.
    pub is_flat_grouping_task: bool,
    /// Both planned dates are known.
    pub is_valid_baseline: bool,
    /// A leaf with a single date.
    pub is_milestone: bool,
    /// A parent with both dates.
    pub is_grouping_task: bool,
    /// Progress is known.
    pub is_valid_progress: bool,
    /// Children are loaded lazily.
    pub is_loadable: bool,
}

impl ProjectItemInfo {
    /// Classifies `item`.
    pub fn new(item: &TaskItem, has_children: bool, auto: AutoValues) -> Self {
        let start = item.actual_start.or(auto.start);
        let end = item.actual_end.or(auto.end);
        let progress = item.progress.or(auto.progress);
        let same = matches!((start, end), (Some(s), Some(e)) if s == e);
        let is_valid_baseline = item.baseline_start.is_some() && item.baseline_end.is_some();
        Self {
            start,
            end,
            progress,
            is_valid_task: start.is_some() && end.is_some() && !same,
            is_flat_grouping_task: same && has_children,
            is_valid_baseline,
            is_milestone: !has_children && ((start.is_some() && end.is_none()) || same),
            is_grouping_task: has_children && start.is_some() && end.is_some(),
            is_valid_progress: progress.is_some(),
            is_loadable: item.loadable,
        }
    }

    /// The drawing style.
    pub fn shape(&self) -> ItemShape {
        if self.is_valid_baseline {
            ItemShape::Baseline
        } else if self.is_grouping_task || (self.is_loadable && self.start.is_some()) {
            ItemShape::Parent
        } else if self.is_milestone {
            ItemShape::Milestone
        } else if self.is_valid_task {
            ItemShape::Task
        } else {
            ItemShape::Nothing
        }
    }
}

/// Why a tree operation was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    /// An item with this id already exists.
    #[error("item {0} already exists")]
    DuplicateId(ItemId),
    /// No item with this id exists.
    #[error("unknown item {0}")]
    UnknownItem(ItemId),
}

#[derive(Clone, Debug)]
struct Node {
    item: TaskItem,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// The project tree.
///
/// Every mutation bumps [`revision`](Self::revision) and dispatches
/// [`Signal::DataChanged`] (or [`Signal::MetaChanged`] for collapse changes) to listeners.
/// Multi-field writes should run inside [`batch`](Self::batch) so listeners are notified once.
#[derive(Debug)]
pub struct TaskTree {
    nodes: Vec<Node>,
    roots: Vec<usize>,
    index: HashMap<ItemId, usize>,
    invalidation: Invalidation,
    revision: u64,
}

impl Default for TaskTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            index: HashMap::new(),
            invalidation: Invalidation::new(
                States::empty(),
                Signal::DataChanged | Signal::MetaChanged | Signal::NeedsRedraw,
            ),
            revision: 0,
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no items.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Counter bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Adds `item` under `parent` (or as a root).
    pub fn add(&mut self, parent: Option<ItemId>, item: TaskItem) -> Result<(), TreeError> {
        if self.index.contains_key(&item.id) {
            return Err(TreeError::DuplicateId(item.id));
        }
        let parent = match parent {
            Some(id) => Some(self.node_index(id)?),
            None => None,
        };
        let node = self.nodes.len();
        self.index.insert(item.id, node);
        self.nodes.push(Node {
            item,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.nodes[p].children.push(node),
            None => self.roots.push(node),
        }
        self.changed(Signal::DataChanged);
        Ok(())
    }

    /// The item with `id`.
    pub fn get(&self, id: ItemId) -> Option<&TaskItem> {
        self.index.get(&id).map(|&i| &self.nodes[i].item)
    }

    /// Returns `true` if an item with `id` exists.
    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    /// The item owning the period `id`, with the period position.
    pub fn find_period(&self, id: ItemId) -> Option<(ItemId, usize)> {
        self.nodes.iter().find_map(|node| {
            node.item
                .periods
                .iter()
                .position(|p| p.id == id)
                .map(|pos| (node.item.id, pos))
        })
    }

    /// Modifies the item with `id`.
    ///
    /// The id itself must not be changed by `f`; a changed id is restored.
    pub fn update<R>(&mut self, id: ItemId, f: impl FnOnce(&mut TaskItem) -> R) -> Result<R, TreeError> {
        let node = self.node_index(id)?;
        let item = &mut self.nodes[node].item;
        let out = f(item);
        item.id = id;
        self.changed(Signal::DataChanged);
        Ok(out)
    }

    /// Collapses or expands one item.
    pub fn set_collapsed(&mut self, id: ItemId, collapsed: bool) -> Result<(), TreeError> {
        let node = self.node_index(id)?;
        if self.nodes[node].item.collapsed != collapsed {
            self.nodes[node].item.collapsed = collapsed;
            self.changed(Signal::MetaChanged);
        }
        Ok(())
    }

    /// Collapses or expands every item that has children.
    pub fn set_all_collapsed(&mut self, collapsed: bool) {
        let mut changed = false;
        for node in &mut self.nodes {
            if !node.children.is_empty() && node.item.collapsed != collapsed {
                node.item.collapsed = collapsed;
                changed = true;
            }
        }
        if changed {
            self.changed(Signal::MetaChanged);
        }
    }

    /// Root items in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &TaskItem> + '_ {
        self.roots.iter().map(|&i| &self.nodes[i].item)
    }

    /// Children of `id` in insertion order.
    pub fn children(&self, id: ItemId) -> impl Iterator<Item = &TaskItem> + '_ {
        let children = match self.index.get(&id) {
            Some(&i) => self.nodes[i].children.as_slice(),
            None => &[],
        };
        children.iter().map(|&c| &self.nodes[c].item)
    }

    /// Number of children of `id`.
    pub fn num_children(&self, id: ItemId) -> usize {
        self.index
            .get(&id)
            .map_or(0, |&i| self.nodes[i].children.len())
    }

    /// Parent of `id`.
    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        let node = *self.index.get(&id)?;
        self.nodes[node].parent.map(|p| self.nodes[p].item.id)
    }

    /// Every item in depth-first order with its depth.
    pub fn iter(&self) -> impl Iterator<Item = (&TaskItem, usize)> + '_ {
        self.walk(false).into_iter().map(|(i, d)| (&self.nodes[i].item, d))
    }

    /// Items not hidden by a collapsed ancestor, in depth-first order with their depth.
    pub fn expanded(&self) -> impl Iterator<Item = (&TaskItem, usize)> + '_ {
        self.walk(true).into_iter().map(|(i, d)| (&self.nodes[i].item, d))
    }

    /// Runs `f` with signal dispatch suspended; listeners see one notification.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.invalidation.suspend();
        let out = f(self);
        self.invalidation.resume(true);
        out
    }

    /// Derived dates and progress of every parent, keyed by item id.
    pub fn auto_values(&self) -> HashMap<ItemId, AutoValues> {
        let mut out = HashMap::new();
        for &root in &self.roots {
            self.auto_calc(root, &mut out);
        }
        out
    }

    fn auto_calc(&self, node: usize, out: &mut HashMap<ItemId, AutoValues>) -> AutoValues {
        let children = &self.nodes[node].children;
        if children.is_empty() {
            return AutoValues::default();
        }
        let mut start: Option<f64> = None;
        let mut end: Option<f64> = None;
        let mut progress_length = 0.0;
        let mut total_length = 0.0;
        for &child in children {
            let auto = self.auto_calc(child, out);
            let item = &self.nodes[child].item;
            let child_start = item.actual_start.or(auto.start);
            let child_end = item.actual_end.or(auto.end).or(child_start);
            let child_progress = item.progress.or(auto.progress).unwrap_or(0.0);
            if let (Some(s), Some(e)) = (child_start, child_end) {
                let lo = s.min(e);
                let hi = s.max(e);
                start = Some(start.map_or(lo, |v| v.min(lo)));
                end = Some(end.map_or(hi, |v| v.max(hi)));
                let delta = e - s;
                progress_length += child_progress * delta;
                total_length += delta;
            }
        }
        let values = AutoValues {
            start,
            end,
            progress: (total_length != 0.0).then(|| progress_length / total_length),
        };
        out.insert(self.nodes[node].item.id, values);
        values
    }

    fn walk(&self, expanded_only: bool) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&r| (r, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            out.push((node, depth));
            let n = &self.nodes[node];
            if expanded_only && n.item.collapsed {
                continue;
            }
            stack.extend(n.children.iter().rev().map(|&c| (c, depth + 1)));
        }
        out
    }

    fn node_index(&self, id: ItemId) -> Result<usize, TreeError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(TreeError::UnknownItem(id))
    }

    fn changed(&mut self, signal: Signal) {
        self.revision = self.revision.wrapping_add(1);
        self.invalidation
            .dispatch_signal(Signals::from(signal) | Signal::NeedsRedraw);
    }
}

impl Invalidatable for TaskTree {
    fn invalidation(&self) -> &Invalidation {
        &self.invalidation
    }

    fn invalidation_mut(&mut self) -> &mut Invalidation {
        &mut self.invalidation
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::rc::Rc;
    use core::cell::Cell;

    use super::*;

    fn project() -> TaskTree {
        let mut tree = TaskTree::new();
        tree.add(None, TaskItem::new(ItemId(1), "Phase")).unwrap();
        tree.add(
            Some(ItemId(1)),
            TaskItem::new(ItemId(2), "Design")
                .with_dates(100.0, 200.0)
                .with_progress(1.0),
        )
        .unwrap();
        tree.add(
            Some(ItemId(1)),
            TaskItem::new(ItemId(3), "Build")
                .with_dates(200.0, 500.0)
                .with_progress(0.0),
        )
        .unwrap();
        tree.add(None, TaskItem::new(ItemId(4), "Launch").with_start(600.0))
            .unwrap();
        tree
    }

    #[test]
    fn parents_derive_dates_and_weighted_progress() {
        let tree = project();
        let auto = tree.auto_values();
        let phase = auto[&ItemId(1)];
        assert_eq!(phase.start, Some(100.0));
        assert_eq!(phase.end, Some(500.0));
        let progress = phase.progress.unwrap();
        assert!((progress - 0.25).abs() < 1e-12, "100 of 400 ms done, got {progress}");
        assert!(!auto.contains_key(&ItemId(2)), "leaves carry no derived values");
        assert_eq!(tree.get(ItemId(1)).unwrap().actual_start, None, "data is never written");
    }

    #[test]
    fn classification_follows_dates_and_children() {
        let tree = project();
        let auto = tree.auto_values();
        let info = |id| {
            let item = tree.get(id).unwrap();
            ProjectItemInfo::new(item, tree.num_children(id) > 0, auto.get(&id).copied().unwrap_or_default())
        };
        assert_eq!(info(ItemId(1)).shape(), ItemShape::Parent);
        assert_eq!(info(ItemId(2)).shape(), ItemShape::Task);
        assert_eq!(info(ItemId(4)).shape(), ItemShape::Milestone);

        let flat = TaskItem::new(ItemId(9), "flat").with_dates(5.0, 5.0);
        let flat_info = ProjectItemInfo::new(&flat, true, AutoValues::default());
        assert!(flat_info.is_flat_grouping_task);
        assert_eq!(flat_info.shape(), ItemShape::Parent);

        let planned = TaskItem::new(ItemId(10), "planned")
            .with_dates(0.0, 10.0)
            .with_baseline(2.0, 12.0);
        assert_eq!(
            ProjectItemInfo::new(&planned, false, AutoValues::default()).shape(),
            ItemShape::Baseline
        );
        let undated = TaskItem::new(ItemId(11), "undated");
        assert_eq!(
            ProjectItemInfo::new(&undated, false, AutoValues::default()).shape(),
            ItemShape::Nothing
        );
    }

    #[test]
    fn legacy_connector_is_imported_first_with_default_type() {
        let item = TaskItem::new(ItemId(1), "a")
            .with_connector(Connector::new(ItemId(3), ConnectorType::StartStart))
            .with_legacy_connector(LegacyConnector {
                connect_to: ItemId(2),
                connector_type: None,
            });
        assert_eq!(
            item.connectors.as_slice(),
            &[
                Connector::new(ItemId(2), ConnectorType::FinishStart),
                Connector::new(ItemId(3), ConnectorType::StartStart),
            ]
        );
    }

    #[test]
    fn connector_types_and_progress_parse() {
        assert_eq!("finish-finish".parse(), Ok(ConnectorType::FinishFinish));
        assert_eq!("StartFinish".parse(), Ok(ConnectorType::StartFinish));
        assert!("sideways".parse::<ConnectorType>().is_err());
        assert_eq!(parse_progress("25%"), Some(0.25));
        assert_eq!(parse_progress("0.4"), Some(0.4));
        assert_eq!(parse_progress("150%"), Some(1.0));
        assert_eq!(parse_progress("soon"), None);
    }

    #[test]
    fn add_rejects_duplicates_and_unknown_parents() {
        let mut tree = project();
        assert_eq!(
            tree.add(None, TaskItem::new(ItemId(2), "dup")),
            Err(TreeError::DuplicateId(ItemId(2)))
        );
        assert_eq!(
            tree.add(Some(ItemId(77)), TaskItem::new(ItemId(5), "orphan")),
            Err(TreeError::UnknownItem(ItemId(77)))
        );
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn collapsed_items_hide_their_subtree() {
        let mut tree = project();
        let ids = |t: &TaskTree| t.expanded().map(|(i, _)| i.id.0).collect::<Vec<_>>();
        assert_eq!(ids(&tree), [1, 2, 3, 4]);
        tree.set_collapsed(ItemId(1), true).unwrap();
        assert_eq!(ids(&tree), [1, 4]);
        tree.set_all_collapsed(false);
        assert_eq!(ids(&tree), [1, 2, 3, 4]);
        let depths = tree.iter().map(|(_, d)| d).collect::<Vec<_>>();
        assert_eq!(depths, [0, 1, 1, 0]);
    }

    #[test]
    fn batched_writes_notify_once() {
        let mut tree = project();
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        tree.invalidation_mut()
            .add_listener(move |signals| {
                assert!(signals.contains(Signal::DataChanged), "{signals:?}");
                seen.set(seen.get() + 1);
            });
        let before = tree.revision();
        tree.batch(|tree| {
            tree.update(ItemId(2), |item| item.actual_start = Some(150.0)).unwrap();
            tree.update(ItemId(2), |item| item.actual_end = Some(250.0)).unwrap();
        });
        assert_eq!(calls.get(), 1);
        assert_eq!(tree.revision(), before + 2);
        assert_eq!(tree.get(ItemId(2)).unwrap().actual_end, Some(250.0));
    }
}
