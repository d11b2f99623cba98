// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental mark diffing.

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;

use crate::mark::{Mark, MarkId, MarkKind, MarkPayload};

/// One change between two consecutive mark sets.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkDiff {
    /// A mark appeared.
    Enter {
        /// Mark id.
        id: MarkId,
        /// Primitive kind.
        kind: MarkKind,
        /// Paint order.
        z_index: i32,
        /// Payload.
        new: Box<MarkPayload>,
        /// Payload bounds, if known.
        bounds: Option<Rect>,
    },
    /// A mark changed payload or paint order.
    Update {
        /// Mark id.
        id: MarkId,
        /// Primitive kind after the change.
        kind: MarkKind,
        /// Paint order after the change.
        new_z_index: i32,
        /// Payload after the change.
        new: Box<MarkPayload>,
        /// Bounds before the change.
        old_bounds: Option<Rect>,
        /// Bounds after the change.
        new_bounds: Option<Rect>,
    },
    /// A mark disappeared.
    Exit {
        /// Mark id.
        id: MarkId,
        /// Primitive kind.
        kind: MarkKind,
        /// Bounds of the removed payload.
        bounds: Option<Rect>,
    },
}

impl MarkDiff {
    /// The id this diff applies to.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }
}

/// Retained mark set of the previous tick.
#[derive(Debug, Default)]
pub struct Scene {
    marks: HashMap<MarkId, Mark>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of retained marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` if no mark is retained.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Looks up a retained mark.
    pub fn get(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(&id)
    }

    /// Replaces the retained set with `marks` and returns what changed.
    ///
    /// Enters and updates come first in id order, then exits in id order. If an id appears more
    /// than once, the last mark wins.
    pub fn tick(&mut self, marks: impl IntoIterator<Item = Mark>) -> Vec<MarkDiff> {
        let mut next: HashMap<MarkId, Mark> = HashMap::new();
        for mark in marks {
            if next.insert(mark.id, mark).is_some() {
                tracing::debug!("duplicate mark id in one tick, keeping the last");
            }
        }

        let mut ids: Vec<MarkId> = next.keys().copied().collect();
        ids.sort_unstable();

        let mut diffs = Vec::new();
        for id in ids {
            let Some(mark) = next.get(&id) else {
                continue;
            };
            match self.marks.get(&id) {
                None => diffs.push(MarkDiff::Enter {
                    id,
                    kind: mark.kind(),
                    z_index: mark.z_index,
                    new: Box::new(mark.payload.clone()),
                    bounds: mark.payload.bounds(),
                }),
                Some(old) if old != mark => diffs.push(MarkDiff::Update {
                    id,
                    kind: mark.kind(),
                    new_z_index: mark.z_index,
                    new: Box::new(mark.payload.clone()),
                    old_bounds: old.payload.bounds(),
                    new_bounds: mark.payload.bounds(),
                }),
                Some(_) => {}
            }
        }

        let mut exits: Vec<&Mark> = self
            .marks
            .values()
            .filter(|m| !next.contains_key(&m.id))
            .collect();
        exits.sort_unstable_by_key(|m| m.id);
        diffs.extend(exits.into_iter().map(|m| MarkDiff::Exit {
            id: m.id,
            kind: m.kind(),
            bounds: m.payload.bounds(),
        }));

        self.marks = next;
        diffs
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use peniko::color::palette::css;

    use super::*;

    fn rect(id: u64, x: f64) -> Mark {
        Mark::builder(MarkId::from_raw(id))
            .rect()
            .x_const(x)
            .w_const(10.0)
            .h_const(10.0)
            .fill_brush_const(css::STEEL_BLUE)
            .build()
    }

    #[test]
    fn unchanged_marks_produce_no_diffs() {
        let mut scene = Scene::new();
        assert_eq!(scene.tick(vec![rect(1, 0.0), rect(2, 5.0)]).len(), 2);
        assert!(scene.tick(vec![rect(2, 5.0), rect(1, 0.0)]).is_empty(), "order must not matter");
    }

    #[test]
    fn update_and_exit_are_ordered_by_id() {
        let mut scene = Scene::new();
        scene.tick(vec![rect(1, 0.0), rect(2, 0.0), rect(3, 0.0)]);
        let diffs = scene.tick(vec![rect(3, 1.0), rect(1, 0.0)]);
        let [
            MarkDiff::Update {
                id: updated,
                old_bounds,
                new_bounds,
                ..
            },
            MarkDiff::Exit { id: exited, .. },
        ] = &diffs[..]
        else {
            panic!("expected update then exit, got {diffs:?}");
        };
        assert_eq!(*updated, MarkId::from_raw(3));
        assert_eq!(*exited, MarkId::from_raw(2));
        assert_eq!(old_bounds.map(|b| b.x0), Some(0.0));
        assert_eq!(new_bounds.map(|b| b.x0), Some(1.0));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn z_index_change_is_an_update() {
        let mut scene = Scene::new();
        scene.tick(vec![rect(1, 0.0)]);
        let mut moved = rect(1, 0.0);
        moved.z_index = 5;
        let diffs = scene.tick(vec![moved]);
        let [MarkDiff::Update { new_z_index, .. }] = &diffs[..] else {
            panic!("expected a single update");
        };
        assert_eq!(*new_z_index, 5);
    }
}
