// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed bit-sets for consistency states and signals.
//!
//! Components track which of their subsystems are stale as a set of [`ConsistencyState`]s, and
//! notify listeners with a set of [`Signal`]s. Both are small `u32`-backed sets; the enum types
//! keep the two vocabularies from being mixed up.

use core::fmt;
use core::marker::PhantomData;
use core::ops::{BitOr, BitOrAssign};

/// A single flag that can live in a [`FlagSet`].
pub trait Flag: Copy + Eq + fmt::Debug + 'static {
    /// Every flag of this kind, in bit order.
    const ALL: &'static [Self];

    /// Returns the bit mask for this flag (exactly one bit set).
    fn bit(self) -> u32;
}

/// A set of flags of one kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagSet<F: Flag> {
    bits: u32,
    _marker: PhantomData<F>,
}

impl<F: Flag> FlagSet<F> {
    /// The empty set.
    pub const fn empty() -> Self {
        Self {
            bits: 0,
            _marker: PhantomData,
        }
    }

    /// The set containing every flag of this kind.
    pub fn all() -> Self {
        F::ALL.iter().copied().collect()
    }

    /// Builds a set from a raw mask, dropping bits that name no flag.
    pub fn from_bits_truncate(bits: u32) -> Self {
        Self {
            bits: bits & Self::all().bits,
            _marker: PhantomData,
        }
    }

    /// Returns the raw mask.
    pub const fn bits(self) -> u32 {
        self.bits
    }

    /// Returns `true` if no flag is set.
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns `true` if `flag` is in the set.
    pub fn contains(self, flag: F) -> bool {
        self.bits & flag.bit() != 0
    }

    /// Returns `true` if the two sets share at least one flag.
    pub const fn intersects(self, other: Self) -> bool {
        self.bits & other.bits != 0
    }

    /// Adds `flag`.
    pub fn insert(&mut self, flag: F) {
        self.bits |= flag.bit();
    }

    /// Removes `flag`.
    pub fn remove(&mut self, flag: F) {
        self.bits &= !flag.bit();
    }

    /// Set union.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
            _marker: PhantomData,
        }
    }

    /// Set intersection.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
            _marker: PhantomData,
        }
    }

    /// Flags in `self` that are not in `other`.
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self {
            bits: self.bits & !other.bits,
            _marker: PhantomData,
        }
    }

    /// Iterates the flags in bit order.
    pub fn iter(self) -> impl Iterator<Item = F> {
        F::ALL.iter().copied().filter(move |f| self.contains(*f))
    }
}

impl<F: Flag> Default for FlagSet<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: Flag> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<F: Flag> From<F> for FlagSet<F> {
    fn from(flag: F) -> Self {
        Self {
            bits: flag.bit(),
            _marker: PhantomData,
        }
    }
}

impl<F: Flag> FromIterator<F> for FlagSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut out = Self::empty();
        for f in iter {
            out.insert(f);
        }
        out
    }
}

impl<F: Flag> BitOr for FlagSet<F> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl<F: Flag> BitOr<F> for FlagSet<F> {
    type Output = Self;

    fn bitor(self, rhs: F) -> Self {
        self.union(rhs.into())
    }
}

impl<F: Flag> BitOrAssign for FlagSet<F> {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl<F: Flag> BitOrAssign<F> for FlagSet<F> {
    fn bitor_assign(&mut self, rhs: F) {
        self.insert(rhs);
    }
}

/// A named subsystem whose cached output may be stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConsistencyState {
    /// Enabled/disabled toggling has not been applied yet.
    Enabled,
    /// The output has not been attached to its container.
    Container,
    /// Geometry depends on bounds that changed.
    Bounds,
    /// Paint order changed.
    ZIndex,
    /// Fills/strokes changed.
    Appearance,
    /// Grid line and interlace positions.
    GridsPosition,
    /// Gantt task data changed.
    GanttData,
    /// Gantt bar/connector positions.
    GanttPosition,
    /// Pie statistics need recomputation.
    PieData,
    /// Pie labels need placement.
    PieLabels,
}

impl Flag for ConsistencyState {
    const ALL: &'static [Self] = &[
        Self::Enabled,
        Self::Container,
        Self::Bounds,
        Self::ZIndex,
        Self::Appearance,
        Self::GridsPosition,
        Self::GanttData,
        Self::GanttPosition,
        Self::PieData,
        Self::PieLabels,
    ];

    fn bit(self) -> u32 {
        // Chart-specific states start at bit 12.
        match self {
            Self::Enabled => 1 << 0,
            Self::Container => 1 << 1,
            Self::Bounds => 1 << 2,
            Self::ZIndex => 1 << 3,
            Self::Appearance => 1 << 4,
            Self::GridsPosition => 1 << 12,
            Self::GanttData => 1 << 13,
            Self::GanttPosition => 1 << 14,
            Self::PieData => 1 << 15,
            Self::PieLabels => 1 << 16,
        }
    }
}

impl BitOr for ConsistencyState {
    type Output = States;

    fn bitor(self, rhs: Self) -> States {
        States::from(self) | rhs
    }
}

/// A notification sent to listeners describing what kind of change happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// The component must be drawn again.
    NeedsRedraw,
    /// Derived values (scale ranges, statistics) must be recalculated.
    NeedsRecalculation,
    /// The component's bounds changed.
    BoundsChanged,
    /// Underlying data changed.
    DataChanged,
    /// Per-row meta/cache data changed.
    MetaChanged,
    /// Enabled state toggled.
    EnabledStateChanged,
    /// Z-index changed.
    ZIndexStateChanged,
}

impl Flag for Signal {
    const ALL: &'static [Self] = &[
        Self::NeedsRedraw,
        Self::NeedsRecalculation,
        Self::BoundsChanged,
        Self::DataChanged,
        Self::MetaChanged,
        Self::EnabledStateChanged,
        Self::ZIndexStateChanged,
    ];

    fn bit(self) -> u32 {
        match self {
            Self::NeedsRedraw => 1 << 0,
            Self::NeedsRecalculation => 1 << 2,
            Self::BoundsChanged => 1 << 3,
            Self::DataChanged => 1 << 4,
            Self::MetaChanged => 1 << 5,
            Self::EnabledStateChanged => 1 << 15,
            Self::ZIndexStateChanged => 1 << 16,
        }
    }
}

impl BitOr for Signal {
    type Output = Signals;

    fn bitor(self, rhs: Self) -> Signals {
        Signals::from(self) | rhs
    }
}

/// A set of [`ConsistencyState`]s.
pub type States = FlagSet<ConsistencyState>;

/// A set of [`Signal`]s.
pub type Signals = FlagSet<Signal>;

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn or_builds_sets_and_iterates_in_bit_order() {
        let s = ConsistencyState::Appearance | ConsistencyState::Bounds | ConsistencyState::ZIndex;
        let got: Vec<_> = s.iter().collect();
        assert_eq!(
            got,
            [
                ConsistencyState::Bounds,
                ConsistencyState::ZIndex,
                ConsistencyState::Appearance
            ]
        );
        assert!(s.contains(ConsistencyState::Bounds));
        assert!(!s.contains(ConsistencyState::Enabled));
    }

    #[test]
    fn difference_and_truncation() {
        let a = Signal::NeedsRedraw | Signal::BoundsChanged;
        let b = Signals::from(Signal::BoundsChanged);
        assert_eq!(a.difference(b), Signals::from(Signal::NeedsRedraw));

        let t = Signals::from_bits_truncate(u32::MAX);
        assert_eq!(t, Signals::all());
        assert_eq!(Signals::from_bits_truncate(1 << 30), Signals::empty());
    }

    #[test]
    fn every_flag_owns_a_distinct_bit() {
        let states = ConsistencyState::ALL.iter().fold(0_u32, |acc, s| {
            assert_eq!(acc & s.bit(), 0, "{s:?} shares a bit");
            acc | s.bit()
        });
        assert_eq!(States::all().bits(), states);
        assert_eq!(States::all().iter().count(), 10);

        let signals = Signal::ALL.iter().fold(0_u32, |acc, s| {
            assert_eq!(acc & s.bit(), 0, "{s:?} shares a bit");
            acc | s.bit()
        });
        assert_eq!(Signals::all().bits(), signals);
        assert_eq!(Signals::all().iter().count(), 7);
    }

    #[test]
    fn chart_states_live_above_the_base_range() {
        for s in [
            ConsistencyState::GridsPosition,
            ConsistencyState::GanttData,
            ConsistencyState::PieLabels,
        ] {
            assert!(s.bit() >= 1 << 12, "{s:?} overlaps the base states");
        }
    }
}
