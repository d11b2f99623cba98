// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-state tracking and signal dispatch.
//!
//! Every visual component owns one [`Invalidation`]. Setters call [`Invalidation::invalidate`]
//! with the states their change makes stale and the signals listeners should receive; `draw()`
//! walks the states it supports in a fixed order and clears each one with
//! [`Invalidation::mark_consistent`] once the work is done.
//!
//! Signal dispatch can be suspended. While suspended, signals accumulate and a matching
//! [`Invalidation::resume`] flushes them as one consolidated notification, which lets a caller
//! write several fields of one item without listeners observing the intermediate states.

use alloc::boxed::Box;
use core::fmt;

use smallvec::SmallVec;

use crate::flags::{ConsistencyState, Signals, States};

type Listener = Box<dyn FnMut(Signals)>;

/// Dirty-state bookkeeping for one component.
pub struct Invalidation {
    supported_states: States,
    supported_signals: Signals,
    consistency: States,
    in_progress: States,
    reentrant: States,
    suspension_level: u32,
    suspended: Option<Signals>,
    listeners: SmallVec<[Listener; 2]>,
}

impl fmt::Debug for Invalidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invalidation")
            .field("supported_states", &self.supported_states)
            .field("supported_signals", &self.supported_signals)
            .field("consistency", &self.consistency)
            .field("in_progress", &self.in_progress)
            .field("reentrant", &self.reentrant)
            .field("suspension_level", &self.suspension_level)
            .field("suspended", &self.suspended)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Invalidation {
    /// Creates a tracker for the given supported states and signals.
    ///
    /// Every supported state starts dirty: a fresh component has drawn nothing yet.
    pub fn new(supported_states: States, supported_signals: Signals) -> Self {
        Self {
            supported_states,
            supported_signals,
            consistency: supported_states,
            in_progress: States::empty(),
            reentrant: States::empty(),
            suspension_level: 0,
            suspended: None,
            listeners: SmallVec::new(),
        }
    }

    /// Extends the supported states/signals (used by components layered on a shared base).
    ///
    /// Newly supported states start dirty.
    pub fn extend_supported(&mut self, states: States, signals: Signals) {
        let added = states.difference(self.supported_states);
        self.supported_states |= states;
        self.supported_signals |= signals;
        self.consistency |= added;
    }

    /// States this component knows how to handle.
    pub fn supported_states(&self) -> States {
        self.supported_states
    }

    /// Signals this component may emit.
    pub fn supported_signals(&self) -> Signals {
        self.supported_signals
    }

    /// Current dirty states.
    pub fn dirty(&self) -> States {
        self.consistency
    }

    /// Marks `states` dirty and dispatches `signals` if anything changed.
    ///
    /// Unsupported states are ignored. Returns the states that actually became dirty.
    ///
    /// A state that is being processed by the current pass (see [`Self::begin`]) is remembered
    /// as re-invalidated, so the matching [`Self::mark_consistent`] leaves it dirty.
    pub fn invalidate(&mut self, states: impl Into<States>, signals: impl Into<Signals>) -> States {
        let states = states.into().intersection(self.supported_states);
        let effective = states.difference(self.consistency);
        self.consistency |= effective;

        let reentrant = states
            .intersection(self.in_progress)
            .difference(self.reentrant);
        self.reentrant |= reentrant;

        if !effective.is_empty() || !reentrant.is_empty() {
            self.dispatch_signal(signals);
        }
        effective
    }

    /// Clears `states`, except those re-invalidated while they were being processed.
    pub fn mark_consistent(&mut self, states: impl Into<States>) {
        let states = states.into();
        let keep = states.intersection(self.reentrant);
        self.consistency = self.consistency.difference(states.difference(keep));
        self.reentrant = self.reentrant.difference(states);
        self.in_progress = self.in_progress.difference(states);
    }

    /// Returns `true` if no state is dirty.
    pub fn is_consistent(&self) -> bool {
        self.consistency.is_empty()
    }

    /// Returns `true` if no state other than those in `allow` is dirty.
    pub fn is_consistent_except(&self, allow: impl Into<States>) -> bool {
        self.consistency.difference(allow.into()).is_empty()
    }

    /// Returns `true` if any of `states` is dirty.
    pub fn has_invalidation_state(&self, states: impl Into<States>) -> bool {
        self.consistency.intersects(states.into())
    }

    /// Starts a draw pass, forgetting in-progress bookkeeping left by an aborted pass.
    pub fn begin_pass(&mut self) {
        self.in_progress = States::empty();
        self.reentrant = States::empty();
    }

    /// Tests `state` at the start of its work and records it as in progress.
    pub fn begin(&mut self, state: ConsistencyState) -> bool {
        if self.consistency.contains(state) {
            self.in_progress.insert(state);
            true
        } else {
            false
        }
    }

    /// Sends `signals` to listeners, or stores them while dispatch is suspended.
    ///
    /// Unsupported signals are dropped.
    pub fn dispatch_signal(&mut self, signals: impl Into<Signals>) {
        let signals = signals.into().intersection(self.supported_signals);
        if signals.is_empty() {
            return;
        }
        if let Some(pending) = &mut self.suspended {
            *pending |= signals;
            return;
        }
        tracing::trace!(?signals, "dispatching signals");
        for listener in &mut self.listeners {
            listener(signals);
        }
    }

    /// Suspends dispatch. Calls nest.
    pub fn suspend(&mut self) {
        self.suspension_level += 1;
        self.suspended.get_or_insert_with(Signals::empty);
    }

    /// Leaves one suspension level.
    ///
    /// When the outermost level is left, accumulated signals are dispatched once if `dispatch`
    /// is `true` and discarded otherwise.
    pub fn resume(&mut self, dispatch: bool) {
        if self.suspended.is_none() {
            return;
        }
        self.suspension_level = self.suspension_level.saturating_sub(1);
        if self.suspension_level > 0 {
            return;
        }
        let pending = self.suspended.take().unwrap_or_default();
        if dispatch && !pending.is_empty() {
            self.dispatch_signal(pending);
        }
    }

    /// Returns `true` while dispatch is suspended.
    pub fn is_suspended(&self) -> bool {
        self.suspended.is_some()
    }

    /// Runs `f` with dispatch suspended, then resumes with dispatch.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.suspend();
        let out = f(self);
        self.resume(true);
        out
    }

    /// Registers a listener that receives every dispatched signal set.
    pub fn add_listener(&mut self, listener: impl FnMut(Signals) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Removes all listeners.
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;
    use crate::flags::{ConsistencyState as S, Signal};

    fn tracker() -> (Invalidation, Rc<RefCell<Vec<Signals>>>) {
        let mut inv = Invalidation::new(
            S::Bounds | S::Appearance | S::ZIndex,
            Signal::NeedsRedraw | Signal::BoundsChanged,
        );
        inv.mark_consistent(States::all());
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        inv.add_listener(move |s| sink.borrow_mut().push(s));
        (inv, log)
    }

    #[test]
    fn invalidate_reports_only_newly_dirty_supported_states() {
        let (mut inv, log) = tracker();
        let effective = inv.invalidate(S::Bounds | S::Enabled, Signal::NeedsRedraw);
        assert_eq!(effective, States::from(S::Bounds));

        // Already dirty: nothing effective, no dispatch.
        let effective = inv.invalidate(S::Bounds, Signal::NeedsRedraw);
        assert!(effective.is_empty());
        assert_eq!(log.borrow().len(), 1, "second invalidate must not dispatch");
    }

    #[test]
    fn unsupported_signals_are_dropped() {
        let (mut inv, log) = tracker();
        inv.invalidate(S::Appearance, Signal::DataChanged | Signal::NeedsRedraw);
        assert_eq!(log.borrow()[0], Signals::from(Signal::NeedsRedraw));
    }

    #[test]
    fn suspended_signals_flush_once_on_outermost_resume() {
        let (mut inv, log) = tracker();
        inv.suspend();
        inv.suspend();
        inv.invalidate(S::Bounds, Signal::BoundsChanged);
        inv.invalidate(S::Appearance, Signal::NeedsRedraw);
        inv.resume(true);
        assert!(log.borrow().is_empty(), "inner resume must not dispatch");
        inv.resume(true);
        assert_eq!(
            &*log.borrow(),
            &[Signal::BoundsChanged | Signal::NeedsRedraw]
        );
        assert!(!inv.is_suspended());
    }

    #[test]
    fn resume_without_dispatch_discards() {
        let (mut inv, log) = tracker();
        inv.batch(|_| ());
        inv.suspend();
        inv.invalidate(S::Bounds, Signal::BoundsChanged);
        inv.resume(false);
        assert!(log.borrow().is_empty(), "discarded resume must not dispatch");
        assert!(inv.has_invalidation_state(S::Bounds));
    }

    #[test]
    fn reinvalidation_during_processing_survives_mark_consistent() {
        let (mut inv, log) = tracker();
        inv.invalidate(S::Bounds, Signal::NeedsRedraw);
        inv.begin_pass();
        assert!(inv.begin(S::Bounds));
        // Something invalidates bounds again while the bounds work runs.
        inv.invalidate(S::Bounds, Signal::NeedsRedraw);
        inv.mark_consistent(S::Bounds);
        assert!(inv.has_invalidation_state(S::Bounds));
        assert_eq!(log.borrow().len(), 2, "re-entrant invalidate must notify");

        // The next pass clears it for good.
        inv.begin_pass();
        assert!(inv.begin(S::Bounds));
        inv.mark_consistent(S::Bounds);
        assert!(inv.is_consistent());
    }

    #[test]
    fn invalidating_a_pending_state_is_not_reentrant() {
        let (mut inv, _log) = tracker();
        inv.invalidate(S::Bounds | S::Appearance, Signal::NeedsRedraw);
        inv.begin_pass();
        assert!(inv.begin(S::Bounds));
        // Bounds work dirties appearance, which has not started yet.
        inv.invalidate(S::Appearance, Signal::NeedsRedraw);
        inv.mark_consistent(S::Bounds);
        assert!(inv.begin(S::Appearance));
        inv.mark_consistent(S::Appearance);
        assert!(inv.is_consistent());
    }

    #[test]
    fn new_trackers_start_fully_dirty() {
        let inv = Invalidation::new(S::Bounds | S::ZIndex, Signals::empty());
        assert!(inv.has_invalidation_state(S::ZIndex));
        assert!(inv.is_consistent_except(S::Bounds | S::ZIndex));
    }
}
