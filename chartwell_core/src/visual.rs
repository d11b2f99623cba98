// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared lifecycle state of visual components.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::error::DrawError;
use crate::flags::{ConsistencyState, Signal, Signals, States};
use crate::invalidation::Invalidation;
use crate::mark::Mark;

/// Identifies the layer a component draws into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContainerId(pub u32);

/// Access to a component's dirty-state tracker.
pub trait Invalidatable {
    /// The tracker.
    fn invalidation(&self) -> &Invalidation;

    /// The tracker, mutably.
    fn invalidation_mut(&mut self) -> &mut Invalidation;

    /// See [`Invalidation::invalidate`].
    fn invalidate(&mut self, states: impl Into<States>, signals: impl Into<Signals>) -> States
    where
        Self: Sized,
    {
        self.invalidation_mut().invalidate(states, signals)
    }

    /// See [`Invalidation::is_consistent`].
    fn is_consistent(&self) -> bool {
        self.invalidation().is_consistent()
    }

    /// See [`Invalidation::suspend`].
    fn suspend_signals_dispatching(&mut self) {
        self.invalidation_mut().suspend();
    }

    /// See [`Invalidation::resume`].
    fn resume_signals_dispatching(&mut self, dispatch: bool) {
        self.invalidation_mut().resume(dispatch);
    }
}

/// Something that turns its configuration into marks.
pub trait Drawable: Invalidatable {
    /// Recomputes dirty subsystems.
    ///
    /// Returns `Ok(false)` when the pass was skipped and `Ok(true)` when work was done. An `Err`
    /// leaves every dirty state in place.
    fn draw(&mut self) -> Result<bool, DrawError>;

    /// The marks produced by the last successful pass.
    fn marks(&self) -> &[Mark];
}

/// Enabled flag, paint order, container and bounds shared by every component.
#[derive(Debug)]
pub struct VisualBase {
    invalidation: Invalidation,
    enabled: bool,
    z_index: i32,
    container: Option<ContainerId>,
    parent_bounds: Option<Rect>,
}

impl VisualBase {
    /// States every component supports.
    pub fn base_states() -> States {
        ConsistencyState::Enabled
            | ConsistencyState::Container
            | ConsistencyState::Bounds
            | ConsistencyState::ZIndex
    }

    /// Creates a base supporting [`Self::base_states`] plus `states`.
    pub fn new(states: States, signals: Signals) -> Self {
        let base_signals = Signal::NeedsRedraw
            | Signal::BoundsChanged
            | Signal::EnabledStateChanged
            | Signal::ZIndexStateChanged;
        Self {
            invalidation: Invalidation::new(Self::base_states() | states, base_signals | signals),
            enabled: true,
            z_index: 0,
            container: None,
            parent_bounds: None,
        }
    }

    /// Whether the component draws at all.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the component.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.invalidation.invalidate(
                ConsistencyState::Enabled,
                Signal::EnabledStateChanged | Signal::NeedsRedraw,
            );
        }
    }

    /// Paint order of the component's marks.
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Sets the paint order.
    pub fn set_z_index(&mut self, z_index: i32) {
        if self.z_index != z_index {
            self.z_index = z_index;
            self.invalidation.invalidate(
                ConsistencyState::ZIndex,
                Signal::ZIndexStateChanged | Signal::NeedsRedraw,
            );
        }
    }

    /// The attached container.
    pub fn container(&self) -> Option<ContainerId> {
        self.container
    }

    /// Attaches (or detaches) the component.
    pub fn set_container(&mut self, container: Option<ContainerId>) {
        if self.container != container {
            self.container = container;
            self.invalidation
                .invalidate(ConsistencyState::Container, Signal::NeedsRedraw);
        }
    }

    /// Bounds the component lays itself out in.
    pub fn parent_bounds(&self) -> Option<Rect> {
        self.parent_bounds
    }

    /// Sets the layout bounds.
    pub fn set_parent_bounds(&mut self, bounds: Option<Rect>) {
        if self.parent_bounds != bounds {
            self.parent_bounds = bounds;
            self.invalidation.invalidate(
                ConsistencyState::Bounds,
                Signal::BoundsChanged | Signal::NeedsRedraw,
            );
        }
    }

    /// Top-level gate of every `draw()`.
    ///
    /// Disabled components drop their output and re-attach once enabled again. A missing
    /// container is an error; missing or empty bounds skip the pass.
    pub fn check_drawing_needed(&mut self, output: &mut Vec<Mark>) -> Result<bool, DrawError> {
        if self.invalidation.is_consistent() {
            return Ok(false);
        }
        if !self.enabled {
            if self
                .invalidation
                .has_invalidation_state(ConsistencyState::Enabled)
            {
                output.clear();
                self.invalidation
                    .mark_consistent(ConsistencyState::Enabled);
                self.invalidation
                    .invalidate(ConsistencyState::Container, Signals::empty());
            }
            return Ok(false);
        }
        if self.container.is_none() {
            output.clear();
            self.invalidation
                .mark_consistent(ConsistencyState::Enabled);
            tracing::warn!("container is not set, skipping draw");
            return Err(DrawError::ContainerNotSet);
        }
        match self.parent_bounds {
            Some(b) if b.width() > 0.0 && b.height() > 0.0 => {}
            _ => return Ok(false),
        }
        self.invalidation
            .mark_consistent(ConsistencyState::Enabled);
        self.invalidation.begin_pass();
        Ok(true)
    }
}

impl Invalidatable for VisualBase {
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

    use alloc::vec;

    use super::*;
    use crate::mark::MarkId;

    fn base() -> VisualBase {
        let mut base = VisualBase::new(ConsistencyState::Appearance.into(), Signals::empty());
        base.set_container(Some(ContainerId(1)));
        base.set_parent_bounds(Some(Rect::new(0.0, 0.0, 100.0, 50.0)));
        base
    }

    #[test]
    fn consistent_components_skip_drawing() {
        let mut b = base();
        let mut out = vec![];
        assert_eq!(b.check_drawing_needed(&mut out), Ok(true));
        b.invalidation_mut().mark_consistent(States::all());
        assert_eq!(b.check_drawing_needed(&mut out), Ok(false));
    }

    #[test]
    fn disabling_clears_output_and_dirties_container() {
        let mut b = base();
        b.invalidation_mut().mark_consistent(States::all());
        b.set_enabled(false);
        let mut out = vec![Mark::builder(MarkId::from_raw(1)).rect().build()];
        assert_eq!(b.check_drawing_needed(&mut out), Ok(false));
        assert!(out.is_empty(), "disabled output must be dropped");
        assert!(
            b.invalidation()
                .has_invalidation_state(ConsistencyState::Container),
            "re-enabling must re-attach"
        );
    }

    #[test]
    fn missing_container_is_reported() {
        let mut b = base();
        b.set_container(None);
        assert_eq!(
            b.check_drawing_needed(&mut vec![]),
            Err(DrawError::ContainerNotSet)
        );
    }

    #[test]
    fn empty_bounds_skip_without_error() {
        let mut b = base();
        b.set_parent_bounds(Some(Rect::new(0.0, 0.0, 0.0, 10.0)));
        assert_eq!(b.check_drawing_needed(&mut vec![]), Ok(false));
    }

    #[test]
    fn setters_only_invalidate_on_change() {
        let mut b = base();
        b.invalidation_mut().mark_consistent(States::all());
        b.set_z_index(0);
        assert!(b.is_consistent(), "same z-index is a no-op");
        b.set_z_index(3);
        assert!(
            b.invalidation()
                .has_invalidation_state(ConsistencyState::ZIndex),
            "z-index change must dirty ZIndex"
        );
    }
}
