// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental chart runtime core.
//!
//! Every visual component in `chartwell_charts` is built from the pieces in this crate:
//! - **Invalidation**: typed sets of dirty [`ConsistencyState`]s and outgoing [`Signal`]s, with
//!   suspendable dispatch so multi-field writes notify listeners once.
//! - **Lifecycle**: [`VisualBase`] holds the enabled/z-index/container/bounds settings and the
//!   `draw()` gate shared by all components.
//! - **Marks**: stable-identity primitives ([`Mark`]) and a [`Scene`] that turns consecutive mark
//!   sets into enter/update/exit diffs for a rendering backend.
//! - **Geometry**: angle and intersection helpers.
//!
//! Nothing here rasterizes; a backend consumes [`MarkDiff`]s.

#![no_std]

extern crate alloc;

mod error;
mod flags;
#[cfg(not(feature = "std"))]
mod float;
pub mod geometry;
mod invalidation;
mod mark;
mod scene;
mod visual;

pub use error::DrawError;
pub use flags::{ConsistencyState, Flag, FlagSet, Signal, Signals, States};
pub use invalidation::Invalidation;
pub use mark::{
    Mark, MarkBuilder, MarkId, MarkKind, MarkPayload, PathMarkBuilder, PathPayload,
    RectMarkBuilder, RectPayload, TextAnchor, TextBaseline, TextMarkBuilder, TextPayload,
};
pub use scene::{MarkDiff, Scene};
pub use visual::{ContainerId, Drawable, Invalidatable, VisualBase};
