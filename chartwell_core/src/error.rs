// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Non-fatal draw errors.

use thiserror::Error;

/// Why a component skipped its draw pass.
///
/// A draw that returns an error clears no dirty state: once the configuration is fixed, the next
/// `draw()` redoes the work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DrawError {
    /// The component has no container to draw into.
    #[error("container is not set")]
    ContainerNotSet,
    /// A required scale is missing.
    #[error("{role} scale is not set")]
    ScaleNotSet {
        /// Which scale (e.g. `"x"`, `"y"`).
        role: &'static str,
    },
}
