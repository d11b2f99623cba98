// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint-order conventions for chart-generated marks.
//!
//! Components add these offsets to their own `z_index`, so moving a component up or down keeps
//! the relative order of its parts. Renderers sort by `(z_index, MarkId)`.

/// Radial grid interlace bands.
pub const GRID_INTERLACE: i32 = -60;
/// Radial grid lines.
pub const GRID_LINES: i32 = -50;

/// Gantt baseline bars.
pub const GANTT_BASELINES: i32 = 0;
/// Gantt task bars, parent brackets, milestones and periods.
pub const GANTT_BARS: i32 = 1;
/// Gantt progress overlays.
pub const GANTT_PROGRESS: i32 = 2;
/// Gantt connector lines and arrowheads.
pub const GANTT_CONNECTORS: i32 = 3;
/// Gantt edit controls (preview bar, thumbs, connector handles).
pub const GANTT_EDIT: i32 = 10;

/// Connectors of 3D labels anchored on the back half of the pie, painted under the faces.
pub const PIE_HIDDEN_CONNECTORS: i32 = -10;
/// Pie slices and 3D faces (faces are ordered by their mark id).
pub const PIE_SLICES: i32 = 0;
/// Outside-label connectors.
pub const PIE_CONNECTORS: i32 = 30;
/// Pie labels.
pub const PIE_LABELS: i32 = 40;
