// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie and donut charts: slice sweeps, explode, 3D faces, label placement and the appear
//! animation.

mod animation;
mod chart;
mod data;
mod labels;
mod three_d;

pub use animation::{AnimationFrame, PieAnimation, SLICE_DURATION_RATIO};
pub use chart::{CONNECTOR_MARKS, LABEL_MARKS, Pie, PieLabel, PieSlice};
pub use data::{
    DEFAULT_START_ANGLE, PiePoint, SliceAngles, Statistics, TOO_MANY_POINTS, is_missing,
    slice_angles,
};
pub use labels::{
    LabelFrame, LabelRequest, MAX_DOMAIN_ITERATIONS, OUTSIDE_LABELS_CONNECTOR_SIZE, OutsideLabel,
    OutsideLabels, fits_in_slice, inside_label_position, place_outside_labels,
};
pub use three_d::{
    Extrusion, Face, FaceKind, back_sides, front_sides, has_back_side, has_front_side, quadrant,
    slice_faces, sort_faces,
};
