// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart components built on `chartwell_core`.
//!
//! Each component owns a [`VisualBase`](chartwell_core::VisualBase), records what changed
//! through typed consistency states and regenerates its stable-identity marks in `draw()`:
//! - [`RadialGrid`]: radar/polar grid lines and interlace bands.
//! - [`gantt::Timeline`]: a gantt timeline with bars, connectors and live editing.
//! - [`pie::Pie`]: pie and donut charts, flat or extruded, with inside or outside labels.
//!
//! Scales map data into ratios of a visible range, [`theme`] holds immutable defaults that are
//! combined with user overrides by [`merge`], and [`z_order`] fixes the paint order of the
//! parts of every component.
//!
//! Text shaping is out of scope; labels are placed with a [`TextMeasurer`] estimate.

#![no_std]

extern crate alloc;

mod datetime_scale;
#[cfg(not(feature = "std"))]
mod float;
pub mod gantt;
mod measure;
mod path_mark;
pub mod pie;
mod radial_grid;
mod rect_mark;
mod scale;
#[cfg(test)]
mod scenario_tests;
mod sector_mark;
mod text_mark;
pub mod theme;
mod time;
pub mod z_order;

pub use datetime_scale::{DEFAULT_GAP, DEFAULT_ZOOM_FACTOR, DateRange, DateTimeScale, RangeAnchor};
pub use measure::{FixedTextMeasurer, HeuristicTextMeasurer, TextMeasurer};
pub use path_mark::{PathMarkSpec, StrokeStyle};
pub use radial_grid::{EVEN_FILL_MARK, LINES_MARK, ODD_FILL_MARK, RadialGrid};
pub use rect_mark::RectMarkSpec;
pub use scale::{GridScale, LinearScale, OrdinalScale, RatioScale, nice_ticks};
pub use sector_mark::SectorMarkSpec;
pub use text_mark::TextMarkSpec;
pub use theme::{
    Fill, GridLayout, Pie3dTheme, PieTheme, RadarGridTheme, Size, Theme, ThemeError,
    ThemeOverrides, TimelineTheme, merge,
};
pub use time::{Interval, MS_IN_DAY, MS_IN_MINUTE, TickSpan, utc_midnight};
