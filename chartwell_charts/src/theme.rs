// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Default option tables and override merging.
//!
//! A [`Theme`] is an immutable value. Callers describe the options they want to change in a
//! [`ThemeOverrides`] (every field optional) and combine both with [`merge`]; the defaults are
//! never mutated. With the `serde` feature both types (de)serialize, sizes as numbers (pixels)
//! or `"45%"` strings and colors as `"#rrggbb"` / `"#rrggbbaa"` / `"none"` strings.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use peniko::{Brush, Color};
use thiserror::Error;

/// Why a theme value could not be normalized.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ThemeError {
    /// Not a number or a `"N%"` string.
    #[error("invalid size {0:?}")]
    InvalidSize(String),
    /// Not a `"N%"` string.
    #[error("invalid percent {0:?}")]
    InvalidPercent(String),
    /// Not a `#rrggbb`, `#rrggbbaa` or `none` color.
    #[error("invalid color {0:?}")]
    InvalidColor(String),
}

/// Parses `"12.5%"` into `12.5`.
pub fn parse_percent(text: &str) -> Result<f64, ThemeError> {
    let invalid = || ThemeError::InvalidPercent(text.into());
    let number = text.trim().strip_suffix('%').ok_or_else(invalid)?;
    let value = f64::from_str(number.trim()).map_err(|_| invalid())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// A length given in pixels or as a percentage of a reference length.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SizeRepr", into = "SizeRepr")
)]
pub enum Size {
    /// Absolute pixels.
    Pixels(f64),
    /// Percent of the reference length.
    Percent(f64),
}

impl Size {
    /// Resolves the size against `total`.
    pub fn normalize(self, total: f64) -> f64 {
        match self {
            Self::Pixels(px) => px,
            Self::Percent(p) => total * p / 100.0,
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::Pixels(0.0)
    }
}

impl FromStr for Size {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.ends_with('%') {
            return parse_percent(t)
                .map(Self::Percent)
                .map_err(|_| ThemeError::InvalidSize(s.into()));
        }
        match f64::from_str(t) {
            Ok(v) if v.is_finite() => Ok(Self::Pixels(v)),
            _ => Err(ThemeError::InvalidSize(s.into())),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}"),
            Self::Percent(p) => write!(f, "{p}%"),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum SizeRepr {
    Number(f64),
    Text(String),
}

#[cfg(feature = "serde")]
impl TryFrom<SizeRepr> for Size {
    type Error = ThemeError;

    fn try_from(repr: SizeRepr) -> Result<Self, Self::Error> {
        match repr {
            SizeRepr::Number(v) if v.is_finite() => Ok(Self::Pixels(v)),
            SizeRepr::Number(v) => Err(ThemeError::InvalidSize(alloc::format!("{v}"))),
            SizeRepr::Text(t) => t.parse(),
        }
    }
}

#[cfg(feature = "serde")]
impl From<Size> for SizeRepr {
    fn from(size: Size) -> Self {
        match size {
            Size::Pixels(px) => Self::Number(px),
            percent => Self::Text(alloc::format!("{percent}")),
        }
    }
}

/// A solid fill or stroke color, or nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum Fill {
    /// Not painted.
    #[default]
    None,
    /// Painted with a color.
    Solid(Color),
}

impl Fill {
    /// An opaque color from a `0xrrggbb` literal.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "each channel is masked to 8 bits"
    )]
    pub const fn rgb(hex: u32) -> Self {
        Self::Solid(Color::from_rgba8(
            ((hex >> 16) & 0xff) as u8,
            ((hex >> 8) & 0xff) as u8,
            (hex & 0xff) as u8,
            0xff,
        ))
    }

    /// Returns `true` for [`Fill::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The brush to paint with; transparent for [`Fill::None`].
    pub fn brush(&self) -> Brush {
        match self {
            Self::None => Brush::Solid(Color::TRANSPARENT),
            Self::Solid(c) => Brush::Solid(*c),
        }
    }
}

impl FromStr for Fill {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("none") {
            return Ok(Self::None);
        }
        let invalid = || ThemeError::InvalidColor(s.into());
        let hex = t.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::Solid(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 0xff))),
            8 => Ok(Self::Solid(Color::from_rgba8(
                byte(0)?,
                byte(2)?,
                byte(4)?,
                byte(6)?,
            ))),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Solid(c) => {
                let rgba = c.to_rgba8();
                write!(f, "#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)?;
                if rgba.a != 0xff {
                    write!(f, "{:02x}", rgba.a)?;
                }
                Ok(())
            }
        }
    }
}

impl TryFrom<String> for Fill {
    type Error = ThemeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Fill> for String {
    fn from(fill: Fill) -> Self {
        alloc::format!("{fill}")
    }
}

/// How the radial grid is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum GridLayout {
    /// Concentric rings, one per y tick.
    Circuit,
    /// Spokes, one per x tick.
    #[default]
    Radial,
}

/// Pie/donut defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct PieTheme {
    /// Outer radius, percent of the smaller bounds side.
    pub radius: Size,
    /// Donut hole radius, percent of the outer radius.
    pub inner_radius: Size,
    /// Start angle in degrees (0 is up).
    pub start_angle: f64,
    /// Explode offset, percent of the smaller bounds side.
    pub explode: Size,
    /// Outside label connector length, percent of the outer radius.
    pub connector_length: Size,
    /// Largest allowed connector deviation of an outside label (degrees).
    pub outside_labels_critical_angle: f64,
    /// Margin reserved around the pie for outside labels, percent of the smaller bounds side.
    pub outside_labels_space: Size,
    /// Radius of inside labels, percent of the slice ring.
    pub inside_labels_offset: Size,
    /// Whether labels are placed outside the pie.
    pub outside_labels: bool,
    /// Label font size.
    pub label_font_size: f64,
    /// Label color.
    pub label_fill: Fill,
    /// Connector stroke of outside labels.
    pub connector_stroke: Fill,
    /// Slice outline.
    pub slice_stroke: Fill,
    /// Slice colors, cycled by point index.
    pub palette: Vec<Fill>,
    /// Length of the appear animation in ms; 0 disables it.
    pub animation_duration: f64,
}

impl Default for PieTheme {
    fn default() -> Self {
        Self {
            radius: Size::Percent(45.0),
            inner_radius: Size::Pixels(0.0),
            start_angle: 0.0,
            explode: Size::Pixels(15.0),
            connector_length: Size::Pixels(20.0),
            outside_labels_critical_angle: 60.0,
            outside_labels_space: Size::Pixels(30.0),
            inside_labels_offset: Size::Percent(50.0),
            outside_labels: false,
            label_font_size: 13.0,
            label_fill: Fill::rgb(0x7c868e),
            connector_stroke: Fill::rgb(0xcecece),
            slice_stroke: Fill::rgb(0xffffff),
            palette: alloc::vec![
                Fill::rgb(0x64b5f6),
                Fill::rgb(0x1976d2),
                Fill::rgb(0xef6c00),
                Fill::rgb(0xffd54f),
                Fill::rgb(0x455a64),
                Fill::rgb(0x96a6a6),
                Fill::rgb(0xdd2c00),
                Fill::rgb(0x00838f),
                Fill::rgb(0x00bfa5),
                Fill::rgb(0xffa000),
            ],
            animation_duration: 1000.0,
        }
    }
}

/// Extra pie defaults applied in 3D mode.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Pie3dTheme {
    /// Explode offset in 3D mode.
    pub explode: Size,
    /// Connector length in 3D mode.
    pub connector_length: Size,
    /// Vertical squash of the pie ellipse.
    pub aspect: f64,
    /// Extrusion height as a share of the outer radius.
    pub thickness: f64,
}

impl Default for Pie3dTheme {
    fn default() -> Self {
        Self {
            explode: Size::Percent(5.0),
            connector_length: Size::Percent(15.0),
            aspect: 0.45,
            thickness: 0.2,
        }
    }
}

/// Gantt timeline defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct TimelineTheme {
    /// Height reserved above the rows.
    pub header_height: f64,
    /// Default row height.
    pub row_height: f64,
    /// Plain task fill.
    pub base_fill: Fill,
    /// Parent (summary) task fill.
    pub parent_fill: Fill,
    /// Milestone fill.
    pub milestone_fill: Fill,
    /// Progress overlay fill.
    pub progress_fill: Fill,
    /// Baseline bar fill.
    pub baseline_fill: Fill,
    /// Resource period fill.
    pub period_fill: Fill,
    /// Connector line and arrow color.
    pub connector_fill: Fill,
    /// Fill of the edit controls (thumbs, connector handles).
    pub edit_fill: Fill,
    /// Whether the actual bar is drawn above the baseline bar.
    pub baseline_above: bool,
    /// Stroke thickness used for pixel alignment.
    pub stroke_thickness: f64,
}

impl Default for TimelineTheme {
    fn default() -> Self {
        Self {
            header_height: 0.0,
            row_height: 20.0,
            base_fill: Fill::rgb(0x7ec1f5),
            parent_fill: Fill::rgb(0x455a64),
            milestone_fill: Fill::rgb(0xffa000),
            progress_fill: Fill::rgb(0x1976d2),
            baseline_fill: Fill::rgb(0xd5ebfc),
            period_fill: Fill::rgb(0x7ec1f5),
            connector_fill: Fill::rgb(0x545f69),
            edit_fill: Fill::rgb(0xbfbfbf),
            baseline_above: false,
            stroke_thickness: 1.0,
        }
    }
}

/// Radar/polar grid defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RadarGridTheme {
    /// Rings or spokes.
    pub layout: GridLayout,
    /// Inner radius, percent of the outer radius.
    pub inner_radius: Size,
    /// Start angle in degrees (0 is up).
    pub start_angle: f64,
    /// Whether the closing line is drawn.
    pub draw_last_line: bool,
    /// Line color.
    pub stroke: Fill,
    /// Line thickness.
    pub stroke_thickness: f64,
    /// Fill of even interlace bands.
    pub even_fill: Fill,
    /// Fill of odd interlace bands.
    pub odd_fill: Fill,
}

impl Default for RadarGridTheme {
    fn default() -> Self {
        Self {
            layout: GridLayout::Radial,
            inner_radius: Size::Pixels(0.0),
            start_angle: 0.0,
            draw_last_line: true,
            stroke: Fill::rgb(0xcecece),
            stroke_thickness: 1.0,
            even_fill: Fill::None,
            odd_fill: Fill::rgb(0xf5f5f5),
        }
    }
}

/// Every default table.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Theme {
    /// Pie/donut.
    pub pie: PieTheme,
    /// Pie 3D additions.
    pub pie3d: Pie3dTheme,
    /// Gantt timeline.
    pub timeline: TimelineTheme,
    /// Radar grid.
    pub radar_grid: RadarGridTheme,
}

macro_rules! overrides {
    (
        $(#[$meta:meta])*
        $name:ident for $target:ident { $($field:ident: $ty:ty,)* }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
        pub struct $name {
            $(
                #[allow(missing_docs, reason = "mirrors the documented default field")]
                pub $field: Option<$ty>,
            )*
        }

        impl $target {
            /// Returns a copy of `self` with every set field of `overrides` applied.
            #[must_use]
            pub fn merge(&self, overrides: &$name) -> Self {
                let mut out = self.clone();
                $(
                    if let Some(v) = &overrides.$field {
                        out.$field = v.clone();
                    }
                )*
                out
            }
        }
    };
}

overrides! {
    /// Optional replacements for [`PieTheme`] fields.
    PieOverrides for PieTheme {
        radius: Size,
        inner_radius: Size,
        start_angle: f64,
        explode: Size,
        connector_length: Size,
        outside_labels_critical_angle: f64,
        outside_labels_space: Size,
        inside_labels_offset: Size,
        outside_labels: bool,
        label_font_size: f64,
        label_fill: Fill,
        connector_stroke: Fill,
        slice_stroke: Fill,
        palette: Vec<Fill>,
        animation_duration: f64,
    }
}

overrides! {
    /// Optional replacements for [`Pie3dTheme`] fields.
    Pie3dOverrides for Pie3dTheme {
        explode: Size,
        connector_length: Size,
        aspect: f64,
        thickness: f64,
    }
}

overrides! {
    /// Optional replacements for [`TimelineTheme`] fields.
    TimelineOverrides for TimelineTheme {
        header_height: f64,
        row_height: f64,
        base_fill: Fill,
        parent_fill: Fill,
        milestone_fill: Fill,
        progress_fill: Fill,
        baseline_fill: Fill,
        period_fill: Fill,
        connector_fill: Fill,
        edit_fill: Fill,
        baseline_above: bool,
        stroke_thickness: f64,
    }
}

overrides! {
    /// Optional replacements for [`RadarGridTheme`] fields.
    RadarGridOverrides for RadarGridTheme {
        layout: GridLayout,
        inner_radius: Size,
        start_angle: f64,
        draw_last_line: bool,
        stroke: Fill,
        stroke_thickness: f64,
        even_fill: Fill,
        odd_fill: Fill,
    }
}

/// Partial theme: only the fields to change.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ThemeOverrides {
    /// Pie/donut.
    pub pie: PieOverrides,
    /// Pie 3D additions.
    pub pie3d: Pie3dOverrides,
    /// Gantt timeline.
    pub timeline: TimelineOverrides,
    /// Radar grid.
    pub radar_grid: RadarGridOverrides,
}

/// Applies `overrides` on top of `defaults`.
pub fn merge(defaults: &Theme, overrides: &ThemeOverrides) -> Theme {
    Theme {
        pie: defaults.pie.merge(&overrides.pie),
        pie3d: defaults.pie3d.merge(&overrides.pie3d),
        timeline: defaults.timeline.merge(&overrides.timeline),
        radar_grid: defaults.radar_grid.merge(&overrides.radar_grid),
    }
}
