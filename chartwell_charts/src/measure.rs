// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for label layout.
//!
//! Shaping happens downstream of the chart layer, so components that place labels (pie outside
//! labels) take a measurer to estimate label boxes before positioning them.

/// A minimal text measurement interface.
pub trait TextMeasurer {
    /// Returns `(width, height)` in the same coordinate system as the marks.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// A heuristic measurer assuming glyphs ~0.6em wide and lines 1.2em tall.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let width = 0.6 * font_size * text.chars().count() as f64;
        (width, 1.2 * font_size)
    }
}

/// A measurer where every label has the same box, handy for deterministic layouts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedTextMeasurer {
    /// Label width.
    pub width: f64,
    /// Label height.
    pub height: f64,
}

impl TextMeasurer for FixedTextMeasurer {
    fn measure(&self, _text: &str, _font_size: f64) -> (f64, f64) {
        (self.width, self.height)
    }
}
