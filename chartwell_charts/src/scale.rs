// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ratio scales.
//!
//! A scale maps a domain value onto a ratio in `[0, 1]` over its extent and back. Components
//! turn ratios into pixels themselves (radius for radial grids, x offset for timelines).

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// A scale mapping domain values to `[0, 1]` ratios.
pub trait RatioScale {
    /// Maps a value to a ratio. A zero-width extent maps everything to 0.
    fn value_to_ratio(&self, value: f64) -> f64;

    /// Maps a ratio back to a value.
    fn ratio_to_value(&self, ratio: f64) -> f64;

    /// Tick values in ascending order.
    fn ticks(&self) -> Vec<f64>;
}

/// A linear numeric scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    min: f64,
    max: f64,
    tick_count: usize,
    minor_count: usize,
}

impl LinearScale {
    /// Creates a scale over `[min, max]` (swapped if reversed).
    pub fn new(min: f64, max: f64) -> Self {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        Self {
            min,
            max,
            tick_count: 5,
            minor_count: 5,
        }
    }

    /// Sets the approximate number of major ticks.
    pub fn with_tick_count(mut self, count: usize) -> Self {
        self.tick_count = count;
        self
    }

    /// Sets how many minor intervals split one major interval.
    pub fn with_minor_count(mut self, count: usize) -> Self {
        self.minor_count = count;
        self
    }

    /// Extends the extent to the first and last "nice" tick.
    #[must_use]
    pub fn nice(mut self) -> Self {
        let ticks = nice_ticks(self.min, self.max, self.tick_count);
        if let (Some(first), Some(last)) = (ticks.first(), ticks.last()) {
            if first < last {
                self.min = *first;
                self.max = *last;
            }
        }
        self
    }

    /// Lower bound of the extent.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the extent.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Ticks between consecutive major ticks, excluding the majors themselves.
    pub fn minor_ticks(&self) -> Vec<f64> {
        let majors = self.ticks();
        let parts = self.minor_count.max(1);
        let mut out = Vec::new();
        for w in majors.windows(2) {
            let step = (w[1] - w[0]) / parts as f64;
            for k in 1..parts {
                out.push(w[0] + step * k as f64);
            }
        }
        out
    }
}

impl RatioScale for LinearScale {
    fn value_to_ratio(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            return 0.0;
        }
        (value - self.min) / span
    }

    fn ratio_to_value(&self, ratio: f64) -> f64 {
        self.min + ratio * (self.max - self.min)
    }

    fn ticks(&self) -> Vec<f64> {
        let eps = (self.max - self.min).abs() * 1e-9;
        nice_ticks(self.min, self.max, self.tick_count)
            .into_iter()
            .filter(|t| *t >= self.min - eps && *t <= self.max + eps)
            .collect()
    }
}

/// A categorical scale; values are category indexes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrdinalScale {
    categories: Vec<String>,
}

impl OrdinalScale {
    /// Creates a scale over `categories`.
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns `true` without categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category names.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Ratio of a point inside the band of `index`; `sub_ratio` 0 is its start, 1 its end.
    pub fn transform(&self, index: f64, sub_ratio: f64) -> f64 {
        if self.categories.is_empty() {
            return 0.0;
        }
        (index + sub_ratio) / self.categories.len() as f64
    }
}

impl RatioScale for OrdinalScale {
    fn value_to_ratio(&self, value: f64) -> f64 {
        self.transform(value, 0.0)
    }

    fn ratio_to_value(&self, ratio: f64) -> f64 {
        let n = self.categories.len() as f64;
        if n == 0.0 {
            return 0.0;
        }
        (ratio * n).floor().clamp(0.0, n - 1.0)
    }

    fn ticks(&self) -> Vec<f64> {
        (0..self.categories.len()).map(|i| i as f64).collect()
    }
}

/// The y scale of a radial grid.
#[derive(Clone, Debug, PartialEq)]
pub enum GridScale {
    /// Numeric rings.
    Linear(LinearScale),
    /// One ring per category band.
    Ordinal(OrdinalScale),
}

impl RatioScale for GridScale {
    fn value_to_ratio(&self, value: f64) -> f64 {
        match self {
            Self::Linear(s) => s.value_to_ratio(value),
            Self::Ordinal(s) => s.value_to_ratio(value),
        }
    }

    fn ratio_to_value(&self, ratio: f64) -> f64 {
        match self {
            Self::Linear(s) => s.ratio_to_value(ratio),
            Self::Ordinal(s) => s.ratio_to_value(ratio),
        }
    }

    fn ticks(&self) -> Vec<f64> {
        match self {
            Self::Linear(s) => s.ticks(),
            Self::Ordinal(s) => s.ticks(),
        }
    }
}

/// Evenly spaced "nice" ticks (steps of 1, 2, 5 or 10 times a power of ten) covering
/// `[min, max]`.
pub fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let span = max - min;
    let step0 = span / count.max(1) as f64;
    let step = nice_step(step0);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;

    let n_f = ((stop - start) / step).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };
    (0..=n).map(|i| start + step * i as f64).collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn linear_round_trip_and_monotonic() {
        let s = LinearScale::new(-20.0, 80.0);
        let mut prev = f64::NEG_INFINITY;
        for i in 0..=100 {
            let v = -20.0 + f64::from(i);
            let r = s.value_to_ratio(v);
            assert!(r >= prev, "ratio must not decrease");
            prev = r;
            assert!((s.ratio_to_value(r) - v).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_width_maps_to_zero() {
        let s = LinearScale::new(5.0, 5.0);
        assert_eq!(s.value_to_ratio(5.0), 0.0);
        assert_eq!(s.value_to_ratio(100.0), 0.0);
    }

    #[test]
    fn nice_extends_the_extent_to_ticks() {
        let s = LinearScale::new(3.0, 97.0).nice();
        assert_eq!((s.min(), s.max()), (0.0, 100.0));
        assert_eq!(s.ticks(), [0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(s.with_minor_count(2).minor_ticks()[0], 10.0);
    }

    #[test]
    fn ordinal_bands() {
        let s = OrdinalScale::new(["a", "b", "c", "d"]);
        assert_eq!(s.ticks(), [0.0, 1.0, 2.0, 3.0]);
        assert_eq!(s.value_to_ratio(2.0), 0.5);
        assert_eq!(s.transform(3.0, 1.0), 1.0);
        assert_eq!(s.ratio_to_value(0.6), 2.0);
        assert_eq!(OrdinalScale::default().value_to_ratio(1.0), 0.0);
    }
}
