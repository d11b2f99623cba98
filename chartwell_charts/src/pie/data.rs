// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pie points, statistics and slice angles.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

/// Offset added to the configured start angle so that `0` starts the first slice at the top.
pub const DEFAULT_START_ANGLE: f64 = -90.0;

/// Point count above which a pie is reported as hard to read.
pub const TOO_MANY_POINTS: usize = 7;

/// Returns `true` for values that get no slice: absent, NaN, zero or negative.
pub fn is_missing(value: Option<f64>) -> bool {
    !matches!(value, Some(v) if v > 0.0)
}

/// One data row of a pie.
#[derive(Clone, Debug, PartialEq)]
pub struct PiePoint {
    /// Category name.
    pub name: String,
    /// Slice value.
    pub value: Option<f64>,
}

impl PiePoint {
    /// Creates a point.
    pub fn new(name: impl Into<String>, value: impl Into<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// See [`is_missing`].
    pub fn is_missing(&self) -> bool {
        is_missing(self.value)
    }
}

/// Aggregates over the non-missing points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Statistics {
    /// Non-missing points.
    pub count: usize,
    /// Missing points.
    pub missing: usize,
    /// Smallest value.
    pub min: Option<f64>,
    /// Largest value.
    pub max: Option<f64>,
    /// Sum of values.
    pub sum: Option<f64>,
    /// Mean value.
    pub average: Option<f64>,
}

impl Statistics {
    /// Computes the statistics of `points`.
    pub fn of(points: &[PiePoint]) -> Self {
        let mut stats = Self::default();
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for point in points {
            match point.value {
                Some(v) if !is_missing(Some(v)) => {
                    stats.count += 1;
                    sum += v;
                    min = min.min(v);
                    max = max.max(v);
                }
                _ => stats.missing += 1,
            }
        }
        if stats.count > 0 {
            stats.min = Some(min);
            stats.max = Some(max);
            stats.sum = Some(sum);
            stats.average = Some(sum / stats.count as f64);
        }
        stats
    }

    /// Share of `value` in the sum, in percent.
    pub fn percent(&self, value: f64) -> Option<f64> {
        self.sum.map(|sum| value / sum * 100.0)
    }
}

/// Angular extent of one slice, in degrees clockwise from the positive x axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliceAngles {
    /// Point index.
    pub index: usize,
    /// Start angle.
    pub start: f64,
    /// Sweep.
    pub sweep: f64,
}

impl SliceAngles {
    /// End angle.
    pub fn end(&self) -> f64 {
        self.start + self.sweep
    }

    /// Bisecting angle.
    pub fn middle(&self) -> f64 {
        self.start + self.sweep / 2.0
    }
}

/// Lays slices out clockwise from `start_angle + DEFAULT_START_ANGLE`, skipping missing points.
pub fn slice_angles(points: &[PiePoint], start_angle: f64) -> Vec<SliceAngles> {
    let Some(sum) = Statistics::of(points).sum else {
        return Vec::new();
    };
    let mut start = start_angle + DEFAULT_START_ANGLE;
    points
        .iter()
        .enumerate()
        .filter_map(|(index, point)| {
            let value = point.value.filter(|_| !point.is_missing())?;
            let sweep = value / sum * 360.0;
            let slice = SliceAngles {
                index,
                start,
                sweep,
            };
            start += sweep;
            Some(slice)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn points(values: &[Option<f64>]) -> Vec<PiePoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| PiePoint::new(alloc::format!("p{i}"), *v))
            .collect()
    }

    #[test]
    fn missing_values_are_absent_nan_or_not_positive() {
        assert!(is_missing(None));
        assert!(is_missing(Some(f64::NAN)));
        assert!(is_missing(Some(0.0)));
        assert!(is_missing(Some(-3.0)));
        assert!(!is_missing(Some(0.1)));
    }

    #[test]
    fn statistics_skip_missing_points() {
        let stats = Statistics::of(&points(&[Some(10.0), None, Some(30.0), Some(-1.0)]));
        assert_eq!(stats.count, 2);
        assert_eq!(stats.missing, 2);
        assert_eq!(stats.min, Some(10.0));
        assert_eq!(stats.max, Some(30.0));
        assert_eq!(stats.sum, Some(40.0));
        assert_eq!(stats.average, Some(20.0));
        assert_eq!(stats.percent(10.0), Some(25.0));

        let empty = Statistics::of(&points(&[None, Some(0.0)]));
        assert_eq!(empty.count, 0);
        assert_eq!(empty.sum, None);
        assert_eq!(empty.average, None);
    }

    #[test]
    fn slices_start_at_the_top_and_keep_point_indexes() {
        let angles = slice_angles(&points(&[Some(10.0), None, Some(30.0)]), 0.0);
        assert_eq!(angles.len(), 2);
        assert_eq!(angles[0].index, 0);
        assert_eq!(angles[0].start, -90.0);
        assert_eq!(angles[0].sweep, 90.0);
        assert_eq!(angles[1].index, 2);
        assert_eq!(angles[1].start, 0.0);
        assert_eq!(angles[1].end(), 270.0);
        assert_eq!(angles[1].middle(), 135.0);

        assert!(slice_angles(&points(&[None]), 0.0).is_empty());
    }
}
