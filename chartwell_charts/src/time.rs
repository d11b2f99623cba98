// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Calendar intervals over UTC millisecond timestamps.
//!
//! Timestamps are `f64` milliseconds since the Unix epoch so they can carry `NaN` for "unset",
//! matching how the gantt scale and data tree store dates. Calendar arithmetic goes through
//! `chrono` in UTC.

extern crate alloc;

use alloc::vec::Vec;

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeDelta, Timelike, Utc};

/// Milliseconds in one minute.
pub const MS_IN_MINUTE: f64 = 60_000.0;
/// Milliseconds in one day.
pub const MS_IN_DAY: f64 = 86_400_000.0;

/// A calendar unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Interval {
    /// Calendar years.
    Year,
    /// Half years.
    Semester,
    /// Quarters.
    Quarter,
    /// Calendar months.
    Month,
    /// Ten-day periods.
    ThirdOfMonth,
    /// Weeks (starting on Sunday).
    Week,
    /// Days.
    Day,
    /// Hours.
    Hour,
    /// Minutes.
    Minute,
    /// Seconds.
    Second,
    /// Milliseconds.
    Millisecond,
}

/// One tick span `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickSpan {
    /// Span start (ms).
    pub start: f64,
    /// Span end (ms).
    pub end: f64,
}

fn align(value: i64, interval: i64, base: i64) -> i64 {
    if interval <= 0 {
        return value;
    }
    value - (value - base).rem_euclid(interval)
}

fn utc_ms(year: i32, month0: u32, day: u32, h: u32, m: u32, s: u32, ms: u32) -> Option<i64> {
    let date = NaiveDate::from_ymd_opt(year, month0 + 1, day)?;
    Some(
        date.and_hms_milli_opt(h, m, s, ms)?
            .and_utc()
            .timestamp_millis(),
    )
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "callers guard against non-finite values; chrono rejects out-of-range instants"
)]
fn to_datetime(ts: f64) -> Option<DateTime<Utc>> {
    if !ts.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ts as i64)
}

impl Interval {
    /// Approximate length of `count` units in milliseconds.
    pub fn range_ms(self, count: u32) -> f64 {
        let c = f64::from(count);
        let year = MS_IN_DAY * 365.25;
        match self {
            Self::Year => c * year,
            Self::Semester => c * year / 2.0,
            Self::Quarter => c * year / 4.0,
            Self::Month => c * year / 12.0,
            Self::ThirdOfMonth => c * year / 36.0,
            Self::Week => c * MS_IN_DAY * 7.0,
            Self::Day => c * MS_IN_DAY,
            Self::Hour => c * 3_600_000.0,
            Self::Minute => c * MS_IN_MINUTE,
            Self::Second => c * 1000.0,
            Self::Millisecond => c,
        }
    }

    /// Floors `ts` to a boundary of `count` units.
    ///
    /// Year boundaries align to multiples of `count` counted from 2000; day, week and
    /// third-of-month boundaries align to fixed periods counted from 2000-01-02 (a Sunday).
    /// Returns `NaN` for non-finite input.
    pub fn align_left(self, ts: f64, count: u32) -> f64 {
        let Some(dt) = to_datetime(ts) else {
            return f64::NAN;
        };
        let count = i64::from(count.max(1));
        let (y, mo, d) = (dt.year(), dt.month0(), dt.day());
        let (h, mi, s) = (dt.hour(), dt.minute(), dt.second());
        let ms = dt.timestamp_subsec_millis();
        let day_ms: i64 = 86_400_000;
        let sunday_2000 = utc_ms(2000, 0, 2, 0, 0, 0, 0).unwrap_or_default();
        let aligned = match self {
            Self::Year => {
                let year = align(i64::from(y), count, 2000);
                i32::try_from(year)
                    .ok()
                    .and_then(|year| utc_ms(year, 0, 1, 0, 0, 0, 0))
            }
            Self::Semester | Self::Quarter | Self::Month => {
                let per = match self {
                    Self::Semester => 6,
                    Self::Quarter => 3,
                    _ => 1,
                };
                let month = align(i64::from(mo), count * per, 0);
                u32::try_from(month)
                    .ok()
                    .and_then(|month| utc_ms(y, month, 1, 0, 0, 0, 0))
            }
            Self::ThirdOfMonth => Some(align(dt.timestamp_millis(), count * 10 * day_ms, sunday_2000)),
            Self::Week => Some(align(dt.timestamp_millis(), count * 7 * day_ms, sunday_2000)),
            Self::Day => Some(align(dt.timestamp_millis(), count * day_ms, sunday_2000)),
            Self::Hour => u32::try_from(align(i64::from(h), count, 0))
                .ok()
                .and_then(|h| utc_ms(y, mo, d, h, 0, 0, 0)),
            Self::Minute => u32::try_from(align(i64::from(mi), count, 0))
                .ok()
                .and_then(|mi| utc_ms(y, mo, d, h, mi, 0, 0)),
            Self::Second => u32::try_from(align(i64::from(s), count, 0))
                .ok()
                .and_then(|s| utc_ms(y, mo, d, h, mi, s, 0)),
            Self::Millisecond => u32::try_from(align(i64::from(ms), count, 0))
                .ok()
                .and_then(|ms| utc_ms(y, mo, d, h, mi, s, ms)),
        };
        aligned.map_or(f64::NAN, |v| v as f64)
    }

    /// Adds `count` units (negative counts go back in time).
    ///
    /// Month-based units clamp the day of month (Jan 31 + 1 month = Feb 28/29). Returns `NaN`
    /// when the result is not representable.
    pub fn add(self, ts: f64, count: i32) -> f64 {
        let Some(dt) = to_datetime(ts) else {
            return f64::NAN;
        };
        let months = |n: i32| -> Option<DateTime<Utc>> {
            let m = Months::new(n.unsigned_abs());
            if n >= 0 {
                dt.checked_add_months(m)
            } else {
                dt.checked_sub_months(m)
            }
        };
        let delta = |ms: i64| -> Option<DateTime<Utc>> {
            dt.checked_add_signed(TimeDelta::try_milliseconds(ms)?)
        };
        let c = i64::from(count);
        let out = match self {
            Self::Year => count.checked_mul(12).and_then(months),
            Self::Semester => count.checked_mul(6).and_then(months),
            Self::Quarter => count.checked_mul(3).and_then(months),
            Self::Month => months(count),
            Self::ThirdOfMonth => delta(c * 10 * 86_400_000),
            Self::Week => delta(c * 7 * 86_400_000),
            Self::Day => delta(c * 86_400_000),
            Self::Hour => delta(c * 3_600_000),
            Self::Minute => delta(c * 60_000),
            Self::Second => delta(c * 1000),
            Self::Millisecond => delta(c),
        };
        out.map_or(f64::NAN, |v| v.timestamp_millis() as f64)
    }

    /// Consecutive spans of `count` units covering `[min, max)`, starting at the aligned `min`.
    ///
    /// Capped at 10k spans.
    pub fn ticks(self, min: f64, max: f64, count: u32) -> Vec<TickSpan> {
        let mut out = Vec::new();
        if !min.is_finite() || !max.is_finite() {
            return out;
        }
        let step = i32::try_from(count.max(1)).unwrap_or(i32::MAX);
        let mut current = self.align_left(min, count);
        while current < max && out.len() < 10_000 {
            let next = self.add(current, step);
            if next.is_nan() || next <= current {
                break;
            }
            out.push(TickSpan {
                start: current,
                end: next,
            });
            current = next;
        }
        out
    }
}

/// UTC midnight of the day containing `ts`.
pub fn utc_midnight(ts: f64) -> f64 {
    Interval::Day.align_left(ts, 1)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> f64 {
        utc_ms(y, m - 1, d, h, 0, 0, 0).unwrap() as f64
    }

    #[test]
    fn align_left_respects_calendar_units() {
        let t = ts(2024, 5, 17, 13) + 1234.0;
        assert_eq!(Interval::Month.align_left(t, 1), ts(2024, 5, 1, 0));
        assert_eq!(Interval::Quarter.align_left(t, 1), ts(2024, 4, 1, 0));
        assert_eq!(Interval::Year.align_left(t, 5), ts(2020, 1, 1, 0));
        assert_eq!(Interval::Hour.align_left(t, 6), ts(2024, 5, 17, 12));
        assert_eq!(Interval::Day.align_left(t, 1), ts(2024, 5, 17, 0));
        // 2024-05-12 is a Sunday.
        assert_eq!(Interval::Week.align_left(t, 1), ts(2024, 5, 12, 0));
    }

    #[test]
    fn month_addition_clamps_day_of_month() {
        let jan31 = ts(2024, 1, 31, 0);
        assert_eq!(Interval::Month.add(jan31, 1), ts(2024, 2, 29, 0));
        assert_eq!(Interval::Year.add(ts(2024, 2, 29, 0), -1), ts(2023, 2, 28, 0));
        assert!(Interval::Day.add(f64::NAN, 1).is_nan());
    }

    #[test]
    fn ticks_cover_the_range_from_an_aligned_start() {
        let spans = Interval::Day.ticks(ts(2024, 1, 1, 6), ts(2024, 1, 3, 1), 1);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].start, ts(2024, 1, 1, 0));
        assert_eq!(spans[2].end, ts(2024, 1, 4, 0));
        assert!(spans.windows(2).all(|w| w[0].end == w[1].start));
    }
}
