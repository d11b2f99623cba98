// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pie appear animation.
//!
//! Playing runs two phases back to back. Slices first grow out of the start angle, their sweep
//! and radii rising from zero. Labels and connectors then fade in. The caller drives the clock
//! with [`PieAnimation::tick`], the same way gantt auto-scroll is driven.

/// Share of the duration spent growing slices. Labels fade in during the rest.
pub const SLICE_DURATION_RATIO: f64 = 0.85;

/// Progress of both phases, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationFrame {
    /// Slice growth.
    pub slices: f64,
    /// Label and connector opacity.
    pub labels: f64,
}

impl AnimationFrame {
    /// Frame of a finished animation.
    pub const DONE: Self = Self {
        slices: 1.0,
        labels: 1.0,
    };

    /// Frame `elapsed` ms into an animation lasting `duration` ms.
    pub fn at(elapsed: f64, duration: f64) -> Self {
        let running = duration > 0.0 && elapsed < duration;
        if !running {
            return Self::DONE;
        }
        let elapsed = elapsed.max(0.0);
        let slice_time = duration * SLICE_DURATION_RATIO;
        if elapsed < slice_time {
            Self {
                slices: elapsed / slice_time,
                labels: 0.0,
            }
        } else {
            Self {
                slices: 1.0,
                labels: (elapsed - slice_time) / (duration - slice_time),
            }
        }
    }

    /// `from` moved towards `to` by the slice progress.
    pub fn grow(&self, from: f64, to: f64) -> f64 {
        from + (to - from) * self.slices
    }
}

/// Clock of a playing animation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PieAnimation {
    started: Option<f64>,
    duration: f64,
}

impl PieAnimation {
    /// Returns `true` while playing.
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Starts playing at `now`. A duration that is not positive stops instead.
    pub fn start(&mut self, now: f64, duration: f64) {
        if duration > 0.0 && duration.is_finite() && now.is_finite() {
            self.started = Some(now);
            self.duration = duration;
        } else {
            self.stop();
        }
    }

    /// Returns the frame at `now`, or `None` when not playing.
    ///
    /// The finishing tick returns [`AnimationFrame::DONE`] and stops the clock.
    pub fn tick(&mut self, now: f64) -> Option<AnimationFrame> {
        let started = self.started?;
        let frame = AnimationFrame::at(now - started, self.duration);
        if frame == AnimationFrame::DONE {
            self.stop();
        }
        Some(frame)
    }

    /// Stops playing.
    pub fn stop(&mut self) {
        self.started = None;
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn slices_grow_before_labels_fade_in() {
        let f = AnimationFrame::at(425.0, 1000.0);
        assert!((f.slices - 0.5).abs() < 1e-9);
        assert_eq!(f.labels, 0.0);

        let f = AnimationFrame::at(860.0, 1000.0);
        assert_eq!(f.slices, 1.0);
        assert!(f.labels > 0.0 && f.labels < 0.1);

        let f = AnimationFrame::at(925.0, 1000.0);
        assert_eq!(f.slices, 1.0);
        assert!((f.labels - 0.5).abs() < 1e-9);

        assert_eq!(AnimationFrame::at(1000.0, 1000.0), AnimationFrame::DONE);
        assert_eq!(AnimationFrame::at(-5.0, 1000.0).slices, 0.0);
        assert_eq!(AnimationFrame::at(0.0, 0.0), AnimationFrame::DONE);
    }

    #[test]
    fn clock_stops_after_the_last_frame() {
        let mut a = PieAnimation::default();
        assert_eq!(a.tick(0.0), None);

        a.start(1000.0, 200.0);
        assert!(a.is_running());
        assert_eq!(a.tick(1000.0).map(|f| f.slices), Some(0.0));
        assert_eq!(a.tick(1300.0), Some(AnimationFrame::DONE));
        assert!(!a.is_running());
        assert_eq!(a.tick(1400.0), None);

        a.start(0.0, f64::NAN);
        assert!(!a.is_running());
    }
}
