//! Wall-clock driver for animation playback
//!
//! The evaluator never loops on its own; time is supplied by the caller. This
//! clock is the caller-side policy: it accumulates wall-clock seconds and, when
//! configured, snaps back to zero once a tick threshold has been reached.

use std::time::{Duration, Instant};

/// Reset threshold expressed in clip ticks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrapPolicy {
    pub ticks_per_second: f32,
    pub threshold_ticks: f32,
}

impl WrapPolicy {
    pub fn new(ticks_per_second: f32, threshold_ticks: f32) -> Self {
        Self {
            ticks_per_second,
            threshold_ticks,
        }
    }

    fn should_wrap(&self, seconds: f32) -> bool {
        seconds * self.ticks_per_second >= self.threshold_ticks
    }
}

/// Accumulates playback time in seconds
pub struct AnimationClock {
    last_tick: Instant,
    elapsed: f32,
    delta: Duration,
    frame_count: u64,
    wrap_count: u64,
    wrap: Option<WrapPolicy>,
}

impl AnimationClock {
    /// Create a clock starting at zero with no wrapping
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            elapsed: 0.0,
            delta: Duration::ZERO,
            frame_count: 0,
            wrap_count: 0,
            wrap: None,
        }
    }

    /// Create a clock that resets once `threshold_ticks` is reached
    pub fn with_wrap(policy: WrapPolicy) -> Self {
        Self {
            wrap: Some(policy),
            ..Self::new()
        }
    }

    /// Advance by the real time since the previous tick.
    /// Returns the playback time (seconds) to evaluate this frame at.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = now - self.last_tick;
        self.last_tick = now;
        self.step(self.delta.as_secs_f32())
    }

    /// Advance by a fixed amount, for headless or deterministic playback.
    pub fn advance_by(&mut self, dt: f32) -> f32 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.delta = Duration::from_secs_f32(dt);
        self.step(dt)
    }

    /// The frame at the threshold is still played; the reset applies to the next one.
    fn step(&mut self, dt: f32) -> f32 {
        self.elapsed += dt;
        self.frame_count += 1;
        let current = self.elapsed;

        if let Some(policy) = self.wrap {
            if policy.should_wrap(current) {
                self.elapsed = 0.0;
                self.wrap_count += 1;
            }
        }

        current
    }

    /// Reset playback time to zero
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.last_tick = Instant::now();
    }

    /// Playback time that the next frame starts from
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed
    }

    /// Duration of the last step
    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// How many times the wrap threshold was hit
    pub fn wrap_count(&self) -> u64 {
        self.wrap_count
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut clock = AnimationClock::new();
        assert_eq!(clock.advance_by(0.25), 0.25);
        assert_eq!(clock.advance_by(0.25), 0.5);
        assert_eq!(clock.frame_count(), 2);
        assert_eq!(clock.wrap_count(), 0);
    }

    #[test]
    fn test_wrap_after_threshold() {
        // 32 ticks/s, reset at 64 ticks = 2 seconds
        let mut clock = AnimationClock::with_wrap(WrapPolicy::new(32.0, 64.0));

        assert_eq!(clock.advance_by(1.0), 1.0);
        // Frame at the threshold is still reported
        assert_eq!(clock.advance_by(1.0), 2.0);
        assert_eq!(clock.wrap_count(), 1);
        assert_eq!(clock.elapsed_secs(), 0.0);

        assert_eq!(clock.advance_by(0.5), 0.5);
    }

    #[test]
    fn test_negative_step_ignored() {
        let mut clock = AnimationClock::new();
        clock.advance_by(1.0);
        assert_eq!(clock.advance_by(-3.0), 1.0);
    }

    #[test]
    fn test_reset() {
        let mut clock = AnimationClock::new();
        clock.advance_by(5.0);
        clock.reset();
        assert_eq!(clock.elapsed_secs(), 0.0);
    }

    #[test]
    fn test_tick_is_monotonic() {
        let mut clock = AnimationClock::new();
        let a = clock.tick();
        let b = clock.tick();
        assert!(b >= a);
    }
}
