use std::time::{Duration, Instant};

/// How the pacer moves its baseline after letting a frame through.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum PacingMode {
    /// Baseline becomes the time of the accepted frame.
    Snap,
    /// Baseline keeps the overshoot (`delta % interval`), so the average rate
    /// converges on the target instead of drifting below it.
    #[default]
    CarryRemainder,
}

/// Lowest accepted target rate.
pub const MIN_FPS: f32 = 1.0;
/// Highest accepted target rate.
pub const MAX_FPS: f32 = 1000.0;

/// Maps a requested rate onto `MIN_FPS..=MAX_FPS`. Non-positive or non-finite
/// requests fall back to 60.
pub fn clamp_fps(target_fps: f32) -> f32 {
    if target_fps.is_finite() && target_fps > 0.0 {
        target_fps.clamp(MIN_FPS, MAX_FPS)
    } else {
        60.0
    }
}

/// Target-FPS gate.
///
/// The host wakes the loop at display refresh; the pacer decides whether this
/// wake-up does any work. The first call always passes.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    mode: PacingMode,
    last: Option<Instant>,
}

impl FramePacer {
    /// Creates a pacer for `target_fps`, clamped with [`clamp_fps`].
    pub fn new(target_fps: f32, mode: PacingMode) -> Self {
        let fps = clamp_fps(target_fps);
        Self {
            interval: Duration::from_secs_f64(1.0 / fps as f64),
            mode,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Earliest instant at which `ready` can pass again.
    pub fn next_due(&self, now: Instant) -> Instant {
        match self.last {
            Some(last) => (last + self.interval).max(now),
            None => now,
        }
    }

    /// Forgets the baseline; the next `ready` call passes.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Returns `true` if at least one interval has elapsed since the last
    /// accepted frame, and records `now` as accepted.
    pub fn ready(&mut self, now: Instant) -> bool {
        let Some(last) = self.last else {
            self.last = Some(now);
            return true;
        };

        let delta = now.saturating_duration_since(last);
        if delta < self.interval {
            return false;
        }

        self.last = Some(match self.mode {
            PacingMode::Snap => now,
            PacingMode::CarryRemainder => {
                let rem = delta.as_nanos() % self.interval.as_nanos();
                now - Duration::from_nanos(rem as u64)
            }
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_frame_always_passes() {
        let mut pacer = FramePacer::new(60.0, PacingMode::Snap);
        assert!(pacer.ready(Instant::now()));
    }

    #[test]
    fn skips_until_interval_elapsed() {
        let t0 = Instant::now();
        let mut pacer = FramePacer::new(50.0, PacingMode::Snap); // 20ms
        assert!(pacer.ready(t0));
        assert!(!pacer.ready(t0 + ms(5)));
        assert!(!pacer.ready(t0 + ms(19)));
        assert!(pacer.ready(t0 + ms(20)));
        assert!(!pacer.ready(t0 + ms(39)));
    }

    #[test]
    fn carry_remainder_keeps_overshoot() {
        let t0 = Instant::now();
        let mut pacer = FramePacer::new(50.0, PacingMode::CarryRemainder);
        assert!(pacer.ready(t0));
        // 25ms late by 5ms: baseline moves to t0 + 20ms.
        assert!(pacer.ready(t0 + ms(25)));
        assert!(pacer.ready(t0 + ms(40)));

        let mut snap = FramePacer::new(50.0, PacingMode::Snap);
        assert!(snap.ready(t0));
        assert!(snap.ready(t0 + ms(25)));
        assert!(!snap.ready(t0 + ms(40)));
    }

    #[test]
    fn next_due_follows_baseline() {
        let t0 = Instant::now();
        let mut pacer = FramePacer::new(50.0, PacingMode::Snap);
        assert_eq!(pacer.next_due(t0), t0);
        assert!(pacer.ready(t0));
        assert_eq!(pacer.next_due(t0 + ms(5)), t0 + ms(20));
        assert_eq!(pacer.next_due(t0 + ms(30)), t0 + ms(30));
    }

    #[test]
    fn invalid_target_falls_back_to_sixty() {
        let pacer = FramePacer::new(0.0, PacingMode::Snap);
        assert_eq!(pacer.interval(), Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn extreme_targets_are_clamped() {
        let slow = FramePacer::new(1.0e-20, PacingMode::Snap);
        assert_eq!(slow.interval(), Duration::from_secs(1));

        let t0 = Instant::now();
        let mut fast = FramePacer::new(1.0e12, PacingMode::CarryRemainder);
        assert_eq!(fast.interval(), Duration::from_millis(1));
        assert!(fast.ready(t0));
        assert!(fast.ready(t0 + Duration::from_micros(1500)));
        assert!(!fast.ready(t0 + Duration::from_micros(1900)));
    }

    #[test]
    fn reset_lets_next_frame_through() {
        let t0 = Instant::now();
        let mut pacer = FramePacer::new(10.0, PacingMode::Snap);
        assert!(pacer.ready(t0));
        pacer.reset();
        assert!(pacer.ready(t0 + ms(1)));
    }
}
