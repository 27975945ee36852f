use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock per loop, so two mounted backdrops never share delta-time state.
///
/// Delta time is clamped: a backdrop that was occluded for a minute must not
/// jump its animation by a minute when it becomes visible again.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (0.1ms ..= 250ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            dt_min,
            dt_max,
        }
    }

    /// Resets the clock baseline to `now`.
    ///
    /// Used when resuming from a pause so the hidden interval is not counted.
    pub fn reset_at(&mut self, now: Instant) {
        self.last = now;
    }

    /// Advances the clock using the current time.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now` and returns a new `FrameTime`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        FrameTime {
            dt: dt.as_secs_f32(),
            now,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_stall_is_clamped_to_max() {
        let start = Instant::now();
        let mut clock = FrameClock::new();
        clock.reset_at(start);

        let ft = clock.tick_at(start + Duration::from_secs(30));
        assert!((ft.dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn consecutive_ticks_measure_their_own_gap() {
        let start = Instant::now();
        let mut clock = FrameClock::new();
        clock.reset_at(start);

        let a = clock.tick_at(start + Duration::from_millis(16));
        let b = clock.tick_at(start + Duration::from_millis(32));
        assert_eq!(b.now - a.now, Duration::from_millis(16));
        assert!((b.dt - 0.016).abs() < 1e-4);
    }

    #[test]
    fn time_going_backwards_yields_minimum_dt() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::new();
        clock.reset_at(start);

        let ft = clock.tick_at(start - Duration::from_millis(5));
        assert!((ft.dt - 0.0001).abs() < 1e-6);
    }
}
