use std::time::{Duration, Instant};

/// Trailing-edge debouncer.
///
/// Each `trigger` replaces the pending value and restarts the delay; `poll`
/// hands the latest value out once the delay has passed without a new trigger.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn trigger(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.delay, value));
    }

    /// Returns the pending value if its deadline is at or before `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = matches!(&self.pending, Some((deadline, _)) if *deadline <= now);
        if due {
            self.pending.take().map(|(_, v)| v)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
