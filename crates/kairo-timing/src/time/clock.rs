use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of monotonic time and blocking delay.
pub trait Clock {
    /// Returns the current monotonic instant.
    fn now(&self) -> Instant;

    /// Blocks (or pretends to block) the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation backed by `Instant::now` and `thread::sleep`.
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Fallback offset when `base + offset` does not fit the platform's `Instant`.
const MAX_REPRESENTABLE_OFFSET: Duration = Duration::from_secs(u32::MAX as u64);

/// Hand-driven clock.
///
/// Time only moves when [`advance`](ManualClock::advance) or
/// [`Clock::sleep`] is called. Clones share the same offset, so a clone handed
/// to a measured closure moves the time observed by the timer as well.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Moves the clock forward by `by`. The offset saturates at `u64::MAX` ns.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        // The closure always returns `Some`, so the update cannot fail.
        let _ = self
            .offset_nanos
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cur| {
                Some(cur.saturating_add(nanos))
            });
    }

    /// Moves the clock forward by `micros` microseconds.
    pub fn advance_micros(&self, micros: u64) {
        self.advance(Duration::from_micros(micros));
    }

    /// Total time advanced since construction.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::Relaxed))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base
            .checked_add(self.elapsed())
            .unwrap_or_else(|| self.base + MAX_REPRESENTABLE_OFFSET)
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}
