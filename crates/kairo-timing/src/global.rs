//! Process-wide convenience instance.
//!
//! Code that owns its update loop should construct and pass around its own
//! [`FrameTimer`]. This module only exists for call sites that cannot thread
//! one through.

use std::sync::Mutex;

use state::InitCell;

use crate::timer::FrameTimer;

static DEFAULT_TIMER: InitCell<Mutex<FrameTimer>> = InitCell::new();

/// Runs `f` with exclusive access to the shared timer, creating it on first use.
///
/// If an earlier closure panicked while holding the timer, the lock is
/// recovered and the timer is reset before `f` runs.
pub fn with_global<R>(f: impl FnOnce(&mut FrameTimer) -> R) -> R {
    let cell = DEFAULT_TIMER.get_or_init(|| Mutex::new(FrameTimer::new()));

    let mut guard = match cell.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("shared frame timer was poisoned; resetting window");
            cell.clear_poison();
            let mut guard = poisoned.into_inner();
            guard.reset();
            guard
        }
    };

    f(&mut *guard)
}
