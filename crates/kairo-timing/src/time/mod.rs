//! Time subsystem.
//!
//! Abstracts the monotonic clock and the blocking sleep behind [`Clock`] so the
//! measurement code can be driven deterministically in tests.
//! Intended usage:
//! - `SystemClock` in real update loops
//! - `ManualClock` wherever elapsed time must be controlled exactly

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
