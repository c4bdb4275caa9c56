//! Kairo timing crate.
//!
//! Lightweight instrumentation for update loops: average the cost of a
//! callable over many runs, or keep a windowed frames-per-second estimate by
//! calling [`FrameTimer::tick`] once per frame.
//!
//! # Quick start
//!
//! ```rust
//! use kairo_timing::{FrameTimer, ManualClock, MeasurementConfig, ResultKind};
//!
//! let clock = ManualClock::new();
//! let mut timer = FrameTimer::with_clock(clock.clone());
//! timer.set_config(MeasurementConfig::default().with_window(10)).unwrap();
//!
//! // The first tick closes an empty window; ten 1 ms frames follow.
//! for _ in 0..11 {
//!     timer.tick();
//!     clock.advance_micros(1_000);
//! }
//!
//! let result = timer.current_result();
//! assert_eq!(result.kind, ResultKind::Valid);
//! assert_eq!(result.frames_per_second, 1_000.0);
//! ```

pub mod global;
pub mod logging;
pub mod time;
pub mod timer;

pub use global::with_global;
pub use time::{Clock, ManualClock, SystemClock};
pub use timer::{
    DEFAULT_ITERATIONS, FrameTimer, MeasurementConfig, MeasurementResult, NamedCallable,
    ResultKind, TimerError,
};
