//! Measurement subsystem.
//!
//! [`FrameTimer`] owns both measurement modes:
//! - one-shot benchmarking of a callable (`measure_callable_duration`)
//! - windowed frame-rate tracking driven by `tick()` once per frame
//!
//! Everything runs synchronously on the calling thread.

mod config;
mod error;
mod frame_timer;
mod result;

pub use config::{DEFAULT_WINDOW_FRAMES, MeasurementConfig, WindowCallback};
pub use error::TimerError;
pub use frame_timer::{DEFAULT_ITERATIONS, FrameTimer, NamedCallable};
pub use result::{MeasurementResult, ResultKind};
