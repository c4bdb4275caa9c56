use std::fmt;
use std::sync::Arc;

use super::error::TimerError;
use super::result::MeasurementResult;

/// Frames averaged per window unless configured otherwise.
pub const DEFAULT_WINDOW_FRAMES: u32 = 100;

/// Hook invoked synchronously at the end of every measurement window.
///
/// Runs on the thread calling `tick()`, after the new result is stored, and
/// receives that result. It must not block indefinitely.
pub type WindowCallback = Arc<dyn Fn(&MeasurementResult) + Send + Sync>;

/// Windowed measurement parameters.
///
/// Applied wholesale through `FrameTimer::set_config`; takes effect on the
/// next `tick()`.
#[derive(Clone)]
pub struct MeasurementConfig {
    /// Frames per averaging window. Must be non-zero.
    pub window_frame_count: u32,
    pub on_window_complete: Option<WindowCallback>,
    /// Sleep `delay_millis` on every tick and exclude it from the measurement.
    ///
    /// This stalls the calling thread. It exists to simulate throttled frames,
    /// not to pace a production loop.
    pub enable_artificial_delay: bool,
    pub delay_millis: f64,
}

impl MeasurementConfig {
    /// Returns a copy with the given window size.
    pub fn with_window(mut self, frames: u32) -> Self {
        self.window_frame_count = frames;
        self
    }

    /// Returns a copy with the artificial delay enabled at `millis`.
    pub fn with_delay(mut self, millis: f64) -> Self {
        self.enable_artificial_delay = true;
        self.delay_millis = millis;
        self
    }

    /// Returns a copy that calls `f` whenever a window completes.
    pub fn on_window_complete<F>(mut self, f: F) -> Self
    where
        F: Fn(&MeasurementResult) + Send + Sync + 'static,
    {
        self.on_window_complete = Some(Arc::new(f));
        self
    }

    pub(crate) fn validate(&self) -> Result<(), TimerError> {
        if self.window_frame_count == 0 {
            return Err(TimerError::InvalidWindow(self.window_frame_count));
        }
        if !self.delay_millis.is_finite() || self.delay_millis < 0.0 {
            return Err(TimerError::InvalidDelay(self.delay_millis));
        }
        Ok(())
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            window_frame_count: DEFAULT_WINDOW_FRAMES,
            on_window_complete: None,
            enable_artificial_delay: false,
            delay_millis: 0.0,
        }
    }
}

impl fmt::Debug for MeasurementConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementConfig")
            .field("window_frame_count", &self.window_frame_count)
            .field("on_window_complete", &self.on_window_complete.is_some())
            .field("enable_artificial_delay", &self.enable_artificial_delay)
            .field("delay_millis", &self.delay_millis)
            .finish()
    }
}
