use thiserror::Error;

/// Rejected inputs to [`FrameTimer`](super::FrameTimer) operations.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TimerError {
    /// A window of zero frames would divide by zero at the next boundary.
    #[error("window frame count must be positive, got {0}")]
    InvalidWindow(u32),
    /// Delay must be a finite, non-negative number of milliseconds.
    #[error("artificial delay must be finite and non-negative, got {0} ms")]
    InvalidDelay(f64),
    /// Benchmarking needs at least one iteration to average over.
    #[error("iteration count must be positive, got {0}")]
    InvalidIterations(u32),
}

impl TimerError {
    /// True for the configuration family of errors (window size, delay).
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidWindow(_) | Self::InvalidDelay(_))
    }
}
