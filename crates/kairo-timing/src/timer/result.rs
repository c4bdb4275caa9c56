/// Quality of a cached [`MeasurementResult`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ResultKind {
    /// No window has completed yet.
    #[default]
    Pending,
    /// Computed from a positive per-frame average.
    Valid,
    /// The compensated per-frame average was zero or negative; the frame rate
    /// is undefined and reported as `0.0`.
    Degenerate,
}

/// Snapshot of the last completed measurement window.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MeasurementResult {
    pub frames_per_second: f64,
    pub millis_per_frame: f64,
    pub kind: ResultKind,
}

impl MeasurementResult {
    /// Builds a result from the average frame duration in microseconds.
    ///
    /// Non-positive or non-finite averages yield a `Degenerate` result with a
    /// zero frame rate rather than infinity or NaN.
    pub fn from_average_micros(average_micros: f64) -> Self {
        if !average_micros.is_finite() || average_micros <= 0.0 {
            return Self {
                frames_per_second: 0.0,
                millis_per_frame: 0.0,
                kind: ResultKind::Degenerate,
            };
        }

        Self {
            frames_per_second: 1_000_000.0 / average_micros,
            millis_per_frame: average_micros / 1_000.0,
            kind: ResultKind::Valid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.kind == ResultKind::Valid
    }
}
