use std::time::{Duration, Instant};

use crate::time::{Clock, SystemClock};

use super::config::MeasurementConfig;
use super::error::TimerError;
use super::result::{MeasurementResult, ResultKind};

/// Iterations used by callers that have no better number.
pub const DEFAULT_ITERATIONS: u32 = 100;

/// A callable paired with the label used in its benchmark report.
pub struct NamedCallable<F> {
    pub callable: F,
    pub label: String,
}

impl<F: FnMut()> NamedCallable<F> {
    pub fn new(label: impl Into<String>, callable: F) -> Self {
        Self { callable, label: label.into() }
    }
}

/// Call benchmarking and windowed frame-rate measurement.
///
/// One instance per update loop. The host calls [`tick`](Self::tick) exactly
/// once per frame; every `window_frame_count` frames the elapsed time is
/// averaged into a new [`MeasurementResult`].
///
/// Window boundaries are checked *before* the frame counter advances, so the
/// first tick after construction or [`reset`](Self::reset) closes an empty
/// window and stores a `Degenerate` result. Steady-state windows follow.
///
/// Panics raised by measured callables or the window callback are not
/// caught. The frame counter and window start may then be stale; call
/// `reset()` before resuming.
pub struct FrameTimer<C: Clock = SystemClock> {
    clock: C,
    config: MeasurementConfig,
    result: MeasurementResult,
    debug_info: String,

    frame_count: u64,
    window_start: Instant,
    /// Artificial delay slept since `window_start`.
    delay_in_window: Duration,
    windows_completed: u64,
}

impl FrameTimer<SystemClock> {
    /// Creates a timer on the system clock with the default configuration.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for FrameTimer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FrameTimer<C> {
    /// Creates a timer reading time from `clock`.
    ///
    /// Initialization problems are reported through [`debug_info`](Self::debug_info);
    /// the timer stays usable with defaults.
    pub fn with_clock(clock: C) -> Self {
        let window_start = clock.now();
        let mut timer = Self {
            clock,
            config: MeasurementConfig::default(),
            result: MeasurementResult::default(),
            debug_info: String::new(),
            frame_count: 0,
            window_start,
            delay_in_window: Duration::ZERO,
            windows_completed: 0,
        };

        if let Err(err) = timer.initialize() {
            timer.debug_info = format!("fail to initialize: {err}");
            log::error!("{}", timer.debug_info);
        }

        timer
    }

    fn initialize(&mut self) -> Result<(), TimerError> {
        self.set_config(MeasurementConfig::default())?;
        self.reset();
        Ok(())
    }

    // ── benchmarking ──────────────────────────────────────────────────────

    /// Runs `callable` `iterations` times back to back and returns the average
    /// duration of one call in microseconds.
    ///
    /// The clock is read once around the whole loop, at microsecond
    /// resolution. Overwrites the debug info with a summary naming `label`.
    pub fn measure_callable_duration<F>(
        &mut self,
        mut callable: F,
        label: &str,
        iterations: u32,
    ) -> Result<f64, TimerError>
    where
        F: FnMut(),
    {
        if iterations == 0 {
            return Err(TimerError::InvalidIterations(iterations));
        }

        let start = self.clock.now();
        for _ in 0..iterations {
            callable();
        }
        let span = self.clock.now().saturating_duration_since(start);

        let average_micros = span.as_micros() as f64 / f64::from(iterations);

        self.debug_info = format!("[{label}] spends {average_micros:.6} [μsec].");
        log::trace!("{} ({iterations} iterations)", self.debug_info);

        Ok(average_micros)
    }

    /// [`measure_callable_duration`](Self::measure_callable_duration) for a
    /// [`NamedCallable`].
    pub fn measure<F: FnMut()>(
        &mut self,
        named: &mut NamedCallable<F>,
        iterations: u32,
    ) -> Result<f64, TimerError> {
        self.measure_callable_duration(&mut named.callable, &named.label, iterations)
    }

    // ── per-frame measurement ─────────────────────────────────────────────

    /// Per-frame hook. Call exactly once per frame from the update loop.
    ///
    /// Closes the window when the frame counter is a multiple of the window
    /// size, then applies the artificial delay if enabled, then counts the
    /// frame.
    pub fn tick(&mut self) {
        let window = u64::from(self.config.window_frame_count);
        if self.frame_count % window == 0 {
            self.complete_window();
        }

        if self.config.enable_artificial_delay {
            let delay_micros = (self.config.delay_millis * 1_000.0).round() as u64;
            let delay = Duration::from_micros(delay_micros);
            self.clock.sleep(delay);
            self.delay_in_window += delay;
        }

        self.frame_count += 1;
    }

    fn complete_window(&mut self) {
        let elapsed = self.clock.now().saturating_duration_since(self.window_start);
        let raw_micros = elapsed.as_micros() as f64;

        // Sleep time is intentional and must not count as frame work.
        let slept_micros = self.delay_in_window.as_micros() as f64;
        let work_micros = (raw_micros - slept_micros).max(0.0);

        let average_micros = work_micros / f64::from(self.config.window_frame_count);
        self.result = MeasurementResult::from_average_micros(average_micros);
        self.windows_completed += 1;

        self.debug_info = format!(
            "Update FPS {:.6} [frame], {:.6} [msec].",
            self.result.frames_per_second, self.result.millis_per_frame,
        );

        match self.result.kind {
            ResultKind::Degenerate if self.frame_count > 0 => {
                log::warn!(
                    "degenerate window after {} frames ({raw_micros} µs raw, {slept_micros} µs \
                     slept)",
                    self.frame_count,
                );
            }
            _ => log::debug!("{}", self.debug_info),
        }

        if let Some(callback) = &self.config.on_window_complete {
            callback(&self.result);
        }

        self.reset();
    }

    /// Starts a fresh window: frame counter to zero, window start to now.
    ///
    /// The cached result is kept. The next `tick()` closes the (empty) window.
    pub fn reset(&mut self) {
        self.frame_count = 0;
        self.window_start = self.clock.now();
        self.delay_in_window = Duration::ZERO;
    }

    // ── configuration & accessors ─────────────────────────────────────────

    /// Replaces the configuration. On error the previous one stays in place.
    pub fn set_config(&mut self, config: MeasurementConfig) -> Result<(), TimerError> {
        config.validate()?;
        log::debug!("measurement config: {config:?}");
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &MeasurementConfig {
        &self.config
    }

    /// Result of the last completed window.
    pub fn current_result(&self) -> MeasurementResult {
        self.result
    }

    /// Summary written by the most recent measurement.
    pub fn debug_info(&self) -> &str {
        &self.debug_info
    }

    /// Frames counted in the current window.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn windows_completed(&self) -> u64 {
        self.windows_completed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::time::ManualClock;

    fn manual() -> (FrameTimer<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (FrameTimer::with_clock(clock.clone()), clock)
    }

    /// Ticks `n` frames, each followed by `frame_us` of simulated work.
    fn run_frames(timer: &mut FrameTimer<ManualClock>, clock: &ManualClock, n: u32, frame_us: u64) {
        for _ in 0..n {
            timer.tick();
            clock.advance_micros(frame_us);
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_timer_has_defaults() {
        let (timer, _) = manual();
        assert_eq!(timer.config().window_frame_count, 100);
        assert!(!timer.config().enable_artificial_delay);
        assert_eq!(timer.current_result().kind, ResultKind::Pending);
        assert_eq!(timer.frame_count(), 0);
        assert_eq!(timer.debug_info(), "");
    }

    // ── measure_callable_duration ─────────────────────────────────────────

    #[test]
    fn measure_invokes_callable_exactly_n_times() {
        let (mut timer, _) = manual();
        for n in [1, 7, 100, 1_000] {
            let mut calls = 0u32;
            let avg = timer.measure_callable_duration(|| calls += 1, "count", n).unwrap();
            assert_eq!(calls, n);
            assert!(avg >= 0.0);
        }
    }

    #[test]
    fn measure_averages_injected_delay() {
        let (mut timer, clock) = manual();
        let handle = clock.clone();
        let avg = timer
            .measure_callable_duration(|| handle.advance_micros(250), "fixed", 40)
            .unwrap();
        assert!(approx(avg, 250.0));
    }

    #[test]
    fn measure_noop_on_frozen_clock_is_zero() {
        let (mut timer, _) = manual();
        let avg = timer.measure_callable_duration(|| {}, "x", DEFAULT_ITERATIONS).unwrap();
        assert_eq!(avg, 0.0);
        assert!(timer.debug_info().contains("[x]"));
        assert!(timer.debug_info().contains("μsec"));
    }

    #[test]
    fn measure_zero_iterations_rejected() {
        let (mut timer, _) = manual();
        let mut calls = 0;
        let err = timer.measure_callable_duration(|| calls += 1, "never", 0).unwrap_err();
        assert_eq!(err, TimerError::InvalidIterations(0));
        assert!(!err.is_configuration());
        assert_eq!(calls, 0);
        assert_eq!(timer.debug_info(), "");
    }

    #[test]
    fn measure_named_callable_uses_label() {
        let (mut timer, clock) = manual();
        let handle = clock.clone();
        let mut named = NamedCallable::new("physics", move || handle.advance_micros(10));
        let avg = timer.measure(&mut named, 5).unwrap();
        assert!(approx(avg, 10.0));
        assert!(timer.debug_info().starts_with("[physics] spends 10.000000"));
    }

    #[test]
    fn measure_on_system_clock_covers_real_sleep() {
        let mut timer = FrameTimer::new();
        let avg = timer
            .measure_callable_duration(|| std::thread::sleep(Duration::from_millis(2)), "sleep", 3)
            .unwrap();
        assert!(avg >= 2_000.0, "avg = {avg}");
    }

    #[test]
    #[should_panic(expected = "workload failed")]
    fn measure_propagates_callable_panic() {
        let (mut timer, _) = manual();
        let _ = timer.measure_callable_duration(|| panic!("workload failed"), "boom", 3);
    }

    // ── tick / windows ────────────────────────────────────────────────────

    #[test]
    fn first_tick_closes_empty_window() {
        let (mut timer, _) = manual();
        timer.tick();
        assert_eq!(timer.windows_completed(), 1);
        assert_eq!(timer.current_result().kind, ResultKind::Degenerate);
        assert_eq!(timer.current_result().frames_per_second, 0.0);
        assert_eq!(timer.frame_count(), 1);
    }

    #[test]
    fn window_of_w_ticks_completes_once() {
        for w in [1u32, 2, 5, 10, 100] {
            let (mut timer, clock) = manual();
            let fired = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&fired);
            timer
                .set_config(
                    MeasurementConfig::default()
                        .with_window(w)
                        .on_window_complete(move |_| {
                            counter.fetch_add(1, Ordering::SeqCst);
                        }),
                )
                .unwrap();

            run_frames(&mut timer, &clock, w, 100);
            assert_eq!(fired.load(Ordering::SeqCst), 1, "w = {w}");
            assert_eq!(timer.windows_completed(), 1);
        }
    }

    #[test]
    fn ten_frame_window_at_one_millisecond() {
        let (mut timer, clock) = manual();
        timer.set_config(MeasurementConfig::default().with_window(10)).unwrap();

        run_frames(&mut timer, &clock, 10, 1_000);
        // Only the empty opening window has closed so far.
        assert_eq!(timer.current_result().kind, ResultKind::Degenerate);

        timer.tick();
        let r = timer.current_result();
        assert_eq!(r.kind, ResultKind::Valid);
        assert!(approx(r.millis_per_frame, 1.0));
        assert!(approx(r.frames_per_second, 1_000.0));
        assert!(timer.debug_info().starts_with("Update FPS 1000.000000 [frame], 1.000000 [msec]"));
    }

    #[test]
    fn result_unchanged_mid_window() {
        let (mut timer, clock) = manual();
        timer.set_config(MeasurementConfig::default().with_window(4)).unwrap();
        run_frames(&mut timer, &clock, 5, 500);
        let after_window = timer.current_result();
        assert!(after_window.is_valid());

        run_frames(&mut timer, &clock, 3, 9_000);
        assert_eq!(timer.current_result(), after_window);
    }

    #[test]
    fn current_result_is_idempotent() {
        let (mut timer, clock) = manual();
        timer.set_config(MeasurementConfig::default().with_window(3)).unwrap();
        run_frames(&mut timer, &clock, 4, 700);
        let a = timer.current_result();
        let b = timer.current_result();
        assert_eq!(a, b);
    }

    #[test]
    fn artificial_delay_is_excluded() {
        let (mut timer, clock) = manual();
        timer
            .set_config(MeasurementConfig::default().with_window(10).with_delay(2.0))
            .unwrap();

        run_frames(&mut timer, &clock, 10, 1_000);
        timer.tick();

        // 10 frames of 1 ms work + 2 ms sleep; 11 sleeps in total on the clock.
        assert_eq!(clock.elapsed(), Duration::from_micros(10 * 3_000 + 2_000));
        let r = timer.current_result();
        assert!(r.is_valid());
        assert!(approx(r.millis_per_frame, 1.0));
        assert!(approx(r.frames_per_second, 1_000.0));
    }

    #[test]
    fn delay_only_window_is_degenerate_not_negative() {
        let (mut timer, clock) = manual();
        timer
            .set_config(MeasurementConfig::default().with_window(5).with_delay(3.0))
            .unwrap();

        run_frames(&mut timer, &clock, 5, 0);
        timer.tick();

        let r = timer.current_result();
        assert_eq!(r.kind, ResultKind::Degenerate);
        assert_eq!(r.frames_per_second, 0.0);
        assert_eq!(r.millis_per_frame, 0.0);
    }

    #[test]
    fn window_change_mid_cycle_applies_at_next_check() {
        let (mut timer, clock) = manual();
        timer.set_config(MeasurementConfig::default().with_window(10)).unwrap();
        run_frames(&mut timer, &clock, 4, 1_000);
        assert_eq!(timer.windows_completed(), 1);
        assert_eq!(timer.frame_count(), 4);

        timer.set_config(MeasurementConfig::default().with_window(2)).unwrap();
        timer.tick();

        // 4 % 2 == 0: the boundary fires under the new size, which is also
        // the divisor.
        assert_eq!(timer.windows_completed(), 2);
        assert!(approx(timer.current_result().millis_per_frame, 2.0));
    }

    #[test]
    fn delay_enabled_mid_window_subtracts_only_taken_sleeps() {
        let (mut timer, clock) = manual();
        timer.set_config(MeasurementConfig::default().with_window(4)).unwrap();
        run_frames(&mut timer, &clock, 3, 1_000);

        timer
            .set_config(MeasurementConfig::default().with_window(4).with_delay(5.0))
            .unwrap();
        run_frames(&mut timer, &clock, 2, 1_000);

        // 4 frames of 1 ms work plus one 5 ms sleep. Subtracting a full
        // window of sleeps (20 ms) would have left nothing.
        assert_eq!(timer.windows_completed(), 2);
        let r = timer.current_result();
        assert_eq!(r.kind, ResultKind::Valid);
        assert!(approx(r.millis_per_frame, 1.0));
        assert!(approx(r.frames_per_second, 1_000.0));
    }

    #[test]
    fn window_shrunk_mid_cycle_with_delay_divides_by_new_size() {
        let (mut timer, clock) = manual();
        timer
            .set_config(MeasurementConfig::default().with_window(10).with_delay(2.0))
            .unwrap();
        run_frames(&mut timer, &clock, 4, 1_000);
        assert_eq!(timer.frame_count(), 4);

        timer
            .set_config(MeasurementConfig::default().with_window(2).with_delay(2.0))
            .unwrap();
        timer.tick();

        // 12 ms raw, 8 ms slept over four frames; 4 ms of work over the new
        // window of 2.
        assert_eq!(timer.windows_completed(), 2);
        let r = timer.current_result();
        assert_eq!(r.kind, ResultKind::Valid);
        assert!(approx(r.millis_per_frame, 2.0));
        assert!(approx(r.frames_per_second, 500.0));
    }

    #[test]
    fn zero_window_rejected_and_previous_kept() {
        let (mut timer, _) = manual();
        timer.set_config(MeasurementConfig::default().with_window(25)).unwrap();

        let err = timer
            .set_config(MeasurementConfig::default().with_window(0))
            .unwrap_err();
        assert_eq!(err, TimerError::InvalidWindow(0));
        assert!(err.is_configuration());
        assert_eq!(timer.config().window_frame_count, 25);
    }

    #[test]
    fn callback_sees_stored_result() {
        let (mut timer, clock) = manual();
        let seen: Arc<Mutex<Vec<MeasurementResult>>> = Arc::default();
        let sink = Arc::clone(&seen);
        timer
            .set_config(
                MeasurementConfig::default()
                    .with_window(2)
                    .on_window_complete(move |r| sink.lock().unwrap().push(*r)),
            )
            .unwrap();

        run_frames(&mut timer, &clock, 3, 4_000);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].kind, ResultKind::Degenerate);
        assert_eq!(seen[1], timer.current_result());
        assert!(approx(seen[1].millis_per_frame, 4.0));
    }

    #[test]
    #[should_panic(expected = "callback failed")]
    fn callback_panic_propagates() {
        let (mut timer, _) = manual();
        timer
            .set_config(
                MeasurementConfig::default().on_window_complete(|_| panic!("callback failed")),
            )
            .unwrap();
        timer.tick();
    }

    #[test]
    fn reset_restarts_window() {
        let (mut timer, clock) = manual();
        timer.set_config(MeasurementConfig::default().with_window(10)).unwrap();
        run_frames(&mut timer, &clock, 6, 1_000);
        assert_eq!(timer.windows_completed(), 1);

        timer.reset();
        assert_eq!(timer.frame_count(), 0);
        timer.tick();
        assert_eq!(timer.windows_completed(), 2);
        // The reset window had no elapsed time.
        assert_eq!(timer.current_result().kind, ResultKind::Degenerate);
    }

    #[test]
    fn tick_after_benchmark_keeps_window_state() {
        let (mut timer, clock) = manual();
        timer.set_config(MeasurementConfig::default().with_window(2)).unwrap();
        run_frames(&mut timer, &clock, 2, 1_000);

        let handle = clock.clone();
        timer.measure_callable_duration(|| handle.advance_micros(1), "inline", 1).unwrap();
        assert!(timer.debug_info().starts_with("[inline]"));

        timer.tick();
        // Benchmark time falls inside the window: (2000 + 1) µs over 2 frames.
        assert!(approx(timer.current_result().millis_per_frame, 1.0005));
    }
}
