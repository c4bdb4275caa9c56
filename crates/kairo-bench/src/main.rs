use std::hint::black_box;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;

use kairo_timing::logging::{LoggingConfig, init_logging};
use kairo_timing::{DEFAULT_ITERATIONS, FrameTimer, MeasurementConfig, NamedCallable};

#[derive(Parser, Debug)]
#[command(author, version, about = "Benchmark workloads and measure a simulated update loop")]
struct Args {
    /// Frames averaged per measurement window
    #[arg(long, default_value_t = 100)]
    window: u32,
    /// Frames to run through the simulated update loop
    #[arg(long, default_value_t = 500)]
    frames: u32,
    /// Busy work per simulated frame, in microseconds
    #[arg(long, default_value_t = 2_000)]
    frame_work_us: u64,
    /// Artificial per-frame delay in milliseconds (excluded from the measurement)
    #[arg(long)]
    delay_ms: Option<f64>,
    /// Iterations per benchmarked workload
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: u32,
    /// Log filter (env_logger syntax); falls back to RUST_LOG, then "info"
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.log.clone().map(LoggingConfig::with_filter).unwrap_or_default());

    if args.frames == 0 {
        bail!("--frames must be at least 1");
    }

    let mut timer = FrameTimer::new();
    run_benchmarks(&mut timer, args.iterations)?;
    run_update_loop(&mut timer, &args)?;

    Ok(())
}

fn run_benchmarks(timer: &mut FrameTimer, iterations: u32) -> Result<()> {
    let mut workloads = vec![
        workload("sum_of_squares", || {
            let total: u64 = (0..10_000u64).map(|x| x * x).sum();
            black_box(total);
        }),
        workload("sort_4k", || {
            let mut v: Vec<u32> = (0..4_096u32)
                .rev()
                .map(|x| x.wrapping_mul(2_654_435_761))
                .collect();
            v.sort_unstable();
            black_box(v);
        }),
        workload("format_strings", || {
            let s: String = (0..256).map(|i| format!("{i:04x}")).collect();
            black_box(s);
        }),
    ];

    for job in &mut workloads {
        timer
            .measure(job, iterations)
            .with_context(|| format!("benchmarking {}", job.label))?;
        log::info!("{}", timer.debug_info());
    }

    Ok(())
}

fn run_update_loop(timer: &mut FrameTimer, args: &Args) -> Result<()> {
    let mut config = MeasurementConfig::default()
        .with_window(args.window)
        .on_window_complete(|r| {
            log::info!(
                "window: {:.1} fps, {:.3} ms/frame ({:?})",
                r.frames_per_second,
                r.millis_per_frame,
                r.kind,
            );
        });
    if let Some(delay) = args.delay_ms {
        config = config.with_delay(delay);
    }
    timer.set_config(config).context("invalid measurement config")?;
    timer.reset();

    let work = Duration::from_micros(args.frame_work_us);
    log::info!(
        "running {} frames of {} µs work, window {}",
        args.frames, args.frame_work_us, args.window,
    );

    for _ in 0..args.frames {
        spin_for(work);
        timer.tick();
    }

    let last = timer.current_result();
    log::info!("{}", timer.debug_info());
    println!(
        "last window: {:.1} fps, {:.3} ms/frame ({:?}), {} windows completed",
        last.frames_per_second,
        last.millis_per_frame,
        last.kind,
        timer.windows_completed(),
    );

    Ok(())
}

fn workload(label: &str, f: impl FnMut() + 'static) -> NamedCallable<Box<dyn FnMut()>> {
    NamedCallable::new(label, Box::new(f))
}

/// Busy-waits so the simulated frame holds the thread like real work would.
fn spin_for(work: Duration) {
    let start = Instant::now();
    while start.elapsed() < work {
        std::hint::spin_loop();
    }
}
