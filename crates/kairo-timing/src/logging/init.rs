use std::sync::Once;

use log::LevelFilter;

/// Logger setup for a timer host.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter such as `"kairo_timing=debug"`. Takes precedence
    /// over `RUST_LOG`.
    pub env_filter: Option<String>,
    /// Level used when neither `env_filter` nor `RUST_LOG` is set.
    pub fallback_level: LevelFilter,
    /// Stamp records with microsecond timestamps, matching the resolution
    /// measurements are taken at.
    pub micros_timestamps: bool,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            fallback_level: LevelFilter::Info,
            micros_timestamps: true,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Default setup with an explicit filter.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }

    fn builder(&self) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();

        match self.env_filter.clone().or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => builder.parse_filters(&filter),
            None => builder.filter_level(self.fallback_level),
        };

        if self.micros_timestamps {
            builder.format_timestamp_micros();
        }
        builder.write_style(self.write_style);
        builder
    }
}

static INIT: Once = Once::new();

/// Installs the `env_logger` backend once per process.
///
/// Later calls are no-ops. If the host already installed another logger, that
/// logger is left in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        if config.builder().try_init().is_ok() {
            log::debug!("logging initialized: {config:?}");
        }
    });
}
