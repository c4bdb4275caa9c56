//! Log output for timer hosts.
//!
//! `FrameTimer` reports through the `log` facade: window results at `debug`,
//! benchmark summaries at `trace`, degenerate windows at `warn`. Hosts that do
//! not install their own logger call [`init_logging`] once at startup, as
//! `kairo-bench` does, to route those records to stderr with microsecond
//! timestamps.

mod init;

pub use init::{LoggingConfig, init_logging};
