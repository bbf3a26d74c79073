use std::io;
use std::str::FromStr;

use tracing::Level;
use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config_loader::LoggingSection;

/// Initialise tracing from the logging section of the config
pub fn init_from_config(app_name: &str, logging: &LoggingSection) -> WorkerGuard {
    init(app_name, &logging.dir, parse_level(&logging.level), logging.stderr)
}

/// Parse a level name, falling back to INFO
pub fn parse_level(level: &str) -> Level {
    Level::from_str(level.trim()).unwrap_or(Level::INFO)
}

/// Hourly rolling log file behind a background writer thread
fn file_writer(app_name: &str, log_dir: &str) -> (NonBlocking, WorkerGuard) {
    let _ = std::fs::create_dir_all(log_dir);

    let file_appender = tracing_appender::rolling::hourly(log_dir, format!("{app_name}.log"));
    tracing_appender::non_blocking(file_appender)
}

/// Initialise tracing with a non-blocking file appender, optionally mirrored to stderr
///
/// `RUST_LOG` takes precedence over `default_level`. stdout is never written so
/// the JSON result can be piped.
pub fn init(app_name: &str, log_dir: &str, default_level: Level, mirror_stderr: bool) -> WorkerGuard {
    let (writer, guard) = file_writer(app_name, log_dir);

    let env_filter = EnvFilter::builder().with_default_directive(default_level.into()).from_env_lossy();

    let file_layer = fmt::layer().with_writer(writer).with_target(true).with_thread_ids(true).with_line_number(true).with_ansi(false).compact();
    let stderr_layer =
        mirror_stderr.then(|| fmt::layer().with_writer(io::stderr).with_target(true).with_line_number(true).with_ansi(true).compact());

    tracing_subscriber::registry().with(env_filter).with(file_layer).with(stderr_layer).init();

    guard
}
