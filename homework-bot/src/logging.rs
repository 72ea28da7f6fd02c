use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Map a configured level onto a known one, falling back to `info`.
fn normalize_level(level: &str) -> (&'static str, bool) {
    match LEVELS.iter().find(|known| known.eq_ignore_ascii_case(level)) {
        Some(known) => (*known, true),
        None => ("info", false),
    }
}

/// Log to stdout and to `<log_dir>/<prefix>.log`. The file is appended to and
/// never rotated. `RUST_LOG` refines the configured level.
pub fn init_logging(log_dir: impl AsRef<Path>, prefix: &str, level: &str) -> anyhow::Result<LoggerGuard> {
    let log_dir = log_dir.as_ref().to_path_buf();
    let (normalized, valid) = normalize_level(level);

    let builder = EnvFilter::builder()
        .with_default_directive(normalized.parse().context("Invalid log level directive")?);

    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(&log_dir)
        .with_context(|| format!("Failed to create log file in '{}'", log_dir.display()))?;
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if !valid {
        tracing::warn!("Invalid log level '{}', defaulting to 'info'", level);
    }

    Ok(LoggerGuard(guard))
}
