use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Target prefix of every event this crate emits
const REPORT_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Build the level filter: `RUST_LOG` when set, otherwise debug or info.
fn build_env_filter(debug_mode: bool) -> EnvFilter {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    report_filter(&directives, debug_mode)
}

/// Parse `directives`, keeping this crate at info (or debug) unless the
/// directives name it explicitly. The operator reports ride on these events.
fn report_filter(directives: &str, debug_mode: bool) -> EnvFilter {
    let level = if debug_mode { "debug" } else { "info" };
    let mut parts: Vec<String> = directives
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect();

    if parts.is_empty() {
        parts.push(level.to_string());
    }
    if !directives.contains(REPORT_TARGET) {
        parts.push(format!("{}={}", REPORT_TARGET, level));
    }

    EnvFilter::builder().parse_lossy(parts.join(","))
}

/// Setup logging with a daily rotating file and optional console output.
///
/// The console layer is the operator's report stream: fetch progress,
/// cleaner output and cleaning results all go through it.
///
/// # Arguments
/// * `log_dir` - Directory for log files (created if missing)
/// * `log_prefix` - Prefix for log files (e.g., "omw-cleaner")
/// * `debug_mode` - If true, use debug level; otherwise use info level
/// * `console_output` - If true, also log to the terminal
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active
pub fn setup_logging(
    log_dir: &Utf8Path,
    log_prefix: &str,
    debug_mode: bool,
    console_output: bool,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }

    let file_appender = rolling::daily(log_dir, log_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let console_layer = console_output.then(|| {
        tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(build_env_filter(debug_mode))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}",
        log_dir,
        log_prefix,
        debug_mode,
        console_output
    );

    Ok(guard)
}
