//! File logging for the widget CLI.
//!
//! Hosts run the binary from schedulers where stderr goes nowhere, so events
//! are written to a daily-rolling file under `~/.pet-widget/logs/`. Set
//! `PET_WIDGET_DEBUG_LOG=1` to raise the level to debug; otherwise `RUST_LOG`
//! applies, defaulting to info.

use std::env;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "pet-widget.log";

/// Installs the global subscriber. Keep the returned guard alive until exit
/// or buffered events are lost.
pub fn init(logs_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = build_filter(env::var("PET_WIDGET_DEBUG_LOG").ok().as_deref());

    let Some(logs_dir) = logs_dir else {
        init_stderr(filter);
        return None;
    };

    if let Err(e) = fs_err::create_dir_all(logs_dir) {
        init_stderr(filter);
        tracing::warn!(error = %e, "Log directory unavailable, logging to stderr");
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(false)
        .with_writer(writer)
        .try_init();

    installed.ok().map(|_| guard)
}

fn init_stderr(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_filter(debug_flag: Option<&str>) -> EnvFilter {
    if is_debug_enabled(debug_flag) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn is_debug_enabled(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "TRUE" | "yes" | "YES"))
}
