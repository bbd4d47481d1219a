//! File logging for the portal.
//!
//! Logs go to a daily-rolling file under the data directory so the
//! terminal stays clean while ratatui owns it. The filter defaults to the
//! given level for our crates and warn for everything else; `RUST_LOG`
//! overrides both.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging. The returned guard must be held for the lifetime
/// of the application or buffered log lines are lost on exit.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<WorkerGuard> {
    std::fs::create_dir_all(data_dir)?;

    let file_appender = tracing_appender::rolling::daily(data_dir, "teller.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let default_filter = format!("teller={level},teller_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    tracing::info!(data_dir = %data_dir.display(), "teller logging initialized");
    Ok(guard)
}
