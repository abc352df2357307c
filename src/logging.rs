use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes logging with a daily JSON file under `log_dir` and a console
/// layer on stderr, keeping stdout for the import report.
///
/// The returned guard must be held until exit so buffered lines are flushed.
pub fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kuma_import=info,warn"));

    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    // Fall back to console-only logging when the directory can't be created
    if let Err(e) = fs::create_dir_all(log_dir) {
        tracing_subscriber::registry().with(env_filter).with(console_layer).init();
        tracing::warn!("File logging disabled, cannot create {}: {}", log_dir.display(), e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, "kuma-import.log");
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer().json().with_writer(non_blocking_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Some(guard)
}
