//! Tracing setup.
//!
//! Logs always go to a file under the logs directory; the terminal belongs to
//! the chat UI. Non-interactive commands may also log to stderr.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{Error, Result};

/// Builds the filter from `RUST_LOG`, falling back to `sales_assistant=<level>`.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sales_assistant={}", level)))
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// lifetime of the process or buffered lines are lost.
pub fn init_logging(
    log_dir: &Path,
    file_name: &str,
    level: &str,
    to_stderr: bool,
) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = to_stderr.then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| Error::platform(format!("Failed to install log subscriber: {}", e)))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_uses_level() {
        if std::env::var("RUST_LOG").is_err() {
            let filter = build_filter("debug");
            assert!(filter.to_string().contains("sales_assistant=debug"));
        }
    }
}
