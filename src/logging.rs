// Log setup: stdout plus an append-only log file
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEFAULT_FILTER: &str = "thresholdbot=info";

/// Keeps the file writer alive; dropping it flushes and stops file logging
pub struct LogGuard {
    _file_guard: WorkerGuard,
}

/// Never-rotating appender that adds to `log_file` without truncating it
pub fn file_appender(log_file: &Path) -> RollingFileAppender {
    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "trading_bot.log".into());

    tracing_appender::rolling::never(directory, file_name)
}

/// One plain `timestamp LEVEL message` line per event
pub fn file_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
}

/// Install the global subscriber
///
/// Each event is written to stdout and appended to `log_file`.
/// `RUST_LOG` overrides the default filter.
pub fn init_logging(log_file: &Path) -> LogGuard {
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender(log_file));

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stdout_layer = fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer(file_writer))
        .init();

    LogGuard {
        _file_guard: file_guard,
    }
}
