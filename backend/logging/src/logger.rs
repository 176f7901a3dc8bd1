//! Structured Logger
//!
//! Wraps `tracing` with console output (plain or JSON), optional daily-rolling
//! NDJSON files, and environment-based level control.

use std::path::Path;
use tracing::warn;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Base name of rolled log files: `haute.log.YYYY-MM-DD`.
const LOG_FILE_PREFIX: &str = "haute.log";

/// Initialize the global structured logger.
///
/// `RUST_LOG` takes precedence over `level`. Console logs go to stderr so that
/// command output on stdout stays machine-readable. Calling this twice is a no-op.
///
/// A log directory that cannot be created leaves file logging off; the failure
/// is reported through the console logger.
pub fn init_logger(level: &str, log_dir: Option<&Path>, json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let json_console = json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let plain_console = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
    });

    let mut file_error = None;
    let file_layer = match log_dir.map(file_appender) {
        Some(Ok(appender)) => Some(
            fmt::layer()
                .json()
                .with_writer(appender)
                .with_ansi(false),
        ),
        Some(Err(e)) => {
            file_error = Some(e);
            None
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_console)
        .with(plain_console)
        .with(file_layer)
        .try_init();

    if let (Some(dir), Some(e)) = (log_dir, file_error) {
        warn!(dir = %dir.display(), error = %e, "File logging disabled");
    }
}

/// Daily-rolling appender under `dir`, creating the directory if needed.
pub fn file_appender(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(dir)
}
