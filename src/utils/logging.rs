use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_appender::non_blocking::WorkerGuard;
use anyhow::Result;

/// Builds the log file name for today, `door-panels_{YYYY-MM-DD}.log`
pub fn log_file_name() -> String {
    format!("door-panels_{}.log", chrono::Local::now().format("%Y-%m-%d"))
}

/// Initializes the logging system for the application
///
/// Console output is always enabled. When `log_file_path` is set, events are also written through a
/// non-blocking appender to `door-panels_{current_date}.log` in that directory.
/// The level comes from `RUST_LOG`, falling back to `default_level` with `sqlx` held at "warn".
/// Records emitted through the `log` facade are bridged into the same subscriber.
///
/// # Arguments
///
/// * `log_file_path`: An optional directory where the log file should be created
/// * `default_level`: The filter used when `RUST_LOG` is not set (e.g. "info")
///
/// # Returns
///
/// * `Ok(Some(WorkerGuard))`: File logging is active; keep the guard alive to flush on shutdown
/// * `Ok(None)`: Console only
/// * `Err(anyhow::Error)`: If the filter is invalid, the directory cannot be created or a subscriber is already set
pub fn init_logger(log_file_path: Option<PathBuf>, default_level: &str) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{},sqlx=warn", default_level)))?;

    let format = fmt::format()
        .with_timer(fmt::time::LocalTime::rfc_3339())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    let console_layer = fmt::Layer::default()
        .event_format(format.clone().with_ansi(true))
        .with_writer(std::io::stdout);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(path) = log_file_path {
        std::fs::create_dir_all(&path)?;

        let file_appender = RollingFileAppender::new(Rotation::NEVER, &path, log_file_name());
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = fmt::Layer::default()
            .event_format(format)
            .with_writer(non_blocking);

        subscriber.with(file_layer).try_init()?;

        tracing::info!("Logging initialized successfully ({})", path.join(log_file_name()).display());
        Ok(Some(guard))
    } else {
        subscriber.try_init()?;

        tracing::info!("Logging initialized successfully (console only)");
        Ok(None)
    }
}
