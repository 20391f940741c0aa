use crate::cli::Args;
use crate::config::Config;
use crate::constants::{APP_DIR_NAME, LOG_FILE_NAME};
use crate::error::AppError;
use std::io::stdout;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Builds the log filter: `RUST_LOG` if set, plus `metro_rti=info`
fn log_filter() -> Result<EnvFilter, AppError> {
    let directive = format!("{APP_DIR_NAME}=info")
        .parse()
        .map_err(|e| AppError::log_setup_error(format!("Invalid log directive: {e}")))?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Splits the configured log file path into directory and file name
pub fn resolve_log_location(args: &Args, config: &Config) -> (String, String) {
    let custom_log_path = args.log_file.as_ref().or(config.log_file_path.as_ref());
    match custom_log_path {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let parent = path.parent().unwrap_or(Path::new("."));
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(LOG_FILE_NAME);
            (parent.to_string_lossy().to_string(), file_name.to_string())
        }
        None => (Config::get_log_dir_path(), LOG_FILE_NAME.to_string()),
    }
}

/// Sets up logging configuration for the application.
///
/// Configures logging based on the provided arguments and config:
/// - Board mode: logs only to file, the terminal belongs to the board
/// - One-shot commands without debug: logs only to file
/// - One-shot commands with debug: logs to both stdout and file
/// - Creates log directory if it doesn't exist
/// - Uses daily rolling file appender
///
/// Returns the path to the log file and the guard that must be kept alive
/// for the duration of the program to ensure proper log flushing.
pub async fn setup_logging(args: &Args, config: &Config) -> Result<(String, WorkerGuard), AppError> {
    let (log_dir, log_file_name) = resolve_log_location(args, config);

    // Create log directory if it doesn't exist
    if !Path::new(&log_dir).exists() {
        tokio::fs::create_dir_all(&log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    // Set up a rolling file appender that creates a new log file each day
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);

    // The guard must be kept alive for the duration of the program
    // to ensure logs are flushed properly
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(log_filter()?);

    // One-shot commands with --debug also log to stdout
    let to_stdout = crate::cli::is_noninteractive_mode(args) && args.debug;
    let stdout_filter = log_filter()?;
    let stdout_layer = to_stdout.then(|| {
        fmt::Layer::new()
            .with_writer(stdout)
            .with_ansi(true)
            .with_filter(stdout_filter)
    });

    let result = tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init();
    result.map_err(|e| AppError::log_setup_error(format!("Failed to install logger: {e}")))?;

    let log_file_path = format!("{log_dir}/{log_file_name}");
    Ok((log_file_path, guard))
}
