use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::formatter::BracketedFormatter;
use crate::config::AppConfig;

/// Install the global subscriber for a command-line tool.
///
/// Events go to stderr and to `<app_name>_<timestamp>.log` under
/// `AppConfig::get_log_dir()`. Stdout stays free for the tool's report. If the
/// log file cannot be created, logging continues on stderr only.
///
/// Returns the log file path when one was created.
pub fn setup_logging(app_name: &str) -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(std::io::stderr);

    let (log_path, file_layer, open_error) = match open_log_file(app_name) {
        Ok((path, file)) => {
            let layer = fmt::layer()
                .event_format(BracketedFormatter)
                .with_writer(Mutex::new(file))
                .with_ansi(false);
            (Some(path), Some(layer), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    match (&log_path, open_error) {
        (Some(path), _) => info!("Log file created at: {:?}", path),
        (None, Some(e)) => warn!("Could not create log file, logging to stderr only: {}", e),
        (None, None) => {}
    }

    log_path
}

fn open_log_file(app_name: &str) -> std::io::Result<(PathBuf, File)> {
    let log_dir = AppConfig::get_log_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no home directory for the log files",
        )
    })?;
    fs::create_dir_all(&log_dir)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("{}_{}.log", app_name, timestamp));

    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)?;

    Ok((log_path, file))
}
