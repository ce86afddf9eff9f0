//! Tracing setup: a console layer on stderr plus a debug log file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Installs the global subscriber.
///
/// The console shows `info` (or `debug` with `debug = true`), overridable
/// through `RUST_LOG`. Everything at `debug` and above is appended to
/// `log_file`; if the file cannot be opened only the console is used.
pub fn init(debug: bool, log_file: &Path) {
    let default_level = if debug { "debug" } else { "info" };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let file = match open_log_file(log_file) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("could not open log file {}: {e}", log_file.display());
            None
        }
    };
    let file_layer = file.map(|file| {
        fmt::layer()
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .with_filter(LevelFilter::DEBUG)
    });

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();

    tracing::debug!(log_file = %log_file.display(), "logging initialized");
}

fn open_log_file(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
