//! Tracing initialization and subscriber setup.
//!
//! This module configures the tracing subscriber: an environment filter, a
//! human-readable layer on stdout and, when a log file is configured, a second
//! plain-text layer writing through [`RotatingFileWriter`].

use super::file_writer::RotatingFileWriter;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` if set and valid
/// 2. `config.log_level`
///
/// # Initialization Behavior
///
/// - Creates the log file's directory if it doesn't exist; if that fails the
///   file layer is skipped and stdout logging still works
/// - Idempotent: safe to call multiple times (only the first call takes effect)
///
/// # Example
///
/// ```rust
/// use tagsync::observability::init_tracing;
/// use tagsync::Config;
///
/// let config = Config {
///     log_level: "debug".to_string(),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let file_layer = config.log_file.as_ref().and_then(|path| {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("log directory {} unavailable: {e}", parent.display());
                return None;
            }
        }
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_thread_names(true)
                .with_writer(RotatingFileWriter::new(path)),
        )
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_thread_names(true))
        .with(file_layer);

    let _ = subscriber.try_init();
}
