//! Structured logging for rootfw.
//!
//! Wraps `tracing-subscriber`: console output with uptime timestamps and
//! module paths, optional JSON file output, and filtering driven by
//! `RUST_LOG` or the config's `debug.log_level`.

use rootfw_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";
const LOG_FILE: &str = "rootfw.log";

/// Filter string taken from the config, or the default when unset.
pub fn filter_string(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the config level. When `log_dir` is
/// given, a JSON log file is written there as well. Calling this twice is
/// harmless: the second attempt is ignored.
///
/// ```no_run
/// use rootfw_log::init_logging;
/// use rootfw_config::Config;
///
/// let config = Config::default();
/// init_logging(None, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, config: Option<&Config>) {
    let filter_str = filter_string(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        let _ = subscriber.with(file_layer).try_init();
        return;
    }

    let _ = subscriber.try_init();
}

/// `EnvFilter` with the default filter string, for tests and tools.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
