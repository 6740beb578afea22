//! Structured logging for the exchange services.
//!
//! The filter comes from `RUST_LOG` when set, otherwise from the configured
//! default level. Output is either human-readable or one JSON object per line.

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize human-readable logging at `info` unless `RUST_LOG` says otherwise.
///
/// # Example
/// ```no_run
/// use exchange_core::logging;
///
/// logging::init();
/// tracing::info!("clock started");
/// ```
pub fn init() {
    init_with(&LoggingConfig::default());
}

/// Initialize logging from the `[logging]` section of the config.
///
/// Calling this twice in one process is a no-op for the second call.
pub fn init_with(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(filter(&config.level));

    let result = if config.json {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!("logging already initialised: {}", e);
    }
}
