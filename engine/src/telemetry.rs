//! Structured logging setup.
//!
//! A `RUST_LOG` environment filter wins over the configured level.
//! Debug builds log pretty terminal output; release builds log JSON.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber at the given level.
///
/// Called once at startup, after the configuration is loaded.
pub fn init_telemetry(log_level: &str) {
    let default_filter = format!("{log_level},triage_engine={log_level}");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));
    let registry = tracing_subscriber::registry().with(filter);

    #[cfg(debug_assertions)]
    registry
        .with(fmt::layer().pretty().with_target(false))
        .init();

    #[cfg(not(debug_assertions))]
    registry
        .with(fmt::layer().json().with_current_span(true))
        .init();
}
