//! Logging configuration
//!
//! Diagnostics go to stderr so that stdout carries nothing but the
//! account CSV.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "warn";

/// Initialize the global tracing subscriber
///
/// Log levels are configurable via the `RUST_LOG` env var, defaulting to
/// [`DEFAULT_FILTER`]. Calling this twice panics, as with any global
/// subscriber.
///
/// # Example
///
/// ```no_run
/// player_ledger::logging::init();
/// tracing::warn!("shown on stderr");
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
