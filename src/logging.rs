//! Structured logging via `tracing`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber: human-readable console output with
/// uptime timestamps and module paths.
///
/// `RUST_LOG` takes precedence over `level`; an empty `level` means
/// [`DEFAULT_FILTER`]. Calling this twice is harmless, the second call is
/// ignored.
pub fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(level));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    // Fails only if a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}

fn filter_for(level: &str) -> EnvFilter {
    if level.trim().is_empty() {
        EnvFilter::new(DEFAULT_FILTER)
    } else {
        EnvFilter::new(level)
    }
}
