//! Logging initialization
//!
//! Sets up the tracing subscriber with env-based filtering and local-timezone
//! timestamps on every record.

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// Filtering comes from `RUST_LOG` when set. Repeated calls are no-ops, so
/// host applications and tests can call this unconditionally.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gembridge=debug"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f %:z".to_string())),
        )
        .try_init();
}
