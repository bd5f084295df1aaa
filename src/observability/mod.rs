//! Observability for lessonhub
//!
//! - `tracing` events with structured fields everywhere
//! - one subscriber installed at startup, filtered by `RUST_LOG`
//! - one log line per HTTP request/response pair
//!
//! # Usage
//!
//! ```ignore
//! use lessonhub::observability::init_tracing;
//!
//! init_tracing();
//! tracing::info!(port = 3000, "Listening");
//! ```

mod request_log;

pub use request_log::log_request;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Install the global fmt subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init();
}
