//! Tracing setup for the `askrepo` binary.
//!
//! Spans and events cover the session stages: project scan (`scan_project`),
//! each selection attempt and its rejected problems (`plan`), file reads and
//! skips, service requests with their status, and the final session stop.
//! At the default `warn` level only retries, skipped files, failed service
//! calls, missing credentials and non-converging sessions are shown.
//!
//! Progress lines and the answer are plain stdout output from `main` and do
//! not depend on `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr subscriber, filtered by `RUST_LOG` (default `warn`).
///
/// `RUST_LOG=askrepo=debug` also shows accepted selections, byte counts of
/// fetched files and the service endpoint.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
