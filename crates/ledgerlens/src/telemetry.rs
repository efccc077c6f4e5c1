//! Tracing initialization for the LedgerLens binary
//!
//! Env-filtered fmt subscriber to stderr. `RUST_LOG` wins when set;
//! otherwise the service crates log at info, or debug with `--verbose`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str =
    "ledgerlens=info,ledgerlens_extract=info,ledgerlens_vision=info";

/// Initialize the global subscriber. Call once, before serving.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}
