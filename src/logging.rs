//! Tracing subscriber setup shared by the CLI and embedding applications.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,destination_gallery=debug";

/// Install a formatted tracing subscriber writing to stderr.
///
/// The filter is read from `RUST_LOG` and defaults to `info,destination_gallery=debug`. Calling
/// this more than once, or after another global subscriber was set, is a no-op.
pub fn init_tracing() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    });
}
