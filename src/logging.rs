//! Logging init: stderr with an env-driven filter.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,audio_downloader=debug";

/// Initialize structured logging. Honors `RUST_LOG` when set.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
