//! Tracing setup.

use crate::config::DEFAULT_LOG_FILTER;
use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber so prompts on stdout stay clean.
///
/// `RUST_LOG` wins over `configured`, which wins over the default filter.
pub fn init_tracing(configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        configured
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
    });

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
