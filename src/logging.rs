//! Logging initialization.
//!
//! Diagnostics go to stderr so they never mix with shell output on stdout.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "git_trainer=warn";

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber. Later calls are no-ops.
///
/// The filter comes from `RUST_LOG` when set, else from `configured`
/// (the config file's `log-filter`), else [`DEFAULT_FILTER`].
pub fn init(configured: Option<&str>) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(configured));

        // Another subscriber may already be installed (tests); keep it.
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .try_init();
    });
}

fn filter_for(configured: Option<&str>) -> EnvFilter {
    configured
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
