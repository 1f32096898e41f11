//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the global tracing subscriber.
///
/// Reads `THRESHOLD_LOG` for directives, e.g.
/// `THRESHOLD_LOG=threshold_server=debug,threshold_github=trace`.
/// Falls back to `info` for the threshold crates, or `debug` when `verbose`.
/// Calling it more than once has no effect.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose {
            "threshold=debug,threshold_core=debug,threshold_github=debug,threshold_server=debug"
        } else {
            "threshold=info,threshold_core=info,threshold_github=info,threshold_server=info"
        };
        let filter =
            EnvFilter::try_from_env("THRESHOLD_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
