//! Logging initialization.
//!
//! Builds a `tracing-subscriber` stack from the CLI verbosity count.
//! `RUST_LOG` takes precedence over the `-v` flags when set.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Verbosity mapping: 0 = warn, 1 = info, 2 = debug, 3+ = trace.
pub fn init(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("toastline={0},toastline_core={0}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
