// ABOUTME: Tracing subscriber setup for the springer-doi binary.
// ABOUTME: Honors RUST_LOG, otherwise picks a level from the -v count.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Map `-v` repetitions to a default filter directive.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a stderr fmt subscriber.
///
/// `RUST_LOG` wins over the verbosity flag when it is set and valid.
pub fn init_logging(verbose: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}
