//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log filter:
//! 1. `RUST_LOG` environment variable (any `EnvFilter` directive)
//! 2. `-q` / `-v` / `-vv` on the command line
//! 3. default to `info`
//!
//! Informational progress goes out at `info`, diagnostics (executed
//! commands, PIDs, removed files) at `debug`. Logs are sent to STDERR so
//! that stdout only carries prompts and results.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(verbosity: u8, quiet: bool) -> Result<()> {
    let level = level_for(verbosity, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    fmt()
        .with_env_filter(filter)
        .with_target(verbosity > 0)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}

fn level_for(verbosity: u8, quiet: bool) -> tracing::Level {
    if quiet {
        return tracing::Level::WARN;
    }
    match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}
