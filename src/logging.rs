//! Structured logging using the tracing crate.
//!
//! Logs go to stderr so they never pollute piped stdout. Without `-D` only
//! warnings are shown (format mismatches must stay visible); with `-D` the
//! per-step debug messages appear too. `RUST_LOG` overrides both.

use tracing_subscriber::prelude::*;

/// Initializes console logging.
///
/// # Errors
/// - If the subscriber is initialized twice
pub fn init_logging(debug: bool) -> Result<(), anyhow::Error> {
    let default_filter = if debug { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    tracing::debug!("logging initialized");
    Ok(())
}
