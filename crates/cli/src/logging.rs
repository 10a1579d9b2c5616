//! Logging setup for s3up CLI

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialize tracing on stderr.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown, or debug
/// output from s3up when `verbose` is set. Stdout is reserved for the URL.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "warn,s3up=debug,s3up_core=debug"
    } else {
        "warn"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(())
}
