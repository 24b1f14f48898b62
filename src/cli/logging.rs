//! Tracing setup
//!
//! Diagnostics go to stderr so they never mix with command output.
//! `RUST_LOG` wins over `--verbose`, which wins over the configured level.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init(verbose: bool, configured: Option<Level>) {
    let level = if verbose {
        Level::DEBUG
    } else {
        configured.unwrap_or(Level::WARN)
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    // Ignore error if a global subscriber is already set (e.g., when running in tests)
    let _ = tracing::subscriber::set_global_default(subscriber);
}
