//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::Verbosity;

/// Build the log filter; `RUST_LOG` wins over the verbosity flags
#[must_use]
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_level()))
}

/// Install the global fmt subscriber writing to stderr
///
/// A second call is a no-op.
pub fn init_tracing(verbosity: Verbosity, use_color: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_ansi(use_color)
        .with_target(false)
        .try_init();
}
