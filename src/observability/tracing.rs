//! Structured diagnostics setup.
//!
//! Log records go to stderr. `OSORT_LOG` takes an `EnvFilter` directive
//! (`OSORT_LOG=osort=debug`); without it the level comes from the
//! `-v`/`-q` flags.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable holding a filter directive.
pub const LOG_ENV_VAR: &str = "OSORT_LOG";

/// Filter directive for a `-v` count, or `-q`.
#[must_use]
pub fn level_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing(verbosity: u8, quiet: bool, ansi: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(level_directive(verbosity, quiet)));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .with_level(true)
        .with_ansi(ansi)
        .without_time()
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(layer).try_init();
}
