#![forbid(unsafe_code)]

//! Structured log output for hosts that want it.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! host's call. With the `tracing-json` feature this module offers a JSON
//! subscriber on stderr, filtered by `VOICENAV_LOG` (falling back to
//! `RUST_LOG`, then `info`).

/// Env var holding `EnvFilter` directives, e.g. `voicenav_runtime=debug`.
pub const ENV_LOG: &str = "VOICENAV_LOG";

#[cfg(feature = "tracing-json")]
mod json {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::util::TryInitError;

    use super::ENV_LOG;

    /// Build the filter from `VOICENAV_LOG`, then `RUST_LOG`, then `info`.
    #[must_use]
    pub fn env_filter() -> EnvFilter {
        EnvFilter::try_from_env(ENV_LOG)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    /// Install a global JSON subscriber writing to stderr.
    ///
    /// Returns an error if a global subscriber is already set.
    pub fn init_json() -> Result<(), TryInitError> {
        let layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(false);
        tracing_subscriber::registry()
            .with(env_filter())
            .with(layer)
            .try_init()
    }
}

#[cfg(feature = "tracing-json")]
pub use json::{env_filter, init_json};
