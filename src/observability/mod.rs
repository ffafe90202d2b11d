//! Logging setup for the `surveymap` binary.
//!
//! The library only emits `tracing` events (and `log` records from the config
//! loader); installing a subscriber is left to the binary.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static LOGGING_INITIALIZED: OnceLock<bool> = OnceLock::new();

/// Default filter directive for a `-v` count.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber once. `RUST_LOG` overrides `verbosity`.
///
/// Events go to stderr so report output on stdout stays machine-readable.
pub fn init_logging(verbosity: u8) {
    LOGGING_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .is_ok()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(9), "trace");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_logging(1);
        init_logging(3);
        assert!(LOGGING_INITIALIZED.get().is_some());
    }
}
