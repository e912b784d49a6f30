//! Tracing subscriber setup for hosts embedding the engine.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the host binary.

use std::sync::OnceLock;

use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILTER_ENV: &str = "HEXSESSION_LOG";

/// Installs a stderr `fmt` subscriber filtered by `HEXSESSION_LOG`, falling
/// back to `default_directive`.
///
/// Returns `false` when a global subscriber was already installed by someone
/// else; that subscriber is kept. Later calls return the first call's result.
pub fn init_logging(default_directive: &str) -> bool {
    static INSTALLED: OnceLock<bool> = OnceLock::new();
    *INSTALLED.get_or_init(|| {
        let filter = build_filter(std::env::var(LOG_FILTER_ENV).ok().as_deref(), default_directive);
        match fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
        {
            Ok(()) => true,
            Err(error) => {
                debug!(%error, "keeping existing tracing subscriber");
                false
            }
        }
    })
}

fn build_filter(configured: Option<&str>, default_directive: &str) -> EnvFilter {
    configured
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive))
}

#[cfg(test)]
mod tests {
    use super::{build_filter, init_logging};

    #[test]
    fn blank_filter_uses_default_directive() {
        let filter = build_filter(Some("  "), "warn");
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn configured_filter_wins() {
        let filter = build_filter(Some("hexsession=debug"), "warn");
        assert_eq!(filter.to_string(), "hexsession=debug");
    }

    #[test]
    fn init_reports_kept_subscriber_and_is_idempotent() {
        let subscriber = tracing_subscriber::fmt().with_writer(std::io::sink).finish();
        let _ = tracing::subscriber::set_global_default(subscriber);

        assert!(!init_logging("off"));
        assert!(!init_logging("debug"));
    }
}
