//! Logging initialization for logroute-daemon.
//!
//! Configures `tracing-subscriber` from the `[general]` section of
//! `Settings`: the level feeds an `EnvFilter` (overridable via `RUST_LOG`)
//! and the format selects JSON lines or human-readable pretty output.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use logroute_core::settings::GeneralSettings;

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
/// `RUST_LOG` takes precedence over the configured log level.
pub fn init_tracing(general: &GeneralSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&general.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    let init_result = match general.log_format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        "pretty" => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        other => {
            return Err(anyhow!(
                "unknown log format '{other}', expected 'json' or 'pretty'"
            ));
        }
    };

    init_result.map_err(|e| anyhow!("failed to initialize tracing subscriber: {e}"))
}
