//! Telemetry initialization: tracing with an env-filtered fmt subscriber.
//!
//! Verbosity is controlled via `RUST_LOG` (defaults to `info`), e.g.
//!
//! ```bash
//! RUST_LOG=leadctl=debug,tower_http=debug leadctl
//! ```

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the tracing subscriber for the process.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    info!("Telemetry initialized");
    Ok(())
}
