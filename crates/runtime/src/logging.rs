//! Log subscriber setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::LoggingError;

/// Filter used when neither an explicit filter nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a `fmt` subscriber filtered by `filter`, `RUST_LOG`, or
/// [`DEFAULT_FILTER`], in that order.
///
/// Hosts that already own a subscriber get an error back instead of a panic;
/// dual-wield events then flow into theirs.
pub fn init(filter: Option<&str>) -> Result<(), LoggingError> {
    let env_filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;

    tracing::info!(target: "dualwield::config", "Logging initialized");
    Ok(())
}
