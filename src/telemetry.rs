//! Tracing subscriber setup

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LoggingConfig;

/// Install the global subscriber; `RUST_LOG` overrides the configured level
pub fn init(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match logging.format.as_str() {
        "json" => registry.with(fmt::layer().json()).try_init(),
        _ => registry.with(fmt::layer().with_target(true)).try_init(),
    };

    result.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}
