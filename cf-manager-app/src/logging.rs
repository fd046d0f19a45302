//! 日志初始化
//!
//! Library crates log through the `log` facade; the subscriber installed here
//! also receives those records through the `tracing-log` bridge.

use cf_manager_core::error::{CoreError, CoreResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};

/// Builds the filter: `RUST_LOG` wins over the configured level.
pub fn build_filter(config: &LoggingConfig) -> CoreResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| {
        CoreError::ConfigError(format!("Invalid log level '{}': {e}", config.level))
    })
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> CoreResult<()> {
    let filter = build_filter(config)?;

    let layer = match config.format {
        LogFormat::Text => fmt::layer().with_target(true).boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| CoreError::ConfigError(format!("Failed to install logger: {e}")))?;

    tracing::info!(format = ?config.format, "Logging initialized");
    Ok(())
}
