pub mod config;
pub mod error;

pub use config::{
    Config, FixedLocation, LocationConfig, SearchConfig, ServiceConfig, TemperatureUnit,
    UiConfig, ValidationResult,
};
pub use error::{
    AppError, ConfigError, LocationError, NetworkError, ReqwestErrorExt, StorageError,
    WeatherError, FETCH_FAILED_MESSAGE,
};

use anyhow::Result;

/// Default log filter for the interactive dashboard.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Initialize the core application (logging).
///
/// Logs go to stderr so the dashboard rendered on stdout stays readable.
pub fn init() -> Result<()> {
    init_with_filter(DEFAULT_LOG_FILTER)
}

/// Initialize logging with a fallback filter used when `RUST_LOG` is unset.
pub fn init_with_filter(default_filter: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("Nimbus core initialized");
    Ok(())
}
