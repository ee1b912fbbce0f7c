use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory (also holds the local state file)
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Remote service endpoints
    #[serde(default)]
    pub services: ServiceConfig,

    /// Display preferences
    #[serde(default)]
    pub ui: UiConfig,

    /// Autocomplete settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Device location settings
    #[serde(default)]
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the NWS API
    pub weather_api_url: String,

    /// Base URL of the Nominatim geocoder
    pub geocoding_api_url: String,

    /// User-Agent sent with every request. NWS refuses requests without one.
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            weather_api_url: "https://api.weather.gov".to_string(),
            geocoding_api_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: format!("nimbus/{} (terminal weather dashboard)", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Temperature unit for display, also the configured initial unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    /// Degree symbol with unit letter, e.g. "°F"
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Fahrenheit => "°F",
            Self::Celsius => "°C",
        }
    }

    /// The other unit
    pub fn toggled(self) -> Self {
        match self {
            Self::Fahrenheit => Self::Celsius,
            Self::Celsius => Self::Fahrenheit,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Dark mode; when unset the terminal background is detected
    #[serde(default)]
    pub dark_mode: Option<bool>,

    /// Initial temperature unit
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before an autocomplete request fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Shorter queries never hit the network
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
    /// Maximum number of suggestions
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Country filter passed to the geocoder
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_chars() -> usize {
    3
}

fn default_max_results() -> usize {
    5
}

fn default_country() -> String {
    "USA".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            max_results: default_max_results(),
            country: default_country(),
        }
    }
}

/// Coordinates used instead of the platform location service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Skip the platform location service and report these coordinates
    #[serde(default)]
    pub fixed: Option<FixedLocation>,

    /// How long to wait for a location fix
    #[serde(default = "default_geolocation_timeout_secs")]
    pub geolocation_timeout_secs: u64,
}

fn default_geolocation_timeout_secs() -> u64 {
    30
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            fixed: None,
            geolocation_timeout_secs: default_geolocation_timeout_secs(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nimbus")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            services: ServiceConfig::default(),
            ui: UiConfig::default(),
            search: SearchConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, writing defaults there if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let mut config = Self::default();
            if let Some(parent) = config_path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.services.weather_api_url,
            "services.weather_api_url",
            &mut result,
        );
        self.validate_url(
            &self.services.geocoding_api_url,
            "services.geocoding_api_url",
            &mut result,
        );

        if self.services.user_agent.trim().is_empty() {
            result.add_error(
                "services.user_agent",
                "User agent must not be empty (the weather API rejects anonymous requests)",
            );
        }

        if self.services.request_timeout_secs == 0 {
            result.add_warning(
                "services.request_timeout_secs",
                "Request timeout disabled (0 seconds); a hung request will never finish",
            );
        }

        if self.search.debounce_ms == 0 {
            result.add_warning(
                "search.debounce_ms",
                "Debounce disabled (0 ms); every edit will hit the geocoder",
            );
        } else if self.search.debounce_ms > 5000 {
            result.add_warning("search.debounce_ms", "Debounce is longer than 5 seconds");
        }

        if self.search.min_query_chars == 0 {
            result.add_error("search.min_query_chars", "Minimum query length must be at least 1");
        }

        if self.search.max_results == 0 {
            result.add_error("search.max_results", "Result limit must be greater than 0");
        } else if self.search.max_results > 50 {
            result.add_warning("search.max_results", "Nominatim caps results at 50");
        }

        if let Some(fixed) = &self.location.fixed {
            if !(-90.0..=90.0).contains(&fixed.latitude) {
                result.add_error("location.fixed.latitude", "Latitude must be within -90..=90");
            }
            if !(-180.0..=180.0).contains(&fixed.longitude) {
                result.add_error(
                    "location.fixed.longitude",
                    "Longitude must be within -180..=180",
                );
            }
        }

        if self.location.geolocation_timeout_secs == 0 {
            result.add_error(
                "location.geolocation_timeout_secs",
                "Geolocation timeout must be greater than 0",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Path of the local key-value state file
    pub fn state_path(&self) -> PathBuf {
        self.config_dir.join("state.json")
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("nimbus");

        Ok(config_dir.join("config.toml"))
    }
}
