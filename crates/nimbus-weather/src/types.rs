use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub use nimbus_core::TemperatureUnit;

/// Geographic location selected by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            display_name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.display_name = if name.trim().is_empty() {
            None
        } else {
            Some(name)
        };
        self
    }

    /// Finite coordinates within the valid latitude/longitude ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One forecast segment, e.g. "Tonight" or "Monday"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPeriod {
    pub sequence_number: u32,
    pub name: String,
    pub temperature_fahrenheit: f64,
    pub is_daytime: bool,
    pub short_forecast: String,
    pub condition_icon: String,
    pub start_time: DateTime<FixedOffset>,
    pub detailed_forecast: Option<String>,
    pub wind: Option<String>,
}

impl ForecastPeriod {
    /// Text to pick an animation from: the short forecast, or the NWS icon
    /// URL when the forecast text is blank.
    pub fn condition_descriptor(&self) -> &str {
        if self.short_forecast.trim().is_empty() {
            &self.condition_icon
        } else {
            &self.short_forecast
        }
    }
}

/// An active weather alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub headline: String,
    pub description: String,
    pub instruction: Option<String>,
    pub event: Option<String>,
    pub severity: Option<String>,
}

/// A place returned by forward geocoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeocodeCandidate> for Location {
    fn from(candidate: GeocodeCandidate) -> Self {
        Location::new(candidate.latitude, candidate.longitude).with_name(candidate.display_name)
    }
}

/// Forecast periods and alerts from one completed fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub periods: Vec<ForecastPeriod>,
    pub alerts: Vec<Alert>,
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl WeatherError {
    /// True for shape problems, false for transport or status failures
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

/// Geocoder errors
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Geocoder returned HTTP {0}")]
    Status(u16),
    #[error("Malformed geocoder response: {0}")]
    Malformed(String),
}

/// Local state store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Stored value is corrupt: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_symbol_and_toggle() {
        assert_eq!(TemperatureUnit::Fahrenheit.symbol(), "°F");
        assert_eq!(TemperatureUnit::Celsius.symbol(), "°C");
        assert_eq!(TemperatureUnit::Fahrenheit.toggled(), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::Celsius.toggled(), TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_location_blank_name_is_none() {
        let loc = Location::new(39.0, -95.0).with_name("   ");
        assert_eq!(loc.display_name, None);
        let loc = Location::new(39.0, -95.0).with_name("Topeka");
        assert_eq!(loc.display_name.as_deref(), Some("Topeka"));
    }

    #[test]
    fn test_location_validity() {
        assert!(Location::new(47.6, -122.3).is_valid());
        assert!(!Location::new(95.0, 0.0).is_valid());
        assert!(!Location::new(0.0, 181.0).is_valid());
        assert!(!Location::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_candidate_into_location() {
        let candidate = GeocodeCandidate {
            display_name: "Austin, Travis County, Texas, United States".into(),
            latitude: 30.27,
            longitude: -97.74,
        };
        let loc: Location = candidate.into();
        assert_eq!(loc.latitude, 30.27);
        assert_eq!(
            loc.display_name.as_deref(),
            Some("Austin, Travis County, Texas, United States")
        );
    }

    #[test]
    fn test_location_deserializes_without_name() {
        let loc: Location = serde_json::from_str(r#"{"latitude":1.5,"longitude":2.5}"#).unwrap();
        assert_eq!(loc, Location::new(1.5, 2.5));
    }
}
