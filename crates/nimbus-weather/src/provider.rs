//! NWS client: gridpoint metadata, forecast periods and active alerts.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Alert, ForecastPeriod, WeatherError, WeatherReport};
use crate::units::celsius_to_fahrenheit;

const NWS_API_BASE: &str = "https://api.weather.gov";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const GEO_JSON: &str = "application/geo+json";

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: Option<PointsProperties>,
}

#[derive(Debug, Deserialize)]
struct PointsProperties {
    forecast: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Vec<RawPeriod>,
}

/// NWS serves either a bare number or a quantitative value object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTemperature {
    Number(f64),
    Quantity {
        value: Option<f64>,
        #[serde(rename = "unitCode")]
        unit_code: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPeriod {
    number: u32,
    name: String,
    start_time: DateTime<FixedOffset>,
    is_daytime: bool,
    temperature: Option<RawTemperature>,
    temperature_unit: Option<String>,
    short_forecast: String,
    #[serde(default)]
    icon: String,
    detailed_forecast: Option<String>,
    wind_speed: Option<String>,
    wind_direction: Option<String>,
}

impl RawPeriod {
    fn temperature_fahrenheit(&self) -> Result<f64, WeatherError> {
        let missing = || {
            WeatherError::Malformed(format!("period {} has no temperature", self.number))
        };
        match &self.temperature {
            Some(RawTemperature::Number(value)) => {
                if self.temperature_unit.as_deref() == Some("C") {
                    Ok(celsius_to_fahrenheit(*value))
                } else {
                    Ok(*value)
                }
            }
            Some(RawTemperature::Quantity { value, unit_code }) => {
                let value = value.ok_or_else(missing)?;
                match unit_code.as_deref() {
                    Some(code) if code.ends_with("degC") => Ok(celsius_to_fahrenheit(value)),
                    _ => Ok(value),
                }
            }
            None => Err(missing()),
        }
    }

    fn into_period(self) -> Result<ForecastPeriod, WeatherError> {
        let temperature_fahrenheit = self.temperature_fahrenheit()?;
        let wind = match (self.wind_speed, self.wind_direction) {
            (Some(speed), Some(dir)) if !dir.is_empty() => Some(format!("{} {}", dir, speed)),
            (Some(speed), _) => Some(speed),
            _ => None,
        };
        Ok(ForecastPeriod {
            sequence_number: self.number,
            name: self.name,
            temperature_fahrenheit,
            is_daytime: self.is_daytime,
            short_forecast: self.short_forecast,
            condition_icon: self.icon,
            start_time: self.start_time,
            detailed_forecast: self.detailed_forecast.filter(|s| !s.is_empty()),
            wind,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AlertsResponse {
    features: Vec<RawAlertFeature>,
}

#[derive(Debug, Deserialize)]
struct RawAlertFeature {
    id: String,
    properties: RawAlertProperties,
}

#[derive(Debug, Deserialize)]
struct RawAlertProperties {
    headline: Option<String>,
    description: Option<String>,
    instruction: Option<String>,
    event: Option<String>,
    severity: Option<String>,
}

impl From<RawAlertFeature> for Alert {
    fn from(raw: RawAlertFeature) -> Self {
        let props = raw.properties;
        let headline = props
            .headline
            .filter(|h| !h.trim().is_empty())
            .or_else(|| props.event.clone())
            .unwrap_or_else(|| "Weather alert".to_string());
        Alert {
            id: raw.id,
            headline,
            description: props.description.unwrap_or_default(),
            instruction: props.instruction.filter(|s| !s.trim().is_empty()),
            event: props.event,
            severity: props.severity,
        }
    }
}

/// Format coordinates the way NWS expects: at most four decimals, no
/// trailing zeros (longer forms are answered with a redirect).
pub fn format_point(latitude: f64, longitude: f64) -> String {
    fn trim(value: f64) -> String {
        let s = format!("{:.4}", value);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" {
            "0".to_string()
        } else {
            s.to_string()
        }
    }
    format!("{},{}", trim(latitude), trim(longitude))
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
}

impl WeatherProvider {
    /// Client for the public NWS API
    pub fn new(user_agent: &str) -> Result<Self, WeatherError> {
        Self::with_options(
            NWS_API_BASE,
            user_agent,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    /// Client against an explicit base URL (mirrors, mock servers)
    pub fn with_options(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let mut builder = Client::builder().user_agent(user_agent.to_string());
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve the gridpoint for the coordinates, then fetch the forecast and
    /// the active alerts concurrently. Any failure aborts the whole fetch.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherReport, WeatherError> {
        let point = format_point(latitude, longitude);

        let points_url = format!("{}/points/{}", self.base_url, point);
        let metadata: PointsResponse = self.get_json(&points_url).await?;
        let forecast_url = metadata
            .properties
            .and_then(|p| p.forecast)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                WeatherError::Malformed(format!("no forecast reference for point {}", point))
            })?;

        let alerts_url = format!("{}/alerts/active?point={}", self.base_url, point);

        let (forecast, alerts) = tokio::try_join!(
            self.get_json::<ForecastResponse>(&forecast_url),
            self.get_json::<AlertsResponse>(&alerts_url),
        )?;

        let periods = forecast
            .properties
            .periods
            .into_iter()
            .map(RawPeriod::into_period)
            .collect::<Result<Vec<_>, _>>()?;
        let alerts: Vec<Alert> = alerts.features.into_iter().map(Alert::from).collect();

        tracing::info!(
            "Fetched {} forecast periods and {} alerts for {}",
            periods.len(),
            alerts.len(),
            point
        );

        Ok(WeatherReport { periods, alerts })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, WeatherError> {
        let response = self.client.get(url).header(ACCEPT, GEO_JSON).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} returned status {}", url, status);
            return Err(WeatherError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| WeatherError::Malformed(format!("{}: {}", url, e)))
    }
}
