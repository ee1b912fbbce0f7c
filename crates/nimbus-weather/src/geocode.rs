//! Forward and reverse geocoding against Nominatim (OpenStreetMap).
//! Free, no API key required, but a User-Agent is mandatory.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{GeocodeCandidate, GeocodeError};

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    address: Option<NominatimAddress>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

impl NominatimReverse {
    /// City, then town, then village, then the full display name.
    fn place_name(self) -> Option<String> {
        let addr = self.address;
        addr.as_ref()
            .and_then(|a| a.city.clone())
            .or_else(|| addr.as_ref().and_then(|a| a.town.clone()))
            .or_else(|| addr.as_ref().and_then(|a| a.village.clone()))
            .or(self.display_name)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }
}

/// Search scoping for forward geocoding
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub country: String,
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            country: "USA".to_string(),
            limit: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
    options: SearchOptions,
}

impl GeocodeClient {
    pub fn new(user_agent: &str) -> Result<Self, GeocodeError> {
        Self::with_options(
            NOMINATIM_URL,
            user_agent,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
            SearchOptions::default(),
        )
    }

    pub fn with_options(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
        options: SearchOptions,
    ) -> Result<Self, GeocodeError> {
        let mut builder = Client::builder().user_agent(user_agent.to_string());
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            options,
        })
    }

    /// Reverse geocode coordinates to a place name.
    /// `Ok(None)` when the geocoder answered but had no usable name.
    #[instrument(skip(self), level = "debug")]
    pub async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<String>, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        let lat = latitude.to_string();
        let lon = longitude.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("lat", lat.as_str()), ("lon", lon.as_str()), ("format", "json")])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body: NominatimReverse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Malformed(e.to_string()))?;

        let name = body.place_name();
        match &name {
            Some(n) => tracing::info!("Reverse geocoded to: {}", n),
            None => tracing::debug!("Reverse geocode had no usable name"),
        }
        Ok(name)
    }

    /// Search places by free text, scoped to the configured country.
    /// Entries with unparseable coordinates are skipped.
    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let limit = self.options.limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("city", query),
                ("country", self.options.country.as_str()),
                ("limit", limit.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Malformed(e.to_string()))?;

        let candidates: Vec<GeocodeCandidate> = places
            .into_iter()
            .filter_map(|place| {
                match (place.lat.parse::<f64>(), place.lon.parse::<f64>()) {
                    (Ok(latitude), Ok(longitude)) => Some(GeocodeCandidate {
                        display_name: place.display_name,
                        latitude,
                        longitude,
                    }),
                    _ => {
                        tracing::debug!("Skipping place with bad coordinates: {}", place.display_name);
                        None
                    }
                }
            })
            .take(self.options.limit)
            .collect();

        tracing::debug!("Search {:?} returned {} candidates", query, candidates.len());
        Ok(candidates)
    }
}
