//! The shell: owns `AppState`, turns commands into background requests and
//! applies the messages those requests send back.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use nimbus_core::{AppError, Config};
use nimbus_weather::{
    FixedGeolocation, GeocodeClient, GeolocationSource, LocalStore, Location, LocationResolver,
    LocationStore, SearchOptions, SuggestionRequest, SystemGeolocation, TemperatureUnit,
    WeatherProvider,
};

use crate::commands::Command;
use crate::error_mapping::from_store_error;
use crate::render;
use crate::services::{
    self, LocationServiceMessage, SearchServiceMessage, ShellMessage, ShellReceiver, ShellSender,
    WeatherServiceMessage,
};
use crate::state::{AppState, FetchRequest};
use crate::theme::Theme;

/// Clients and storage the shell dispatches work to
pub struct ShellServices {
    pub provider: Arc<WeatherProvider>,
    pub resolver: Arc<LocationResolver>,
    pub locations: LocationStore,
}

impl ShellServices {
    pub fn from_config(config: &Config) -> Result<Self> {
        let services = &config.services;
        let timeout = Duration::from_secs(services.request_timeout_secs);

        let provider =
            WeatherProvider::with_options(&services.weather_api_url, &services.user_agent, timeout)?;
        let geocoder = GeocodeClient::with_options(
            &services.geocoding_api_url,
            &services.user_agent,
            timeout,
            SearchOptions {
                country: config.search.country.clone(),
                limit: config.search.max_results,
            },
        )?;

        let geolocation: Arc<dyn GeolocationSource> = match &config.location.fixed {
            Some(fixed) => {
                let mut location = Location::new(fixed.latitude, fixed.longitude);
                if let Some(name) = &fixed.name {
                    location = location.with_name(name.clone());
                }
                Arc::new(FixedGeolocation::new(location))
            }
            None => Arc::new(SystemGeolocation::new(Duration::from_secs(
                config.location.geolocation_timeout_secs,
            ))),
        };
        tracing::debug!("Using {} geolocation", geolocation.name());

        let resolver = LocationResolver::with_search_options(
            geocoder,
            geolocation,
            Duration::from_millis(config.search.debounce_ms),
            config.search.min_query_chars,
        );

        Ok(Self {
            provider: Arc::new(provider),
            resolver: Arc::new(resolver),
            locations: LocationStore::new(LocalStore::new(config.state_path())),
        })
    }
}

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Redraw the dashboard
    Render,
    /// Print a short line
    Text(String),
    Quit,
}

pub struct Shell {
    state: AppState,
    services: ShellServices,
    tx: ShellSender,
}

impl Shell {
    pub fn new(services: ShellServices, unit: TemperatureUnit, theme: Theme) -> (Self, ShellReceiver) {
        let (tx, rx) = services::channel();
        let shell = Self {
            state: AppState::new(unit, theme),
            services,
            tx,
        };
        (shell, rx)
    }

    pub fn from_config(config: &Config) -> Result<(Self, ShellReceiver)> {
        let services = ShellServices::from_config(config)?;
        Ok(Self::new(
            services,
            config.ui.temperature_unit,
            Theme::detect(config.ui.dark_mode),
        ))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Re-select the persisted location, if any. Goes through the same path
    /// as a manual selection.
    pub fn restore(&mut self) -> Option<FetchRequest> {
        let location = self.services.locations.load()?;
        tracing::info!("Restoring saved location");
        Some(self.select_location(location))
    }

    /// Make `location` current, remember it and start its fetch.
    pub fn select_location(&mut self, location: Location) -> FetchRequest {
        if let Err(e) = self.services.locations.save(&location) {
            let err = from_store_error(e);
            tracing::warn!("Failed to persist location: {}", err);
        }

        let request = self.state.select_location(location);
        services::request_fetch(&self.tx, Arc::clone(&self.services.provider), request.clone());
        request
    }

    pub fn handle_command(&mut self, command: Command) -> Reply {
        match command {
            Command::Locate => {
                let token = self.state.begin_locate();
                services::request_locate(&self.tx, Arc::clone(&self.services.resolver), token);
                Reply::Text("Locating...".into())
            }
            Command::Search(query) => {
                match services::request_suggestions(&self.tx, &self.services.resolver, &query) {
                    SuggestionRequest::Cleared => {
                        self.state.clear_candidates();
                        Reply::Text("Keep typing to search.".into())
                    }
                    SuggestionRequest::Scheduled(_) => {
                        self.state.clear_candidates();
                        Reply::Text("Searching...".into())
                    }
                }
            }
            Command::Pick(position) => match self.state.candidate(position).cloned() {
                Some(candidate) => {
                    let location = self.services.resolver.select(candidate);
                    self.select_location(location);
                    Reply::Render
                }
                None => Reply::Text(format!("No suggestion #{}.", position)),
            },
            Command::At {
                latitude,
                longitude,
                name,
            } => {
                let mut location = Location::new(latitude, longitude);
                if !location.is_valid() {
                    return Reply::Text("Coordinates out of range.".into());
                }
                if let Some(name) = name {
                    location = location.with_name(name);
                }
                self.select_location(location);
                Reply::Render
            }
            Command::ToggleUnit => {
                self.state.toggle_unit();
                Reply::Render
            }
            Command::ToggleTheme => {
                self.state.toggle_theme();
                Reply::Render
            }
            Command::Refresh => match self.state.refresh() {
                Some(request) => {
                    services::request_fetch(&self.tx, Arc::clone(&self.services.provider), request);
                    Reply::Render
                }
                None => Reply::Text("No location selected.".into()),
            },
            Command::Reset => {
                self.services.resolver.cancel_suggestions();
                if let Err(e) = self.services.locations.clear() {
                    tracing::warn!("Failed to clear saved location: {}", from_store_error(e));
                }
                self.state.reset();
                Reply::Render
            }
            Command::Show => Reply::Render,
            Command::Help => Reply::Text(render::help_text().to_string()),
            Command::Quit => Reply::Quit,
        }
    }

    /// Apply a background result. Returns true when the dashboard changed.
    pub fn handle_message(&mut self, message: ShellMessage) -> bool {
        match message {
            ShellMessage::Weather(WeatherServiceMessage::FetchDone { token, result }) => {
                let result = result.map_err(|e| AppError::from(e).user_message().to_string());
                self.state.complete_fetch(token, result)
            }
            ShellMessage::Location(LocationServiceMessage::LocateDone { token, result }) => {
                if !self.state.is_current_locate(token) {
                    tracing::debug!("Dropping superseded device location {}", token);
                    return false;
                }
                match result {
                    Ok(location) => {
                        self.select_location(location);
                        true
                    }
                    Err(e) => {
                        let err = AppError::from(e);
                        if err.is_silent() {
                            tracing::warn!("{}", err);
                            return false;
                        }
                        self.state.set_notice(err.user_message());
                        true
                    }
                }
            }
            ShellMessage::Search(SearchServiceMessage::SuggestionsDone { generation, result }) => {
                if !self.services.resolver.is_current_generation(generation) {
                    tracing::debug!("Dropping superseded search results {}", generation);
                    return false;
                }
                match result {
                    Ok(candidates) => {
                        let empty = candidates.is_empty();
                        self.state.set_candidates(candidates);
                        if empty {
                            self.state.set_notice("No matching places.");
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Place search failed: {}", e);
                        self.state.clear_candidates();
                        self.state.set_notice(AppError::from(e).user_message());
                    }
                }
                true
            }
        }
    }

    pub fn render(&self) -> String {
        render::render(&self.state, &chrono::Local::now())
    }
}
