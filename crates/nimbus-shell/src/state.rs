//! Dashboard state machine.
//!
//! `AppState` is the single source of truth for what the dashboard shows.
//! Every fetch carries a request token; only the result for the latest token
//! is applied, so a slow response for a superseded location never overwrites
//! newer data. Device lookups carry their own token, invalidated by any
//! manual selection or reset.

use nimbus_weather::{Alert, ForecastPeriod, GeocodeCandidate, Location, TemperatureUnit, WeatherReport};

use crate::theme::Theme;

/// Fetch lifecycle for the selected location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    NoLocation,
    Loading,
    Ready,
    Error,
}

impl Phase {
    /// True if a refresh has a location to re-fetch.
    pub fn can_refresh(self) -> bool {
        !matches!(self, Phase::NoLocation)
    }

    /// State after a fetch is issued.
    pub fn on_fetch_started(self) -> Self {
        Phase::Loading
    }

    /// State after the latest fetch succeeded.
    pub fn on_fetch_succeeded(self) -> Self {
        Phase::Ready
    }

    /// State after the latest fetch failed.
    pub fn on_fetch_failed(self) -> Self {
        Phase::Error
    }

    /// State after the user clears the location.
    pub fn on_reset(self) -> Self {
        Phase::NoLocation
    }
}

/// A fetch the caller must dispatch; its result goes back through
/// [`AppState::complete_fetch`] with the same token.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub token: u64,
    pub location: Location,
}

#[derive(Debug, Clone)]
pub struct AppState {
    location: Option<Location>,
    periods: Vec<ForecastPeriod>,
    alerts: Vec<Alert>,
    phase: Phase,
    error_message: Option<String>,
    notice: Option<String>,
    unit: TemperatureUnit,
    theme: Theme,
    latest_token: u64,
    latest_locate: u64,
    candidates: Vec<GeocodeCandidate>,
}

impl AppState {
    pub fn new(unit: TemperatureUnit, theme: Theme) -> Self {
        Self {
            location: None,
            periods: Vec::new(),
            alerts: Vec::new(),
            phase: Phase::NoLocation,
            error_message: None,
            notice: None,
            unit,
            theme,
            latest_token: 0,
            latest_locate: 0,
            candidates: Vec::new(),
        }
    }

    /// Replace the location wholesale and issue a fresh fetch token.
    /// A device lookup still in flight no longer applies.
    pub fn select_location(&mut self, location: Location) -> FetchRequest {
        self.latest_locate += 1;
        self.start_fetch(location)
    }

    fn start_fetch(&mut self, location: Location) -> FetchRequest {
        self.latest_token += 1;
        self.location = Some(location.clone());
        self.periods.clear();
        self.alerts.clear();
        self.error_message = None;
        self.notice = None;
        self.candidates.clear();
        self.phase = self.phase.on_fetch_started();

        FetchRequest {
            token: self.latest_token,
            location,
        }
    }

    /// Apply a fetch result. Returns false (state untouched) for stale tokens.
    pub fn complete_fetch(&mut self, token: u64, result: Result<WeatherReport, String>) -> bool {
        if token != self.latest_token || self.phase != Phase::Loading {
            tracing::debug!(
                "Dropping stale fetch result {} (latest {})",
                token,
                self.latest_token
            );
            return false;
        }

        match result {
            Ok(report) => {
                self.periods = report.periods;
                self.alerts = report.alerts;
                self.error_message = None;
                self.phase = self.phase.on_fetch_succeeded();
            }
            Err(message) => {
                self.periods.clear();
                self.alerts.clear();
                self.error_message = Some(message);
                self.phase = self.phase.on_fetch_failed();
            }
        }
        true
    }

    /// Re-issue the fetch for the current location.
    pub fn refresh(&mut self) -> Option<FetchRequest> {
        if !self.phase.can_refresh() {
            return None;
        }
        let location = self.location.clone()?;
        Some(self.start_fetch(location))
    }

    /// Forget the location. Any fetch still in flight becomes stale.
    pub fn reset(&mut self) {
        self.latest_token += 1;
        self.latest_locate += 1;
        self.location = None;
        self.periods.clear();
        self.alerts.clear();
        self.error_message = None;
        self.notice = None;
        self.candidates.clear();
        self.phase = self.phase.on_reset();
    }

    pub fn toggle_unit(&mut self) -> TemperatureUnit {
        self.unit = self.unit.toggled();
        self.unit
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Apply fresh search results; an earlier search notice no longer applies.
    pub fn set_candidates(&mut self, candidates: Vec<GeocodeCandidate>) {
        self.candidates = candidates;
        self.notice = None;
    }

    pub fn clear_candidates(&mut self) {
        self.candidates.clear();
    }

    /// Token for a new device lookup. Supersedes any earlier lookup.
    pub fn begin_locate(&mut self) -> u64 {
        self.latest_locate += 1;
        self.latest_locate
    }

    /// True if no selection, reset or newer lookup happened since `token` was issued.
    pub fn is_current_locate(&self, token: u64) -> bool {
        token == self.latest_locate
    }

    /// Candidate by 1-based position as listed to the user.
    pub fn candidate(&self, position: usize) -> Option<&GeocodeCandidate> {
        position.checked_sub(1).and_then(|i| self.candidates.get(i))
    }

    /// Non-fatal message shown until the next selection.
    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn periods(&self) -> &[ForecastPeriod] {
        &self.periods
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn candidates(&self) -> &[GeocodeCandidate] {
        &self.candidates
    }

    pub fn latest_token(&self) -> u64 {
        self.latest_token
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(TemperatureUnit::default(), Theme::default())
    }
}
