//! Text views of the dashboard state, styled with crossterm colors.
//! Each view returns a `String`; an empty view renders as an empty string.

use std::fmt::Write as _;

use chrono::{DateTime, TimeZone};
use crossterm::style::Stylize;
use nimbus_weather::{resolve_icon, to_display_temperature, Alert, ForecastPeriod, GeocodeCandidate, TemperatureUnit};

use crate::state::{AppState, Phase};
use crate::theme::Palette;

pub const TITLE: &str = "US Weather & Alerts";
pub const FALLBACK_LOCATION_NAME: &str = "Current Location";

/// Full dashboard for the current state.
pub fn render<Tz>(state: &AppState, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let palette = state.theme().palette();
    let sections = [
        render_header(state),
        render_current(state, now),
        render_status(state),
        if shows_alerts(state) {
            render_alerts(state.alerts(), palette)
        } else {
            String::new()
        },
        render_forecast(state),
        render_candidates(state.candidates(), palette),
    ];

    sections
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Data views only show for a settled, successful fetch.
fn shows_data(state: &AppState) -> bool {
    shows_alerts(state) && !state.periods().is_empty()
}

/// Alerts do not depend on the forecast having periods.
fn shows_alerts(state: &AppState) -> bool {
    state.phase() == Phase::Ready && state.location().is_some()
}

pub fn render_header(state: &AppState) -> String {
    let palette = state.theme().palette();
    let unit = state.unit();
    let badge_color = match unit {
        TemperatureUnit::Fahrenheit => palette.fahrenheit_badge,
        TemperatureUnit::Celsius => palette.celsius_badge,
    };
    format!(
        "{}   [{}]  {}\n",
        TITLE.with(palette.title).bold(),
        unit.symbol().with(badge_color).bold(),
        state.theme().glyph()
    )
}

/// Current weather card: first period with the location name and local time.
pub fn render_current<Tz>(state: &AppState, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if !shows_data(state) {
        return String::new();
    }
    let (Some(location), Some(first)) = (state.location(), state.periods().first()) else {
        return String::new();
    };
    let palette = state.theme().palette();
    let name = location
        .display_name
        .as_deref()
        .unwrap_or(FALLBACK_LOCATION_NAME);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "🌦️  {}   {}",
        "Current Weather".with(palette.text).bold(),
        format!("{} · {}", name, now.format("%H:%M")).with(palette.muted)
    );
    let _ = writeln!(out, "  {}", render_period(first, state.unit(), palette));
    if let Some(detail) = &first.detailed_forecast {
        let _ = writeln!(out, "  {}", detail.as_str().with(palette.muted));
    }
    out
}

/// Loading line, error line, notices and the no-location hint.
pub fn render_status(state: &AppState) -> String {
    let palette = state.theme().palette();
    let mut out = String::new();

    match state.phase() {
        Phase::NoLocation => {
            let _ = writeln!(
                out,
                "{}",
                "📍 Select a location: `locate`, `search <city>` or `at <lat> <lon>`"
                    .with(palette.muted)
            );
        }
        Phase::Loading => {
            let _ = writeln!(out, "{}", "Loading...".with(palette.muted));
        }
        Phase::Error => {
            if let Some(message) = state.error_message() {
                let _ = writeln!(out, "{}", message.with(palette.error));
            }
        }
        Phase::Ready => {}
    }

    if let Some(notice) = state.notice() {
        let _ = writeln!(out, "{}", notice.with(palette.muted).italic());
    }
    out
}

/// Alerts banner; nothing at all when there are no alerts.
pub fn render_alerts(alerts: &[Alert], palette: &Palette) -> String {
    if alerts.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", "🚨 Weather Alerts".with(palette.alert).bold());
    for alert in alerts {
        let title = match &alert.severity {
            Some(severity) => format!("{} ({})", alert.headline, severity),
            None => alert.headline.clone(),
        };
        let _ = writeln!(out, "  {}", title.with(palette.alert).bold());
        if !alert.description.is_empty() {
            for line in alert.description.lines().filter(|l| !l.trim().is_empty()) {
                let _ = writeln!(out, "    {}", line.trim().with(palette.alert));
            }
        }
        if let Some(instruction) = &alert.instruction {
            let _ = writeln!(out, "    {}", instruction.as_str().with(palette.alert).italic());
        }
    }
    out
}

/// Forecast list in received order.
pub fn render_forecast(state: &AppState) -> String {
    if !shows_data(state) {
        return String::new();
    }
    let palette = state.theme().palette();

    let mut out = String::new();
    let _ = writeln!(out, "{}", "7-Day Forecast".with(palette.text).bold());
    for period in state.periods() {
        let _ = writeln!(out, "  {}", render_period(period, state.unit(), palette));
    }
    out
}

/// One period: icon, name, temperature in the display unit, short forecast.
pub fn render_period(period: &ForecastPeriod, unit: TemperatureUnit, palette: &Palette) -> String {
    let icon = resolve_icon(period.condition_descriptor(), period.is_daytime);
    let temperature = to_display_temperature(period.temperature_fahrenheit, unit);
    let mut line = format!(
        "{} {:<16} {:>4}{}  {}",
        icon.glyph(),
        period.name,
        temperature,
        unit.symbol(),
        period.short_forecast.as_str().with(palette.text)
    );
    if let Some(wind) = &period.wind {
        let _ = write!(line, "  {}", format!("wind {}", wind).with(palette.muted));
    }
    line
}

/// Numbered suggestion list for `pick <n>`.
pub fn render_candidates(candidates: &[GeocodeCandidate], palette: &Palette) -> String {
    if candidates.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for (i, candidate) in candidates.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {} {}",
            format!("{}.", i + 1).with(palette.muted),
            candidate.display_name
        );
    }
    out
}

pub fn help_text() -> &'static str {
    "Commands:
  locate              use this device's location
  search <city>       find U.S. places (or type /<city>)
  pick <n>            choose a search result
  at <lat> <lon> [name]
                      use explicit coordinates
  unit                toggle °F / °C
  theme               toggle light / dark
  refresh             fetch again for the current location
  reset               forget the saved location
  show                redraw the dashboard
  help                this list
  quit                exit"
}
