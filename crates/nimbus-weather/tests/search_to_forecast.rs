//! Integration tests for the place search → forecast → persistence path
//! against wiremock servers standing in for Nominatim and NWS.

use std::sync::Arc;
use std::time::Duration;

use nimbus_weather::{
    resolve_icon, to_display_temperature, AnimationId, FixedGeolocation, GeocodeClient,
    LocalStore, Location, LocationResolver, LocationStore, SearchOptions, SuggestionRequest,
    TemperatureUnit, WeatherProvider,
};
use tokio::sync::mpsc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "nimbus-test/1.0 (integration)";

async fn mount_nws(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/points/35.4676,-97.5164"))
        .and(header("user-agent", USER_AGENT))
        .and(header("accept", "application/geo+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "properties": {
                "forecast": format!("{}/gridpoints/OUN/97,94/forecast", server.uri())
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gridpoints/OUN/97,94/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "properties": {
                "periods": [
                    {
                        "number": 1,
                        "name": "This Afternoon",
                        "startTime": "2024-05-06T14:00:00-05:00",
                        "isDaytime": true,
                        "temperature": 84,
                        "temperatureUnit": "F",
                        "shortForecast": "Chance Showers And Thunderstorms",
                        "windSpeed": "20 mph",
                        "windDirection": "SSE"
                    },
                    {
                        "number": 2,
                        "name": "Tonight",
                        "startTime": "2024-05-06T18:00:00-05:00",
                        "isDaytime": false,
                        "temperature": 66,
                        "temperatureUnit": "F",
                        "shortForecast": "Partly Cloudy"
                    }
                ]
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/alerts/active"))
        .and(query_param("point", "35.4676,-97.5164"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "features": [{
                "id": "urn:oid:2.49.0.1.840.0.tornado",
                "properties": {
                    "event": "Tornado Watch",
                    "headline": "Tornado Watch issued May 6 at 1:45PM CDT",
                    "description": "Tornado Watch 180 remains valid until 10 PM CDT.",
                    "instruction": null,
                    "severity": "Severe"
                }
            }]
        })))
        .mount(server)
        .await;
}

async fn mount_nominatim(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("city", "Oklahoma City"))
        .and(query_param("country", "USA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "display_name": "Oklahoma City, Oklahoma County, Oklahoma, United States",
                "lat": "35.4676",
                "lon": "-97.5164"
            }
        ])))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_select_fetch_and_remember() {
    let nws = MockServer::start().await;
    let nominatim = MockServer::start().await;
    mount_nws(&nws).await;
    mount_nominatim(&nominatim).await;

    let geocoder = GeocodeClient::with_options(
        &nominatim.uri(),
        USER_AGENT,
        Duration::from_secs(5),
        SearchOptions::default(),
    )
    .unwrap();
    let resolver = LocationResolver::with_search_options(
        geocoder,
        Arc::new(FixedGeolocation::new(Location::new(0.0, 0.0))),
        Duration::from_millis(50),
        3,
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let outcome = resolver.request_suggestions("Oklahoma City", move |generation, result| {
        let _ = tx.send((generation, result));
    });
    assert!(matches!(outcome, SuggestionRequest::Scheduled(_)));

    let (generation, result) = rx.recv().await.unwrap();
    assert!(resolver.is_current_generation(generation));
    let candidate = result.unwrap().remove(0);
    let location = resolver.select(candidate);

    let provider =
        WeatherProvider::with_options(&nws.uri(), USER_AGENT, Duration::from_secs(5)).unwrap();
    let report = provider
        .fetch_weather(location.latitude, location.longitude)
        .await
        .unwrap();

    assert_eq!(report.periods.len(), 2);
    assert_eq!(report.periods[0].wind.as_deref(), Some("SSE 20 mph"));
    assert_eq!(
        resolve_icon(&report.periods[0].short_forecast, report.periods[0].is_daytime),
        AnimationId::Rain
    );
    assert_eq!(
        resolve_icon(&report.periods[1].short_forecast, report.periods[1].is_daytime),
        AnimationId::PartlyCloudyNight
    );
    assert_eq!(
        to_display_temperature(report.periods[0].temperature_fahrenheit, TemperatureUnit::Celsius),
        29
    );
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].severity.as_deref(), Some("Severe"));

    let dir = tempfile::TempDir::new().unwrap();
    let store = LocationStore::new(LocalStore::new(dir.path().join("state.json")));
    store.save(&location).unwrap();
    let restored = store.load().unwrap();
    assert_eq!(restored, location);

    nominatim.verify().await;
}
