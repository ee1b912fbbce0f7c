//! Location acquisition: device fix, debounced place search, candidate pick.

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use crate::debounce::Debouncer;
use crate::geocode::GeocodeClient;
use crate::location::GeolocationSource;
use crate::types::{GeocodeCandidate, GeocodeError, Location, LocationError};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_MIN_QUERY_CHARS: usize = 3;

/// Outcome of feeding a query to [`LocationResolver::request_suggestions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionRequest {
    /// Query too short; pending search disarmed, suggestions should be emptied
    Cleared,
    /// Timer armed with this generation
    Scheduled(u64),
}

pub struct LocationResolver {
    geocoder: Arc<GeocodeClient>,
    geolocation: Arc<dyn GeolocationSource>,
    debouncer: Debouncer,
    min_query_chars: usize,
}

impl LocationResolver {
    pub fn new(geocoder: GeocodeClient, geolocation: Arc<dyn GeolocationSource>) -> Self {
        Self::with_search_options(
            geocoder,
            geolocation,
            DEFAULT_DEBOUNCE,
            DEFAULT_MIN_QUERY_CHARS,
        )
    }

    pub fn with_search_options(
        geocoder: GeocodeClient,
        geolocation: Arc<dyn GeolocationSource>,
        debounce: Duration,
        min_query_chars: usize,
    ) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
            geolocation,
            debouncer: Debouncer::new(debounce),
            min_query_chars,
        }
    }

    /// One device reading, named by a best-effort reverse geocode.
    #[instrument(skip(self), fields(source = self.geolocation.name()))]
    pub async fn locate_device(&self) -> Result<Location, LocationError> {
        let reading = self.geolocation.current_location().await?;
        if reading.display_name.is_some() {
            return Ok(reading);
        }

        let location = Location::new(reading.latitude, reading.longitude);
        match self.geocoder.reverse(reading.latitude, reading.longitude).await {
            Ok(Some(name)) => Ok(location.with_name(name)),
            Ok(None) => Ok(location),
            Err(e) => {
                tracing::warn!("Reverse geocode failed, keeping coordinates only: {}", e);
                Ok(location)
            }
        }
    }

    /// Feed the latest search text. `deliver` receives the generation the
    /// timer was armed with plus the search outcome; check it against
    /// [`Self::is_current_generation`] before applying.
    pub fn request_suggestions<F>(&self, query: &str, deliver: F) -> SuggestionRequest
    where
        F: FnOnce(u64, Result<Vec<GeocodeCandidate>, GeocodeError>) + Send + 'static,
    {
        let query = query.trim();
        if query.chars().count() < self.min_query_chars {
            self.debouncer.cancel();
            return SuggestionRequest::Cleared;
        }

        let geocoder = Arc::clone(&self.geocoder);
        let query = query.to_string();
        let generation = self.debouncer.schedule(move |generation| async move {
            let result = geocoder.search(&query).await;
            deliver(generation, result);
        });

        SuggestionRequest::Scheduled(generation)
    }

    pub fn is_current_generation(&self, generation: u64) -> bool {
        self.debouncer.is_current(generation)
    }

    /// Disarm any pending search, e.g. once a candidate is picked.
    pub fn cancel_suggestions(&self) {
        self.debouncer.cancel();
    }

    pub fn select(&self, candidate: GeocodeCandidate) -> Location {
        self.debouncer.cancel();
        candidate.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::SearchOptions;
    use crate::location::FixedGeolocation;
    use async_trait::async_trait;
    use tokio::sync::mpsc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct DeniedGeolocation;

    #[async_trait]
    impl GeolocationSource for DeniedGeolocation {
        async fn current_location(&self) -> Result<Location, LocationError> {
            Err(LocationError::PermissionDenied)
        }

        fn name(&self) -> &'static str {
            "denied"
        }
    }

    fn geocoder(server: &MockServer) -> GeocodeClient {
        GeocodeClient::with_options(
            &server.uri(),
            "nimbus-test/1.0",
            Duration::from_secs(5),
            SearchOptions::default(),
        )
        .unwrap()
    }

    fn resolver(server: &MockServer, source: Arc<dyn GeolocationSource>) -> LocationResolver {
        LocationResolver::with_search_options(geocoder(server), source, Duration::from_millis(50), 3)
    }

    async fn mount_search(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "display_name": "Denver, Colorado, United States", "lat": "39.7392", "lon": "-104.9903" }
            ])))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_locate_device_names_reading() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": { "town": "Bar Harbor" }
            })))
            .mount(&server)
            .await;

        let source = Arc::new(FixedGeolocation::new(Location::new(44.38, -68.2)));
        let loc = resolver(&server, source).locate_device().await.unwrap();
        assert_eq!(loc.display_name.as_deref(), Some("Bar Harbor"));
        assert_eq!(loc.latitude, 44.38);
    }

    #[tokio::test]
    async fn test_locate_device_reverse_failure_keeps_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = Arc::new(FixedGeolocation::new(Location::new(44.38, -68.2)));
        let loc = resolver(&server, source).locate_device().await.unwrap();
        assert_eq!(loc, Location::new(44.38, -68.2));
    }

    #[tokio::test]
    async fn test_locate_device_permission_denied() {
        let server = MockServer::start().await;
        let result = resolver(&server, Arc::new(DeniedGeolocation)).locate_device().await;
        assert!(matches!(result, Err(LocationError::PermissionDenied)));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_short_query_makes_no_request() {
        let server = MockServer::start().await;
        mount_search(&server).await;
        let resolver = resolver(&server, Arc::new(DeniedGeolocation));

        let outcome = resolver.request_suggestions("De", |_, _| {});
        assert_eq!(outcome, SuggestionRequest::Cleared);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_typing_burst_issues_single_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("city", "Denver"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "display_name": "Denver, Colorado, United States", "lat": "39.7392", "lon": "-104.9903" }
            ])))
            .expect(1)
            .mount(&server)
            .await;
        let resolver = resolver(&server, Arc::new(DeniedGeolocation));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut last = None;
        for query in ["Den", "Denv", "Denve", "Denver"] {
            let tx = tx.clone();
            let outcome = resolver.request_suggestions(query, move |generation, result| {
                let _ = tx.send((generation, result));
            });
            if let SuggestionRequest::Scheduled(generation) = outcome {
                last = Some(generation);
            }
        }

        let (generation, result) = rx.recv().await.unwrap();
        assert_eq!(Some(generation), last);
        assert!(resolver.is_current_generation(generation));
        assert_eq!(result.unwrap()[0].display_name, "Denver, Colorado, United States");

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(rx.try_recv().is_err());
        server.verify().await;
    }

    #[tokio::test]
    async fn test_clearing_query_invalidates_in_flight_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;
        let resolver = resolver(&server, Arc::new(DeniedGeolocation));
        let (tx, mut rx) = mpsc::unbounded_channel();

        resolver.request_suggestions("Boise", move |generation, result| {
            let _ = tx.send((generation, result));
        });
        // Let the timer fire and the request go out
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(resolver.request_suggestions("B", |_, _| {}), SuggestionRequest::Cleared);

        let (generation, result) = rx.recv().await.unwrap();
        assert!(result.is_ok());
        assert!(!resolver.is_current_generation(generation));
    }

    #[tokio::test]
    async fn test_select_candidate_is_local() {
        let server = MockServer::start().await;
        let resolver = resolver(&server, Arc::new(DeniedGeolocation));
        let loc = resolver.select(GeocodeCandidate {
            display_name: "Tulsa, Oklahoma, United States".into(),
            latitude: 36.15,
            longitude: -95.99,
        });
        assert_eq!(loc.display_name.as_deref(), Some("Tulsa, Oklahoma, United States"));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }
}
