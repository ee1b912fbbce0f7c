//! Place search backend: debounced autocomplete through the location resolver.

use nimbus_weather::{GeocodeCandidate, GeocodeError, LocationResolver, SuggestionRequest};

use super::{ShellMessage, ShellSender};

#[derive(Debug, Clone)]
pub enum SearchError {
    Network(String),
    Malformed(String),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Network(s) => write!(f, "Place search failed: {}", s),
            SearchError::Malformed(s) => write!(f, "Malformed place search response: {}", s),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<GeocodeError> for SearchError {
    fn from(e: GeocodeError) -> Self {
        match e {
            GeocodeError::Network(e) => SearchError::Network(e.to_string()),
            GeocodeError::Status(status) => SearchError::Network(format!("HTTP {}", status)),
            GeocodeError::Malformed(s) => SearchError::Malformed(s),
        }
    }
}

#[derive(Debug)]
pub enum SearchServiceMessage {
    /// Search outcome stamped with the debounce generation that issued it
    SuggestionsDone {
        generation: u64,
        result: Result<Vec<GeocodeCandidate>, SearchError>,
    },
}

/// Feed a query to the resolver's debouncer. Sends `SuggestionsDone` once the
/// quiet period passes and the search completes. Must run inside a Tokio runtime.
pub fn request_suggestions(
    tx: &ShellSender,
    resolver: &LocationResolver,
    query: &str,
) -> SuggestionRequest {
    let tx = tx.clone();
    resolver.request_suggestions(query, move |generation, result| {
        let _ = tx.send(ShellMessage::Search(SearchServiceMessage::SuggestionsDone {
            generation,
            result: result.map_err(SearchError::from),
        }));
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_network() {
        assert!(matches!(
            SearchError::from(GeocodeError::Status(429)),
            SearchError::Network(s) if s.contains("429")
        ));
    }
}
