//! Weather backend: async forecast fetching.
//! Network work runs on a spawned task; the result carries the request token.

use std::sync::Arc;

use nimbus_core::{NetworkError, ReqwestErrorExt};
use nimbus_weather::{WeatherProvider, WeatherReport};

use super::{ShellMessage, ShellSender};
use crate::state::FetchRequest;

/// Error type for weather operations
#[derive(Debug, Clone)]
pub enum FetchError {
    Network(String),
    Malformed(String),
    NotInitialized,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network(s) => write!(f, "Weather request failed: {}", s),
            FetchError::Malformed(s) => write!(f, "Malformed weather response: {}", s),
            FetchError::NotInitialized => write!(f, "Weather service not initialized"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<nimbus_weather::WeatherError> for FetchError {
    fn from(e: nimbus_weather::WeatherError) -> Self {
        match e {
            nimbus_weather::WeatherError::Network(e) => {
                FetchError::Network(e.into_network_error().to_string())
            }
            nimbus_weather::WeatherError::Status { status, url } => {
                FetchError::Network(NetworkError::ServerError { status, message: url }.to_string())
            }
            nimbus_weather::WeatherError::Malformed(s) => FetchError::Malformed(s),
        }
    }
}

/// Messages sent from weather tasks back to the shell
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of the fetch issued with `token`
    FetchDone {
        token: u64,
        result: Result<WeatherReport, FetchError>,
    },
}

/// Fetch forecast and alerts for `request.location`.
/// Sends `FetchDone` with the request's token when complete.
pub fn request_fetch(tx: &ShellSender, provider: Arc<WeatherProvider>, request: FetchRequest) {
    let tx = tx.clone();
    let token = request.token;

    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => {
            let _ = tx.send(ShellMessage::Weather(WeatherServiceMessage::FetchDone {
                token,
                result: Err(FetchError::NotInitialized),
            }));
            return;
        }
    };

    runtime.spawn(async move {
        let location = request.location;
        let result = provider
            .fetch_weather(location.latitude, location.longitude)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch weather for token {}: {}", token, e);
                FetchError::from(e)
            });
        let _ = tx.send(ShellMessage::Weather(WeatherServiceMessage::FetchDone {
            token,
            result,
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_display() {
        assert!(format!("{}", FetchError::Network("timeout".into())).contains("failed"));
        assert!(format!("{}", FetchError::Malformed("no periods".into())).contains("Malformed"));
        assert!(format!("{}", FetchError::NotInitialized).contains("not initialized"));
    }

    #[test]
    fn status_maps_to_network() {
        let err = FetchError::from(nimbus_weather::WeatherError::Status {
            status: 500,
            url: "https://api.weather.gov/points/1,2".into(),
        });
        assert!(matches!(err, FetchError::Network(s) if s.contains("500")));
    }

    #[test]
    fn no_runtime_reports_not_initialized() {
        let (tx, mut rx) = crate::services::channel();
        let provider = Arc::new(WeatherProvider::new("nimbus-test/1.0").unwrap());
        let request = FetchRequest {
            token: 7,
            location: nimbus_weather::Location::new(40.0, -74.0),
        };

        request_fetch(&tx, provider, request);

        let msg = rx.try_recv().unwrap();
        assert!(matches!(
            msg,
            ShellMessage::Weather(WeatherServiceMessage::FetchDone {
                token: 7,
                result: Err(FetchError::NotInitialized),
            })
        ));
    }
}
