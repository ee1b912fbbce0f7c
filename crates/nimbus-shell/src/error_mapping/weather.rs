use crate::services::FetchError;
use nimbus_core::{AppError, WeatherError};

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Network(s) => AppError::Weather(WeatherError::RequestFailed(s)),
            FetchError::Malformed(s) => AppError::Weather(WeatherError::MalformedResponse(s)),
            FetchError::NotInitialized => AppError::Weather(WeatherError::ServiceUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_core::FETCH_FAILED_MESSAGE;

    #[test]
    fn network_and_malformed_read_the_same() {
        let network: AppError = FetchError::Network("HTTP 503".into()).into();
        let malformed: AppError = FetchError::Malformed("no forecast".into()).into();
        assert_eq!(network.user_message(), FETCH_FAILED_MESSAGE);
        assert_eq!(malformed.user_message(), FETCH_FAILED_MESSAGE);
    }
}
