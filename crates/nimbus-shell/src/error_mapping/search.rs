use crate::services::SearchError;
use nimbus_core::{AppError, WeatherError};

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Network(s) | SearchError::Malformed(s) => {
                AppError::Weather(WeatherError::Geocoding(s))
            }
        }
    }
}
