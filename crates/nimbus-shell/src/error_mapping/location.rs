use crate::services::LocateError;
use nimbus_core::{AppError, LocationError};

impl From<LocateError> for AppError {
    fn from(e: LocateError) -> Self {
        match e {
            LocateError::PermissionDenied => AppError::Location(LocationError::PermissionDenied),
            LocateError::Unavailable => AppError::Location(LocationError::ServiceUnavailable),
            LocateError::Timeout => AppError::Location(LocationError::Timeout),
            LocateError::Failed(s) => AppError::Location(LocationError::Other(s)),
            LocateError::NotInitialized => AppError::Location(LocationError::ServiceUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_is_silent() {
        let err: AppError = LocateError::PermissionDenied.into();
        assert!(err.is_silent());
        let err: AppError = LocateError::Timeout.into();
        assert!(!err.is_silent());
    }
}
