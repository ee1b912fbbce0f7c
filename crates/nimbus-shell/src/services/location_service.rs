//! Device location backend.

use std::sync::Arc;

use nimbus_weather::{Location, LocationResolver};

use super::{ShellMessage, ShellSender};

#[derive(Debug, Clone)]
pub enum LocateError {
    PermissionDenied,
    Unavailable,
    Timeout,
    Failed(String),
    NotInitialized,
}

impl std::fmt::Display for LocateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocateError::PermissionDenied => write!(f, "Location permission denied"),
            LocateError::Unavailable => write!(f, "Location service unavailable"),
            LocateError::Timeout => write!(f, "Location request timed out"),
            LocateError::Failed(s) => write!(f, "Location error: {}", s),
            LocateError::NotInitialized => write!(f, "Location service not initialized"),
        }
    }
}

impl std::error::Error for LocateError {}

impl From<nimbus_weather::LocationError> for LocateError {
    fn from(e: nimbus_weather::LocationError) -> Self {
        match e {
            nimbus_weather::LocationError::PermissionDenied => LocateError::PermissionDenied,
            nimbus_weather::LocationError::ServiceUnavailable => LocateError::Unavailable,
            nimbus_weather::LocationError::Timeout => LocateError::Timeout,
            nimbus_weather::LocationError::Other(s) => LocateError::Failed(s),
        }
    }
}

#[derive(Debug)]
pub enum LocationServiceMessage {
    /// Lookup outcome stamped with the locate token that issued it
    LocateDone {
        token: u64,
        result: Result<Location, LocateError>,
    },
}

/// Take one device reading and name it. Sends `LocateDone` when complete.
pub fn request_locate(tx: &ShellSender, resolver: Arc<LocationResolver>, token: u64) {
    let tx = tx.clone();
    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => {
            let _ = tx.send(ShellMessage::Location(LocationServiceMessage::LocateDone {
                token,
                result: Err(LocateError::NotInitialized),
            }));
            return;
        }
    };

    runtime.spawn(async move {
        let result = resolver.locate_device().await.map_err(LocateError::from);
        match &result {
            Ok(loc) => tracing::info!("Got location: {}, {}", loc.latitude, loc.longitude),
            Err(e) => tracing::warn!("Device location failed: {}", e),
        }
        let _ = tx.send(ShellMessage::Location(LocationServiceMessage::LocateDone {
            token,
            result,
        }));
    });
}
