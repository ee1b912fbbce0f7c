//! Device location: one-shot coordinate readings from the platform.
//!
//! Linux asks GeoClue2 over D-Bus, Windows asks the WinRT `Geolocator`.
//! Other platforms report `ServiceUnavailable`.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{Location, LocationError};

/// Default time to wait for a location fix
pub const DEFAULT_FIX_TIMEOUT: Duration = Duration::from_secs(30);

/// A source of one-shot device coordinates
#[async_trait]
pub trait GeolocationSource: Send + Sync {
    /// Request the platform's permission and return a single reading.
    async fn current_location(&self) -> Result<Location, LocationError>;

    fn name(&self) -> &'static str;
}

/// The operating system's location service
#[derive(Debug, Clone)]
pub struct SystemGeolocation {
    timeout: Duration,
}

impl SystemGeolocation {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemGeolocation {
    fn default() -> Self {
        Self::new(DEFAULT_FIX_TIMEOUT)
    }
}

#[async_trait]
impl GeolocationSource for SystemGeolocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        match tokio::time::timeout(self.timeout, platform::current_location()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("No location fix within {:?}", self.timeout);
                Err(LocationError::Timeout)
            }
        }
    }

    fn name(&self) -> &'static str {
        platform::NAME
    }
}

/// Coordinates configured by the user, for machines without a location service
#[derive(Debug, Clone)]
pub struct FixedGeolocation {
    location: Location,
}

impl FixedGeolocation {
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}

#[async_trait]
impl GeolocationSource for FixedGeolocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        if self.location.is_valid() {
            Ok(self.location.clone())
        } else {
            Err(LocationError::Other(format!(
                "configured coordinates out of range: {}, {}",
                self.location.latitude, self.location.longitude
            )))
        }
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[cfg(target_os = "linux")]
mod platform {
    use futures::StreamExt;
    use zbus::zvariant::OwnedObjectPath;
    use zbus::Connection;

    use crate::types::{Location, LocationError};

    pub const NAME: &str = "geoclue";

    const DESKTOP_ID: &str = "nimbus";
    /// GCLUE_ACCURACY_LEVEL_CITY
    const ACCURACY_CITY: u32 = 4;

    #[zbus::proxy(
        interface = "org.freedesktop.GeoClue2.Manager",
        default_service = "org.freedesktop.GeoClue2",
        default_path = "/org/freedesktop/GeoClue2/Manager"
    )]
    trait Manager {
        fn get_client(&self) -> zbus::Result<OwnedObjectPath>;
    }

    #[zbus::proxy(
        interface = "org.freedesktop.GeoClue2.Client",
        default_service = "org.freedesktop.GeoClue2"
    )]
    trait Client {
        fn start(&self) -> zbus::Result<()>;

        fn stop(&self) -> zbus::Result<()>;

        #[zbus(property)]
        fn set_desktop_id(&self, id: &str) -> zbus::Result<()>;

        #[zbus(property)]
        fn set_requested_accuracy_level(&self, level: u32) -> zbus::Result<()>;

        #[zbus(signal)]
        fn location_updated(
            &self,
            old_path: OwnedObjectPath,
            new_path: OwnedObjectPath,
        ) -> zbus::Result<()>;
    }

    #[zbus::proxy(
        interface = "org.freedesktop.GeoClue2.Location",
        default_service = "org.freedesktop.GeoClue2"
    )]
    trait Fix {
        #[zbus(property)]
        fn latitude(&self) -> zbus::Result<f64>;

        #[zbus(property)]
        fn longitude(&self) -> zbus::Result<f64>;
    }

    fn map_err(e: zbus::Error) -> LocationError {
        let text = e.to_string();
        if text.contains("AccessDenied") {
            LocationError::PermissionDenied
        } else if text.contains("ServiceUnknown") || text.contains("NameHasNoOwner") {
            LocationError::ServiceUnavailable
        } else {
            LocationError::Other(text)
        }
    }

    pub async fn current_location() -> Result<Location, LocationError> {
        let conn = Connection::system().await.map_err(|e| {
            tracing::debug!("System bus unavailable: {}", e);
            LocationError::ServiceUnavailable
        })?;

        let manager = ManagerProxy::new(&conn).await.map_err(map_err)?;
        let client_path = manager.get_client().await.map_err(map_err)?;

        let client = ClientProxy::builder(&conn)
            .path(client_path)
            .map_err(map_err)?
            .build()
            .await
            .map_err(map_err)?;

        client.set_desktop_id(DESKTOP_ID).await.map_err(map_err)?;
        client
            .set_requested_accuracy_level(ACCURACY_CITY)
            .await
            .map_err(map_err)?;

        // Subscribe before starting so the first fix is not missed
        let mut updates = client.receive_location_updated().await.map_err(map_err)?;
        client.start().await.map_err(map_err)?;

        let signal = updates
            .next()
            .await
            .ok_or_else(|| LocationError::Other("GeoClue closed the update stream".into()))?;
        let args = signal.args().map_err(map_err)?;
        let fix_path = args.new_path().clone();

        let fix = FixProxy::builder(&conn)
            .path(fix_path)
            .map_err(map_err)?
            .build()
            .await
            .map_err(map_err)?;
        let latitude = fix.latitude().await.map_err(map_err)?;
        let longitude = fix.longitude().await.map_err(map_err)?;

        if let Err(e) = client.stop().await {
            tracing::debug!("Failed to stop GeoClue client: {}", e);
        }

        tracing::info!("GeoClue fix: {}, {}", latitude, longitude);
        Ok(Location::new(latitude, longitude))
    }
}

#[cfg(windows)]
mod platform {
    use windows::Devices::Geolocation::{GeolocationAccessStatus, Geolocator};

    use crate::types::{Location, LocationError};

    pub const NAME: &str = "windows";

    fn read_fix() -> Result<Location, LocationError> {
        let other = |e: windows::core::Error| LocationError::Other(e.message().to_string());

        let access = Geolocator::RequestAccessAsync()
            .and_then(|op| op.get())
            .map_err(other)?;
        if access != GeolocationAccessStatus::Allowed {
            return Err(LocationError::PermissionDenied);
        }

        let locator = Geolocator::new().map_err(other)?;
        let position = locator
            .GetGeopositionAsync()
            .and_then(|op| op.get())
            .map_err(other)?;
        let point = position
            .Coordinate()
            .and_then(|c| c.Point())
            .and_then(|p| p.Position())
            .map_err(other)?;

        Ok(Location::new(point.Latitude, point.Longitude))
    }

    pub async fn current_location() -> Result<Location, LocationError> {
        tokio::task::spawn_blocking(read_fix)
            .await
            .map_err(|e| LocationError::Other(e.to_string()))?
    }
}

#[cfg(not(any(target_os = "linux", windows)))]
mod platform {
    use crate::types::{Location, LocationError};

    pub const NAME: &str = "unsupported";

    pub async fn current_location() -> Result<Location, LocationError> {
        Err(LocationError::ServiceUnavailable)
    }
}
