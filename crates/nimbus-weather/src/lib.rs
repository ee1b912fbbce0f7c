//! Weather data for Nimbus
//!
//! NWS forecasts and alerts, device location with Nominatim geocoding,
//! debounced place search and the persisted last location.

pub mod debounce;
pub mod geocode;
pub mod icons;
pub mod location;
pub mod provider;
pub mod resolver;
pub mod store;
pub mod types;
pub mod units;

pub use types::*;
pub use debounce::Debouncer;
pub use geocode::{GeocodeClient, SearchOptions};
pub use icons::{resolve_icon, AnimationId};
pub use location::{FixedGeolocation, GeolocationSource, SystemGeolocation};
pub use provider::WeatherProvider;
pub use resolver::{LocationResolver, SuggestionRequest};
pub use store::{LocalStore, LocationStore};
pub use units::to_display_temperature;
