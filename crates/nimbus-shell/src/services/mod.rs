//! Background work for the shell. Each request spawns onto the Tokio runtime
//! and reports back as a `ShellMessage` on the shell's channel.

pub mod location_service;
pub mod search_service;
pub mod weather_service;

use tokio::sync::mpsc;

pub use location_service::{request_locate, LocateError, LocationServiceMessage};
pub use search_service::{request_suggestions, SearchError, SearchServiceMessage};
pub use weather_service::{request_fetch, FetchError, WeatherServiceMessage};

/// Everything a background task can report to the shell
#[derive(Debug)]
pub enum ShellMessage {
    Weather(WeatherServiceMessage),
    Location(LocationServiceMessage),
    Search(SearchServiceMessage),
}

pub type ShellSender = mpsc::UnboundedSender<ShellMessage>;
pub type ShellReceiver = mpsc::UnboundedReceiver<ShellMessage>;

pub fn channel() -> (ShellSender, ShellReceiver) {
    mpsc::unbounded_channel()
}
