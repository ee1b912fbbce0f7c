//! Terminal presentation shell for Nimbus
//!
//! Holds the dashboard state, runs fetches, geolocation and place search in
//! the background, and renders the result as styled text.

pub mod commands;
pub mod controller;
mod error_mapping;
pub mod render;
pub mod services;
pub mod state;
pub mod theme;

pub use commands::{Command, CommandError};
pub use controller::{Reply, Shell, ShellServices};
pub use services::{ShellMessage, ShellReceiver};
pub use state::{AppState, FetchRequest, Phase};
pub use theme::Theme;
