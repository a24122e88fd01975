//! Weather lookup for Skycast
//!
//! Fetches current conditions from the OpenWeatherMap API for a free-text
//! location and renders them into the plain-text report that gets emailed.

pub mod provider;
pub mod report;
pub mod types;

pub use provider::{WeatherProvider, WeatherSource};
pub use report::format_report;
pub use types::*;
