//! Plain-text report rendering.

use crate::types::WeatherPayload;

/// Render the email body for `location`.
///
/// A fixed heading followed by the provider's document as compact JSON.
pub fn format_report(location: &str, payload: &WeatherPayload) -> String {
    format!("Weather report for {}:{}", location, payload.as_json())
}
