//! Lookup, format and send one report.

use std::sync::Arc;

use skycast_core::AppError;
use skycast_mail::Notifier;
use skycast_store::UserRecord;
use skycast_weather::{format_report, WeatherSource};

/// What happened to one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The relay accepted the email
    Delivered,
    /// The weather lookup failed; nothing was sent
    LookupFailed(String),
    /// The report was built but the relay refused or was unreachable
    DeliveryFailed(String),
}

impl DispatchOutcome {
    pub fn delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered)
    }
}

/// Sends weather reports. Shared by the HTTP handlers and the scheduler.
pub struct ReportDispatcher {
    weather: Arc<dyn WeatherSource>,
    notifier: Arc<dyn Notifier>,
    subject: String,
}

impl ReportDispatcher {
    pub fn new(
        weather: Arc<dyn WeatherSource>,
        notifier: Arc<dyn Notifier>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            weather,
            notifier,
            subject: subject.into(),
        }
    }

    /// Look up the weather at the user's location and email the report.
    ///
    /// Never fails: lookup and delivery errors are logged and returned as
    /// the outcome.
    pub async fn dispatch(&self, user: &UserRecord) -> DispatchOutcome {
        let payload = match self.weather.fetch(&user.location).await {
            Ok(payload) => payload,
            Err(e) => {
                let err = AppError::from(e);
                tracing::error!("Error fetching weather data for user {}: {}", user.id, err);
                return DispatchOutcome::LookupFailed(err.to_string());
            }
        };

        let report = format_report(&user.location, &payload);

        match self.notifier.send(&user.email, &self.subject, &report).await {
            Ok(()) => DispatchOutcome::Delivered,
            Err(e) => {
                let err = AppError::from(e);
                tracing::error!("Error sending weather report to user {}: {}", user.id, err);
                DispatchOutcome::DeliveryFailed(err.to_string())
            }
        }
    }
}
