#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use skycast_api::{AppState, ReportDispatcher};
use skycast_mail::{DeliveryError, Notifier};
use skycast_store::{SqliteUserStore, StoreError, StoreResult, UserRecord, UserRepository, UserStore};
use skycast_weather::{WeatherError, WeatherPayload, WeatherSource};
use tokio_util::sync::CancellationToken;

pub const SUBJECT: &str = "Hourly Weather Report";

/// Weather source that records the locations it was asked for.
#[derive(Default)]
pub struct FakeWeather {
    pub fail: bool,
    pub lookups: Mutex<Vec<String>>,
}

impl FakeWeather {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().clone()
    }
}

#[async_trait]
impl WeatherSource for FakeWeather {
    async fn fetch(&self, location: &str) -> Result<WeatherPayload, WeatherError> {
        self.lookups.lock().push(location.to_string());
        if self.fail {
            return Err(WeatherError::LocationNotFound(location.to_string()));
        }
        Ok(WeatherPayload::new(json!({ "name": location, "main": { "temp": 285.1 } })))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Notifier that keeps every message it was handed.
#[derive(Default)]
pub struct FakeNotifier {
    pub fail: bool,
    pub sent: Mutex<Vec<SentMail>>,
    /// Cancelled after the first message is accepted
    pub cancel_after_send: Option<CancellationToken>,
}

impl FakeNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn cancelling(token: CancellationToken) -> Self {
        Self {
            cancel_after_send: Some(token),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        self.sent.lock().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        if self.fail {
            return Err(DeliveryError::Smtp("relay unavailable".to_string()));
        }
        if let Some(token) = &self.cancel_after_send {
            token.cancel();
        }
        Ok(())
    }
}

/// Store whose every operation fails, counting `list` calls.
#[derive(Default, Clone)]
pub struct BrokenStore {
    pub list_calls: Arc<AtomicUsize>,
}

impl BrokenStore {
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

fn disk_error<T>() -> StoreResult<T> {
    Err(StoreError::storage("disk I/O error"))
}

impl UserStore for BrokenStore {
    fn create(&self, _email: &str, _location: &str) -> StoreResult<UserRecord> {
        disk_error()
    }

    fn get(&self, _id: &str) -> StoreResult<Option<UserRecord>> {
        disk_error()
    }

    fn update_location(&self, _id: &str, _location: &str) -> StoreResult<UserRecord> {
        disk_error()
    }

    fn list(&self) -> StoreResult<Vec<UserRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        disk_error()
    }
}

pub struct Harness {
    pub users: UserRepository,
    pub reports: Arc<ReportDispatcher>,
    pub weather: Arc<FakeWeather>,
    pub notifier: Arc<FakeNotifier>,
}

impl Harness {
    pub fn new(weather: FakeWeather, notifier: FakeNotifier) -> Self {
        let users = UserRepository::new(SqliteUserStore::in_memory().unwrap());
        Self::with_users(users, weather, notifier)
    }

    pub fn broken(store: BrokenStore) -> Self {
        Self::with_users(
            UserRepository::new(store),
            FakeWeather::default(),
            FakeNotifier::default(),
        )
    }

    pub fn with_users(users: UserRepository, weather: FakeWeather, notifier: FakeNotifier) -> Self {
        let weather = Arc::new(weather);
        let notifier = Arc::new(notifier);
        let reports = Arc::new(ReportDispatcher::new(
            weather.clone(),
            notifier.clone(),
            SUBJECT,
        ));

        Self {
            users,
            reports,
            weather,
            notifier,
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.users.clone(), self.reports.clone())
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(FakeWeather::default(), FakeNotifier::default())
    }
}
