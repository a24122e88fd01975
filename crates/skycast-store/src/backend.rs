//! Storage trait and error types for user records.

use skycast_core::AppError;
use thiserror::Error;

use crate::user::UserRecord;

/// Errors that can occur during user store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record has the given id.
    #[error("User not found: {0}")]
    NotFound(String),

    /// Database failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(id),
            StoreError::Storage(message) => AppError::Store(message),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for user record storage backends.
///
/// Implementations don't need to be Sync - `UserRepository` serializes
/// access through a mutex.
pub trait UserStore: Send {
    /// Insert a new record and return it with its assigned id.
    ///
    /// Duplicate emails are accepted.
    fn create(&self, email: &str, location: &str) -> StoreResult<UserRecord>;

    /// Get a record by id.
    ///
    /// Returns `None` if no record matches.
    fn get(&self, id: &str) -> StoreResult<Option<UserRecord>>;

    /// Overwrite the location of an existing record.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no record matches; nothing is created.
    fn update_location(&self, id: &str, location: &str) -> StoreResult<UserRecord>;

    /// Every stored record, in no particular order.
    fn list(&self) -> StoreResult<Vec<UserRecord>>;
}
