//! Async, cloneable handle over a `UserStore`.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{StoreError, StoreResult, UserStore};
use crate::user::UserRecord;

/// Shared user store.
///
/// One instance is built at startup and cloned into every consumer. Calls
/// are serialized by a mutex and run on tokio's blocking pool.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<Mutex<Box<dyn UserStore>>>,
}

impl UserRepository {
    pub fn new<S: UserStore + 'static>(store: S) -> Self {
        let store: Box<dyn UserStore> = Box::new(store);
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn UserStore) -> StoreResult<T> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            let guard = store.lock();
            op(&**guard)
        })
        .await
        .map_err(|e| StoreError::storage(format!("Store task failed: {}", e)))?
    }

    /// Register a new user.
    pub async fn create_user(&self, email: &str, location: &str) -> StoreResult<UserRecord> {
        let email = email.to_string();
        let location = location.to_string();
        self.run(move |store| store.create(&email, &location)).await
    }

    /// Get a user by id.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` when no record matches.
    pub async fn get_user(&self, id: &str) -> StoreResult<UserRecord> {
        let id = id.to_string();
        self.run(move |store| store.get(&id)?.ok_or_else(|| StoreError::not_found(id)))
            .await
    }

    /// Overwrite a user's location.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` when no record matches.
    pub async fn update_location(&self, id: &str, location: &str) -> StoreResult<UserRecord> {
        let id = id.to_string();
        let location = location.to_string();
        self.run(move |store| store.update_location(&id, &location))
            .await
    }

    /// Snapshot of every stored user.
    pub async fn list_users(&self) -> StoreResult<Vec<UserRecord>> {
        self.run(|store| store.list()).await
    }
}
