//! User record storage for Skycast.
//!
//! `UserStore` is the synchronous storage contract, `SqliteUserStore` the
//! rusqlite implementation and `UserRepository` the async handle shared by
//! the HTTP handlers and the scheduler.

pub mod backend;
pub mod repository;
pub mod sqlite;
pub mod user;

pub use backend::{StoreError, StoreResult, UserStore};
pub use repository::UserRepository;
pub use sqlite::SqliteUserStore;
pub use user::UserRecord;
