//! SQLite-based user storage.

use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use uuid::Uuid;

use crate::backend::{StoreError, StoreResult, UserStore};
use crate::user::UserRecord;

/// SQLite-based user storage.
pub struct SqliteUserStore {
    conn: Connection,
}

impl SqliteUserStore {
    /// Open or create the database at `path`.
    ///
    /// Missing parent directories and the schema are created.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let conn = Connection::open(path).context("Failed to open users database")?;
        let store = Self { conn };
        store.init_schema()?;

        tracing::debug!("Opened user store at {}", path.display());
        Ok(store)
    }

    /// Create an in-memory store. Contents are lost on drop.
    pub fn in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                location TEXT NOT NULL
            );",
            )
            .context("Failed to initialize schema")?;
        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<UserRecord> {
        Ok(UserRecord {
            id: row.get(0)?,
            email: row.get(1)?,
            location: row.get(2)?,
        })
    }
}

impl UserStore for SqliteUserStore {
    fn create(&self, email: &str, location: &str) -> StoreResult<UserRecord> {
        let id = Uuid::new_v4().to_string();

        self.conn.execute(
            "INSERT INTO users (id, email, location) VALUES (?1, ?2, ?3)",
            params![id, email, location],
        )?;

        tracing::debug!("Created user with ID: {}", id);

        Ok(UserRecord {
            id,
            email: email.to_string(),
            location: location.to_string(),
        })
    }

    fn get(&self, id: &str) -> StoreResult<Option<UserRecord>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, email, location FROM users WHERE id = ?1",
                params![id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    fn update_location(&self, id: &str, location: &str) -> StoreResult<UserRecord> {
        let changed = self.conn.execute(
            "UPDATE users SET location = ?1 WHERE id = ?2",
            params![location, id],
        )?;

        if changed == 0 {
            return Err(StoreError::not_found(id));
        }

        self.get(id)?
            .ok_or_else(|| StoreError::storage(format!("User {} vanished after update", id)))
    }

    fn list(&self) -> StoreResult<Vec<UserRecord>> {
        let mut stmt = self.conn.prepare("SELECT id, email, location FROM users")?;

        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }
}
