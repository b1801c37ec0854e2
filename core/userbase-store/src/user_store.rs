//! Persistent user storage backed by SQLite.

use crate::error::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use userbase_model::{User, UserId};

const CREATE_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT UNIQUE DEFAULT NULL,
        gender TEXT DEFAULT NULL
    );
";

const DROP_SCHEMA: &str = "DROP TABLE IF EXISTS users;";

/// Store for [`User`] rows. Cloning shares the underlying connection.
#[derive(Clone)]
pub struct UserStore {
    conn: Arc<Mutex<Connection>>,
}

impl UserStore {
    /// Opens (or creates) a database file at `path`.
    ///
    /// The schema is not touched; call [`UserStore::create_schema`] first on a
    /// new database.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        debug!("opening user store at {}", path.display());
        let conn = Connection::open(path)?;
        Ok(Self::from_connection(conn))
    }

    /// Opens an in-memory store with the schema already created (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let store = Self::from_connection(Connection::open_in_memory()?);
        store.create_schema()?;
        Ok(store)
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    // ── Schema maintenance ───────────────────────────────────────

    /// Creates the `users` table if it does not exist.
    pub fn create_schema(&self) -> StoreResult<()> {
        self.lock()?.execute_batch(CREATE_SCHEMA)?;
        info!("users table ready");
        Ok(())
    }

    /// Drops the `users` table and every row in it.
    pub fn drop_schema(&self) -> StoreResult<()> {
        self.lock()?.execute_batch(DROP_SCHEMA)?;
        info!("users table dropped");
        Ok(())
    }

    // ── Users ────────────────────────────────────────────────────

    /// Inserts a new row and returns the id SQLite assigned to it.
    ///
    /// Any id already set on `user` is ignored.
    pub fn insert(&self, user: &User) -> StoreResult<UserId> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO users (name, gender) VALUES (?1, ?2)",
            params![user.name(), user.gender().map(|g| g.as_str())],
        )
        .map_err(|e| StoreError::from_write(e, user.name()))?;
        let id = UserId::new(conn.last_insert_rowid());
        debug!("inserted user {}", id);
        Ok(id)
    }

    /// Looks up a user by id.
    pub fn get(&self, id: UserId) -> StoreResult<Option<User>> {
        let conn = self.lock()?;
        let user = conn
            .query_row(
                "SELECT id, name, gender FROM users WHERE id = ?1",
                params![id.get()],
                read_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Returns every user, ordered by id.
    pub fn list(&self) -> StoreResult<Vec<User>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name, gender FROM users ORDER BY id")?;
        let rows = stmt.query_map([], read_user)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Writes back the `name` and `gender` of an already persisted user.
    pub fn update(&self, user: &User) -> StoreResult<()> {
        let id = user.id().ok_or(StoreError::NotPersisted)?;
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE users SET name = ?1, gender = ?2 WHERE id = ?3",
                params![user.name(), user.gender().map(|g| g.as_str()), id.get()],
            )
            .map_err(|e| StoreError::from_write(e, user.name()))?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!("updated user {}", id);
        Ok(())
    }

    /// Returns the number of stored users.
    pub fn count(&self) -> StoreResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn read_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let id: i64 = row.get(0)?;
    let name: Option<String> = row.get(1)?;
    let gender: Option<String> = row.get(2)?;
    Ok(User::from_row(UserId::new(id), name, gender.as_deref()))
}
