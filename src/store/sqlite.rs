/*!
 * SQLite-backed script store.
 *
 * The connection is guarded by a mutex; listeners are notified after the
 * statement completes and the lock is released.
 */

use std::path::{Path, PathBuf};

use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};

use super::notifier::{ChangeEvent, ChangeNotifier, Listener, SubscriptionId};
use super::{ScriptStore, StoreResult, schema};
use crate::errors::StoreError;

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "multilogue.db";

/// Default directory name under the user's data directory
const DEFAULT_DB_DIRNAME: &str = "multilogue";

/// Persistent store kept in a SQLite file
pub struct SqliteStore {
    db_path: PathBuf,
    connection: Mutex<Connection>,
    notifier: ChangeNotifier,
}

impl SqliteStore {
    /// Open (creating if needed) the database at the default location
    pub fn open_default() -> StoreResult<Self> {
        let db_path = Self::default_database_path()?;
        Self::open(&db_path)
    }

    /// Open (creating if needed) the database at `db_path`
    pub fn open<P: AsRef<Path>>(db_path: P) -> StoreResult<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Opening script store at: {:?}", db_path);
        let conn = Connection::open(&db_path)?;
        Self::from_connection(conn, db_path)
    }

    /// Database that lives only as long as the store (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        debug!("Creating in-memory script store");
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, PathBuf::from(":memory:"))
    }

    fn from_connection(conn: Connection, db_path: PathBuf) -> StoreResult<Self> {
        schema::initialize_schema(&conn)?;
        Ok(Self {
            db_path,
            connection: Mutex::new(conn),
            notifier: ChangeNotifier::new(),
        })
    }

    /// Platform data directory location of the default database
    pub fn default_database_path() -> StoreResult<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| StoreError::Location("no data or home directory".to_string()))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }

    /// Database file path (`:memory:` for in-memory stores)
    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

impl ScriptStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.connection.lock();
        let value = conn
            .query_row("SELECT value FROM entries WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        {
            let conn = self.connection.lock();
            conn.execute(
                "INSERT INTO entries (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value],
            )?;
        }
        debug!("Stored {} bytes under '{}'", value.len(), key);
        self.notifier.publish(&ChangeEvent::set(key, value));
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let deleted = {
            let conn = self.connection.lock();
            conn.execute("DELETE FROM entries WHERE key = ?1", [key])?
        };
        self.notifier.publish(&ChangeEvent::remove(key));
        Ok(deleted > 0)
    }

    fn clear(&self) -> StoreResult<()> {
        {
            let conn = self.connection.lock();
            conn.execute("DELETE FROM entries", [])?;
        }
        self.notifier.publish(&ChangeEvent::clear());
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare("SELECT key FROM entries ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("db_path", &self.db_path)
            .field("notifier", &self.notifier)
            .finish()
    }
}
