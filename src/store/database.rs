use std::path::Path;

use tokio_rusqlite::Connection;
use tracing::debug;

use super::schema::{SCHEMA_VERSION, migrate};
use super::{SqliteProjectStore, SqliteRouteStore};
use crate::error::{StoreError, StoreResult};

/// Handle to the routecheck datastore.
///
/// Cloning is cheap; every clone talks to the same background connection.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the parent directory cannot be created, the file
    /// cannot be opened, or the schema is newer than this build understands.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source: err,
                })?;
        }
        let conn = Connection::open(path)
            .await
            .map_err(|err| StoreError::storage("open sqlite db", err))?;
        debug!("Opened database at {}", path.display());
        Self::initialize(conn).await
    }

    /// Opens a private in-memory database with the schema applied.
    ///
    /// # Errors
    ///
    /// Returns an error when SQLite cannot be initialised.
    pub async fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|err| StoreError::storage("open in-memory sqlite db", err))?;
        Self::initialize(conn).await
    }

    async fn initialize(conn: Connection) -> StoreResult<Self> {
        let found = conn
            .call(|conn| Ok(migrate(conn)?))
            .await
            .map_err(|err| StoreError::storage("initialize sqlite db", err))?;
        if found > SCHEMA_VERSION {
            return Err(StoreError::UnsupportedSchema {
                found,
                supported: SCHEMA_VERSION,
            });
        }
        if found < SCHEMA_VERSION {
            debug!("Migrated schema from version {} to {}", found, SCHEMA_VERSION);
        }
        Ok(Self { conn })
    }

    #[must_use]
    pub fn projects(&self) -> SqliteProjectStore {
        SqliteProjectStore::new(self.conn.clone())
    }

    #[must_use]
    pub fn routes(&self) -> SqliteRouteStore {
        SqliteRouteStore::new(self.conn.clone())
    }
}
