//! SQLite connection for the message store: opens the database and runs the schema upgrade.

use std::fs;
use std::str::FromStr;
use std::time::Duration;

use chat_core::DB_VERSION;
use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::StorageError;
use crate::schema;

/// Lifecycle of a store handle: `Closed → Opening → {SchemaInit →} Open | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Closed,
    Opening,
    SchemaInit,
    Open,
    Failed,
}

/// One live handle to a named message store.
///
/// Owned by its caller and passed to the writer and reader; dropping or
/// [`close`](Connection::close)-ing it releases the pool.
#[derive(Debug, Clone)]
pub struct Connection {
    pool: SqlitePool,
    store_name: String,
    version: i64,
}

impl Connection {
    /// Opens the store, defining the schema first if the database is new or older than [`DB_VERSION`].
    pub async fn open(config: &StoreConfig) -> Result<Self, StorageError> {
        let mut connection = Self::connect(config).await?;
        if connection.needs_upgrade() {
            connection.upgrade().await?;
        }
        Ok(connection)
    }

    /// Connects and reads the stored schema version without changing anything.
    pub(crate) async fn connect(config: &StoreConfig) -> Result<Self, StorageError> {
        schema::validate_store_name(&config.store_name)?;

        let pool = Self::create_pool(config)
            .await
            .map_err(StorageError::unavailable)?;

        let version = {
            let mut conn = pool.acquire().await.map_err(StorageError::unavailable)?;
            schema::read_version(&mut *conn)
                .await
                .map_err(StorageError::unavailable)?
        };

        if version > DB_VERSION {
            pool.close().await;
            return Err(StorageError::unavailable(format!(
                "stored version {} is newer than requested version {}",
                version, DB_VERSION
            )));
        }

        debug!(db = %config.db_name, version, "Connected to message database");
        Ok(Self {
            pool,
            store_name: config.store_name.clone(),
            version,
        })
    }

    async fn create_pool(config: &StoreConfig) -> Result<SqlitePool, sqlx::Error> {
        match config.database_path() {
            Some(path) => {
                info!("Initializing SQLite pool: {}", path.display());
                fs::create_dir_all(&config.data_dir)?;

                let options = SqliteConnectOptions::new()
                    .create_if_missing(true)
                    .filename(path)
                    .busy_timeout(Duration::from_secs(5));

                SqlitePoolOptions::new().connect_with(options).await
            }
            None => {
                info!("Initializing in-memory SQLite pool: {}", config.db_name);

                // Each in-memory connection is its own database, so the pool
                // keeps exactly one connection alive for the handle's lifetime.
                let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

                SqlitePoolOptions::new()
                    .min_connections(1)
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await
            }
        }
    }

    pub(crate) fn needs_upgrade(&self) -> bool {
        self.version < DB_VERSION
    }

    /// Runs the upgrade under `BEGIN IMMEDIATE`, so concurrent openers of the
    /// same file take turns; whoever gets the write lock second sees the new
    /// version and skips the schema definition.
    pub(crate) async fn upgrade(&mut self) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::unavailable)?;

        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(StorageError::unavailable)?;

        let outcome = match Self::upgrade_locked(&mut *conn, &self.store_name).await {
            Ok(version) => sqlx::query("COMMIT")
                .execute(&mut *conn)
                .await
                .map(|_| version),
            Err(e) => Err(e),
        };

        let version = match outcome {
            Ok(version) => version,
            Err(e) => {
                if let Err(rollback) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                    warn!(store = %self.store_name, error = %rollback, "Upgrade rollback failed");
                }
                return Err(StorageError::unavailable(e));
            }
        };

        if version > DB_VERSION {
            return Err(StorageError::unavailable(format!(
                "stored version {} is newer than requested version {}",
                version, DB_VERSION
            )));
        }
        self.version = version;
        Ok(())
    }

    /// Re-reads the version while holding the write lock and defines the schema only if still needed.
    async fn upgrade_locked(conn: &mut SqliteConnection, store: &str) -> Result<i64, sqlx::Error> {
        let version = schema::read_version(&mut *conn).await?;
        if version >= DB_VERSION {
            debug!(store, version, "Schema already defined by a concurrent open");
            return Ok(version);
        }

        schema::define_schema(&mut *conn, store).await?;
        Ok(DB_VERSION)
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Schema version the database is at.
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Names of the store's secondary indexes, without the store prefix, sorted.
    pub async fn index_names(&self) -> Result<Vec<String>, StorageError> {
        let prefix = schema::index_name(&self.store_name, "");
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = ?1 AND name LIKE ?2 || '%' ORDER BY name",
        )
        .bind(&self.store_name)
        .bind(&prefix)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::read)?;

        Ok(names
            .into_iter()
            .filter_map(|name| name.strip_prefix(&prefix).map(str::to_string))
            .collect())
    }

    /// Closes the pool; in-memory data is gone afterwards.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
