//! Message store handler: owns the connection lifecycle and gates every
//! operation on a successful open.

use chat_core::StoredMessage;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::connection::{Connection, ConnectionState};
use crate::error::StorageError;
use crate::message_repo::MessageRepository;

/// Entry point for callers: `open`, then `insert_rows` / `get_messages_within_time_range`.
///
/// Operations before a successful [`open`](Self::open) fail with
/// [`StorageError::NotOpen`] without touching the database.
#[derive(Debug)]
pub struct MessageStoreHandler {
    config: StoreConfig,
    state: ConnectionState,
    repo: Option<MessageRepository>,
}

impl MessageStoreHandler {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            state: ConnectionState::Closed,
            repo: None,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.repo.is_some()
    }

    /// Opens the store, running the schema upgrade when it is new.
    ///
    /// Calling this on an open handler keeps the existing connection. After a
    /// failure the handler is `Failed` and `open` may be called again.
    pub async fn open(&mut self) -> Result<(), StorageError> {
        if self.repo.is_some() {
            debug!(db = %self.config.db_name, "Store already open");
            return Ok(());
        }

        self.transition(ConnectionState::Opening);
        match self.establish().await {
            Ok(connection) => {
                self.repo = Some(MessageRepository::new(connection));
                self.transition(ConnectionState::Open);
                Ok(())
            }
            Err(e) => {
                warn!(db = %self.config.db_name, error = %e, "Failed to open store");
                self.transition(ConnectionState::Failed);
                Err(e)
            }
        }
    }

    async fn establish(&mut self) -> Result<Connection, StorageError> {
        let mut connection = Connection::connect(&self.config).await?;
        if connection.needs_upgrade() {
            self.transition(ConnectionState::SchemaInit);
            connection.upgrade().await?;
        }
        Ok(connection)
    }

    /// Releases the connection; later operations fail with `NotOpen` until reopened.
    pub async fn close(&mut self) {
        if let Some(repo) = self.repo.take() {
            repo.into_connection().close().await;
        }
        self.transition(ConnectionState::Closed);
    }

    fn transition(&mut self, next: ConnectionState) {
        debug!(db = %self.config.db_name, from = ?self.state, to = ?next, "Store state change");
        if next == ConnectionState::Open {
            info!(db = %self.config.db_name, store = %self.config.store_name, "Store open");
        }
        self.state = next;
    }

    /// The repository behind the open connection.
    pub fn repository(&self) -> Result<&MessageRepository, StorageError> {
        self.repo.as_ref().ok_or(StorageError::NotOpen)
    }

    pub async fn insert_rows(&self, records: &[StoredMessage]) -> Result<(), StorageError> {
        self.repository()?.insert_rows(records).await
    }

    pub async fn get_messages_within_time_range(
        &self,
        start_time: i64,
        end_time: i64,
    ) -> Result<Vec<StoredMessage>, StorageError> {
        self.repository()?
            .get_messages_within_time_range(start_time, end_time)
            .await
    }

    pub async fn count_messages(&self) -> Result<i64, StorageError> {
        self.repository()?.count_messages().await
    }
}
