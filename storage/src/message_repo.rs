//! Message repository: bulk insertion and date-range retrieval over an open [`Connection`].
//!
//! Each call runs in its own transaction. Records are stored as their JSON
//! document alongside the indexed columns copied out of it.

use std::time::Instant;

use chat_core::{StoredMessage, DATE_INDEX};
use futures::TryStreamExt;
use sqlx::Row;
use tracing::{debug, info, warn};

use crate::connection::Connection;
use crate::error::StorageError;
use crate::schema;

#[derive(Debug, Clone)]
pub struct MessageRepository {
    connection: Connection,
}

impl MessageRepository {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn into_connection(self) -> Connection {
        self.connection
    }

    /// Inserts `records` in one read-write transaction, in the order given.
    ///
    /// All or nothing: the first failing insert rolls the transaction back and
    /// is returned as [`StorageError::WriteFailed`]. Existing keys are never
    /// overwritten.
    pub async fn insert_rows(&self, records: &[StoredMessage]) -> Result<(), StorageError> {
        let store = self.connection.store_name();
        let sql = format!(
            r#"INSERT INTO "{}" (mid, conversation_id, date, source, value) VALUES (?1, ?2, ?3, ?4, ?5)"#,
            store
        );

        let mut tx = self
            .connection
            .pool()
            .begin()
            .await
            .map_err(|e| StorageError::write(None, &e))?;

        let mut failure = None;
        for record in records {
            let value = match serde_json::to_string(record) {
                Ok(value) => value,
                Err(e) => {
                    failure = Some(StorageError::malformed(&record.mid, &e));
                    break;
                }
            };

            let outcome = sqlx::query(&sql)
                .bind(&record.mid)
                .bind(&record.conversation_id)
                .bind(record.date)
                .bind(&record.source)
                .bind(value)
                .execute(&mut *tx)
                .await;

            if let Err(e) = outcome {
                failure = Some(StorageError::write(Some(&record.mid), &e));
                break;
            }
        }

        if let Some(err) = failure {
            warn!(store, error = %err, "Insert failed, rolling back batch");
            if let Err(e) = tx.rollback().await {
                warn!(store, error = %e, "Rollback failed");
            }
            return Err(err);
        }

        tx.commit().await.map_err(|e| StorageError::write(None, &e))?;

        info!(store, count = records.len(), "Inserted rows");
        Ok(())
    }

    /// Returns every record with `start_time <= date <= end_time`, ascending by `date`.
    ///
    /// Walks the `date` index with a cursor inside one transaction; records
    /// sharing a `date` come back in no particular order. The scan duration
    /// is logged.
    pub async fn get_messages_within_time_range(
        &self,
        start_time: i64,
        end_time: i64,
    ) -> Result<Vec<StoredMessage>, StorageError> {
        let store = self.connection.store_name();
        let sql = format!(
            r#"SELECT value FROM "{}" INDEXED BY "{}" WHERE date BETWEEN ?1 AND ?2 ORDER BY date"#,
            store,
            schema::index_name(store, DATE_INDEX)
        );

        let started = Instant::now();
        let mut tx = self
            .connection
            .pool()
            .begin()
            .await
            .map_err(StorageError::read)?;

        let messages = {
            let mut cursor = sqlx::query(&sql)
                .bind(start_time)
                .bind(end_time)
                .fetch(&mut *tx);

            let mut messages = Vec::new();
            while let Some(row) = cursor.try_next().await.map_err(StorageError::read)? {
                let value: String = row.try_get("value").map_err(StorageError::read)?;
                let message: StoredMessage =
                    serde_json::from_str(&value).map_err(StorageError::read)?;
                messages.push(message);
            }
            messages
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        tx.commit().await.map_err(StorageError::read)?;

        info!(
            store,
            start_time,
            end_time,
            count = messages.len(),
            elapsed_ms,
            "Request completed in {} ms",
            elapsed_ms
        );
        Ok(messages)
    }

    /// Number of records in the store.
    pub async fn count_messages(&self) -> Result<i64, StorageError> {
        let store = self.connection.store_name();
        let count: i64 = sqlx::query_scalar(&format!(r#"SELECT COUNT(*) FROM "{}""#, store))
            .fetch_one(self.connection.pool())
            .await
            .map_err(StorageError::read)?;

        debug!(store, count, "Counted messages");
        Ok(count)
    }
}
