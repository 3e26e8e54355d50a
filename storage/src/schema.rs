//! Schema definition for the message store.
//!
//! The container is one table keyed by `mid`; indexed attributes are copied
//! out of the JSON document into their own columns so SQLite indexes can
//! cover them.
//!
//! ```sql
//! CREATE TABLE "<store>" (
//!     mid TEXT PRIMARY KEY NOT NULL,
//!     conversation_id TEXT NOT NULL,
//!     date INTEGER NOT NULL,
//!     source TEXT NOT NULL,
//!     value TEXT NOT NULL
//! );
//! ```

use chat_core::{COMPOSITE_INDEX, CONVERSATION_ID_INDEX, DATE_INDEX, DB_VERSION};
use sqlx::SqliteConnection;
use tracing::info;

use crate::error::StorageError;

/// Store names are spliced into SQL, so only plain identifiers are accepted.
pub(crate) fn validate_store_name(name: &str) -> Result<(), StorageError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(StorageError::unavailable(format!(
            "invalid store name: {:?}",
            name
        )))
    }
}

/// SQL name of one of the store's indexes; prefixed so several stores can share a database.
pub(crate) fn index_name(store: &str, index: &str) -> String {
    format!("{}.{}", store, index)
}

pub(crate) async fn read_version(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(conn)
        .await
}

/// Creates the container and its three non-unique indexes, then stamps the version.
///
/// Runs once per upgrade; the statements are not `IF NOT EXISTS`, so a
/// pre-existing table with the same name fails the upgrade.
pub(crate) async fn define_schema(
    conn: &mut SqliteConnection,
    store: &str,
) -> Result<(), sqlx::Error> {
    info!(store, version = DB_VERSION, "Defining message store schema");

    sqlx::query(&format!(
        r#"
        CREATE TABLE "{store}" (
            mid TEXT PRIMARY KEY NOT NULL,
            conversation_id TEXT NOT NULL,
            date INTEGER NOT NULL,
            source TEXT NOT NULL,
            value TEXT NOT NULL
        )
        "#
    ))
    .execute(&mut *conn)
    .await?;

    let indexes = [
        (CONVERSATION_ID_INDEX, "conversation_id"),
        (DATE_INDEX, "date"),
        (COMPOSITE_INDEX, "source, conversation_id, date"),
    ];
    for (index, columns) in indexes {
        sqlx::query(&format!(
            r#"CREATE INDEX "{}" ON "{}" ({})"#,
            index_name(store, index),
            store,
            columns
        ))
        .execute(&mut *conn)
        .await?;
    }

    sqlx::query(&format!("PRAGMA user_version = {}", DB_VERSION))
        .execute(&mut *conn)
        .await?;

    info!(store, "Message store schema defined");
    Ok(())
}
