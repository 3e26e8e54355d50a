//! Store location and naming, loaded from the environment.

use std::env;
use std::path::PathBuf;

use chat_core::{DEFAULT_DB_NAME, DEFAULT_STORE_NAME};

/// `data_dir` value selecting a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Which database to open and what to call its record container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_name: String,
    pub store_name: String,
    /// Directory holding `<db_name>.db`, or [`IN_MEMORY`].
    pub data_dir: String,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<String>) -> Self {
        Self {
            db_name: DEFAULT_DB_NAME.to_string(),
            store_name: DEFAULT_STORE_NAME.to_string(),
            data_dir: data_dir.into(),
        }
    }

    /// Default names, nothing written to disk.
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY)
    }

    /// Reads `CHAT_DB_NAME`, `CHAT_STORE_NAME` and `CHAT_DATA_DIR`, falling back to defaults.
    pub fn from_env() -> Self {
        let db_name = env::var("CHAT_DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string());
        let store_name =
            env::var("CHAT_STORE_NAME").unwrap_or_else(|_| DEFAULT_STORE_NAME.to_string());
        let data_dir = env::var("CHAT_DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        Self {
            db_name,
            store_name,
            data_dir,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.data_dir == IN_MEMORY
    }

    /// Path of the database file; `None` for in-memory stores.
    pub fn database_path(&self) -> Option<PathBuf> {
        if self.is_in_memory() {
            None
        } else {
            Some(PathBuf::from(&self.data_dir).join(format!("{}.db", self.db_name)))
        }
    }
}
