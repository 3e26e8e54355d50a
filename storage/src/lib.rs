//! Message store crate: persistence of chat message documents in SQLite.
//!
//! ## Modules
//!
//! - [`config`] – StoreConfig (database name, store name, location)
//! - [`connection`] – Connection, ConnectionState; open and schema upgrade
//! - [`message_repo`] – MessageRepository: bulk insert and date-range scan
//! - [`handler`] – MessageStoreHandler: lifecycle-gated façade
//! - [`repository`] – Repository trait
//! - [`error`] – StorageError

mod config;
mod connection;
mod error;
mod handler;
mod message_repo;
mod repository;
mod schema;


pub use chat_core::{MessageContent, StoredMessage, TextContent, TimeRange};
pub use config::{StoreConfig, IN_MEMORY};
pub use connection::{Connection, ConnectionState};
pub use error::StorageError;
pub use handler::MessageStoreHandler;
pub use message_repo::MessageRepository;
pub use repository::Repository;
