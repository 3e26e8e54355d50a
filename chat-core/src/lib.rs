//! # chat-core
//!
//! Shared record model for the chat message store: [`StoredMessage`], its
//! [`MessageContent`] payload, the [`TimeRange`] query input, schema constants,
//! and tracing initialization. Used by storage, seed-messages and chat-cli.

pub mod logger;
pub mod types;

pub use logger::{init_tracing, DEFAULT_LOG_FILE};
pub use types::{
    MessageContent, StoredMessage, TextContent, TimeRange, COMPOSITE_INDEX,
    CONVERSATION_ID_INDEX, DATE_INDEX, DB_VERSION, DEFAULT_DB_NAME, DEFAULT_STORE_NAME,
};
