//! Record model: the stored message document, its content payload, and the time range query input.
//!
//! Field names on the wire are camelCase; optional fields are omitted from the
//! document entirely when absent.

use serde::{Deserialize, Serialize};

/// Schema version requested when opening the store.
pub const DB_VERSION: i64 = 1;

/// Default database name.
pub const DEFAULT_DB_NAME: &str = "chat";

/// Default name of the single record container.
pub const DEFAULT_STORE_NAME: &str = "message";

/// Index over `conversationId`.
pub const CONVERSATION_ID_INDEX: &str = "conversationId";

/// Index over `date`; the one the range reader scans.
pub const DATE_INDEX: &str = "date";

/// Composite index over `(source, conversationId, date)`.
pub const COMPOSITE_INDEX: &str = "[source + conversationId + date]";

/// A persisted chat message. `mid` is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub clock: i64,
    pub conversation_id: String,
    /// Epoch milliseconds; the field range queries run against.
    pub date: i64,
    pub edited_at: i64,
    pub forward: Vec<i64>,
    pub host_peer_id: i64,
    pub is_temp_message: bool,
    pub message_content: MessageContent,
    /// Format `-<int>|<int>`.
    pub mid: String,
    pub prev_mid: String,
    pub random_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<String>,
    pub reply: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_peer_id: Option<String>,
    pub sender_uid: i64,
    pub source: String,
    pub state: String,
    pub thread_id: String,
}

/// Tagged message payload; `{ "type": "text", "text": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text { text: TextContent },
}

impl MessageContent {
    pub fn text(text: TextContent) -> Self {
        MessageContent::Text { text }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub markdown: bool,
    pub media: Vec<String>,
    pub mentions: Vec<String>,
    pub text: String,
}

/// Closed interval `[start_time, end_time]` in epoch milliseconds.
///
/// `start_time <= end_time` is expected but not enforced; an inverted range
/// simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_time: i64,
    pub end_time: i64,
}

impl TimeRange {
    pub fn new(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Whether `date` falls inside the range, bounds included.
    pub fn contains(&self, date: i64) -> bool {
        self.start_time <= date && date <= self.end_time
    }

    pub fn is_inverted(&self) -> bool {
        self.start_time > self.end_time
    }
}
