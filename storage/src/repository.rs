//! Repository trait: the write/read surface shared by the raw repository and the handler.

use async_trait::async_trait;
use chat_core::{StoredMessage, TimeRange};

use crate::error::StorageError;
use crate::handler::MessageStoreHandler;
use crate::message_repo::MessageRepository;

#[async_trait]
pub trait Repository: Send + Sync {
    async fn insert_rows(&self, records: &[StoredMessage]) -> Result<(), StorageError>;

    async fn get_messages_within_time_range(
        &self,
        start_time: i64,
        end_time: i64,
    ) -> Result<Vec<StoredMessage>, StorageError>;

    async fn count_messages(&self) -> Result<i64, StorageError>;

    async fn get_messages_in(&self, range: &TimeRange) -> Result<Vec<StoredMessage>, StorageError> {
        self.get_messages_within_time_range(range.start_time, range.end_time)
            .await
    }
}

#[async_trait]
impl Repository for MessageRepository {
    async fn insert_rows(&self, records: &[StoredMessage]) -> Result<(), StorageError> {
        MessageRepository::insert_rows(self, records).await
    }

    async fn get_messages_within_time_range(
        &self,
        start_time: i64,
        end_time: i64,
    ) -> Result<Vec<StoredMessage>, StorageError> {
        MessageRepository::get_messages_within_time_range(self, start_time, end_time).await
    }

    async fn count_messages(&self) -> Result<i64, StorageError> {
        MessageRepository::count_messages(self).await
    }
}

#[async_trait]
impl Repository for MessageStoreHandler {
    async fn insert_rows(&self, records: &[StoredMessage]) -> Result<(), StorageError> {
        MessageStoreHandler::insert_rows(self, records).await
    }

    async fn get_messages_within_time_range(
        &self,
        start_time: i64,
        end_time: i64,
    ) -> Result<Vec<StoredMessage>, StorageError> {
        MessageStoreHandler::get_messages_within_time_range(self, start_time, end_time).await
    }

    async fn count_messages(&self) -> Result<i64, StorageError> {
        MessageStoreHandler::count_messages(self).await
    }
}
