pub mod conversation_repository;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::ConversationRecord;

/// Append-only log of completed exchanges.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn insert(&self, record: &ConversationRecord) -> Result<(), AppError>;

    /// Newest first, at most `limit` records.
    async fn find_recent(&self, limit: i64) -> Result<Vec<ConversationRecord>, AppError>;
}

#[cfg(test)]
pub mod memory {
    use std::sync::Mutex;

    use super::*;

    /// In-process store for service and route tests.
    #[derive(Default)]
    pub struct MemoryStore {
        records: Mutex<Vec<ConversationRecord>>,
        pub fail_writes: bool,
    }

    impl MemoryStore {
        pub fn failing() -> Self {
            Self { fail_writes: true, ..Self::default() }
        }

        pub fn records(&self) -> Vec<ConversationRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConversationStore for MemoryStore {
        async fn insert(&self, record: &ConversationRecord) -> Result<(), AppError> {
            if self.fail_writes {
                return Err(AppError::db_query("write rejected", sqlx::Error::PoolTimedOut));
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn find_recent(&self, limit: i64) -> Result<Vec<ConversationRecord>, AppError> {
            let mut records = self.records();
            records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            records.truncate(limit.max(0) as usize);
            Ok(records)
        }
    }
}
