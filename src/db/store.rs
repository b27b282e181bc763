use async_trait::async_trait;
use mongodb::bson::{Bson, Document, Timestamp};
use thiserror::Error;

pub const TRIPS: &str = "trips";
pub const AI_GENERATED_TRIPS: &str = "ai_generated_trips";
pub const USERS: &str = "users";
pub const USER_ACTIVITIES: &str = "user_activities";

/// Placeholder for a field whose value the store assigns at write time.
///
/// Any top-level field holding this value is replaced by the store's own
/// clock when the document is added.
pub const SERVER_TIMESTAMP: Bson = Bson::Timestamp(Timestamp {
    time: 0,
    increment: 0,
});

pub fn is_server_timestamp(value: &Bson) -> bool {
    matches!(value, Bson::Timestamp(Timestamp { time: 0, increment: 0 }))
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("write failed: {0}")]
    Write(String),
    #[error("read failed: {0}")]
    Read(String),
    /// Rejected before reaching the store.
    #[error("malformed document: {0}")]
    Malformed(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Write(err.to_string())
    }
}

/// Per-user document persistence used by the trip services.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts one document and returns its generated identifier.
    async fn add(&self, collection: &str, fields: Document) -> Result<String, StoreError>;

    /// All documents of `collection` owned by `user_id`, newest first.
    async fn find_by_user(
        &self,
        collection: &str,
        user_id: &str,
    ) -> Result<Vec<Document>, StoreError>;

    /// The document stored under `id`, if any.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Creates the document under `id` or overwrites the given fields of it.
    async fn merge(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError>;

    /// At most `limit` documents of `user_id`, ordered by `order_by` descending.
    async fn recent_by_user(
        &self,
        collection: &str,
        user_id: &str,
        order_by: &str,
        limit: i64,
    ) -> Result<Vec<Document>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
