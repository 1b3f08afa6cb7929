// Repository trait for blend persistence
use crate::domain::blend::{BlendId, BlendPayload, BlendRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait BlendRepository: Send + Sync {
    /// The record with the most recent update timestamp, if any
    async fn latest(&self) -> anyhow::Result<Option<BlendRecord>>;

    /// Discard every stored record and store `record` in their place,
    /// as one atomic step
    async fn replace_all(&self, record: &BlendRecord) -> anyhow::Result<()>;

    /// Overwrite the content of the record with `id` and stamp it with
    /// `updated_at`. Returns None when no such record exists.
    async fn update(
        &self,
        id: BlendId,
        payload: &BlendPayload,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<Option<BlendId>>;

    /// Number of stored records
    async fn count(&self) -> anyhow::Result<u64>;
}
