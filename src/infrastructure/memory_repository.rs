// In-process blend store
use crate::application::blend_repository::BlendRepository;
use crate::domain::blend::{BlendId, BlendPayload, BlendRecord};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Keeps blends in memory for the lifetime of the process. Every operation
/// takes the lock once, so replace-all is atomic to readers.
#[derive(Debug, Default)]
pub struct MemoryBlendRepository {
    records: RwLock<Vec<BlendRecord>>,
}

impl MemoryBlendRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlendRepository for MemoryBlendRepository {
    async fn latest(&self) -> Result<Option<BlendRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().max_by_key(|r| r.updated_at).cloned())
    }

    async fn replace_all(&self, record: &BlendRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.clear();
        records.push(record.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: BlendId,
        payload: &BlendPayload,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<BlendId>> {
        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        record.apply(payload.clone(), updated_at);
        Ok(Some(record.id))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.read().await.len() as u64)
    }
}
