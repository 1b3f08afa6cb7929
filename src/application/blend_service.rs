// Blend service - Use cases for the single-slot blend store
use crate::application::blend_repository::BlendRepository;
use crate::domain::blend::{BlendId, BlendPayload, BlendRecord};
use crate::domain::error::BlendError;
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct BlendService {
    repository: Arc<dyn BlendRepository>,
}

impl BlendService {
    pub fn new(repository: Arc<dyn BlendRepository>) -> Self {
        Self { repository }
    }

    pub async fn fetch_latest(&self) -> Result<BlendRecord, BlendError> {
        self.repository
            .latest()
            .await?
            .ok_or_else(BlendError::no_blend)
    }

    /// Store a new blend, discarding whatever was there before.
    pub async fn create(&self, payload: BlendPayload) -> Result<BlendId, BlendError> {
        let record = BlendRecord::create(payload, Utc::now());
        self.repository.replace_all(&record).await?;
        tracing::info!("Created blend {}", record.id);
        Ok(record.id)
    }

    /// Overwrite an existing blend. Ids that don't parse can't name a stored
    /// blend, so they are reported as not found.
    pub async fn update(&self, id: &str, payload: BlendPayload) -> Result<BlendId, BlendError> {
        let Ok(id) = id.parse::<BlendId>() else {
            return Err(BlendError::blend_not_found());
        };

        let updated = self.repository.update(id, &payload, Utc::now()).await?;
        match updated {
            Some(id) => {
                tracing::info!("Updated blend {}", id);
                Ok(id)
            }
            None => Err(BlendError::blend_not_found()),
        }
    }
}
