// Client-side port to the blend persistence API
use crate::domain::blend::{BlendId, BlendPayload, BlendRecord};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got an answer
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with an error status
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The server's answer could not be understood
    #[error("unexpected response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait BlendApi: Send + Sync {
    /// The current blend, or None when the server has none yet
    async fn fetch_latest(&self) -> Result<Option<BlendRecord>, ClientError>;

    async fn create(&self, payload: &BlendPayload) -> Result<BlendId, ClientError>;

    async fn update(&self, id: BlendId, payload: &BlendPayload) -> Result<BlendId, ClientError>;
}
