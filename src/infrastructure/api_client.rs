// HTTP client for the blend persistence API
use crate::application::blend_api::{BlendApi, ClientError};
use crate::domain::blend::{BlendId, BlendPayload, BlendRecord};
use crate::infrastructure::http_response::{ErrorBody, SavedResponse};
use async_trait::async_trait;
use reqwest::{Response, StatusCode};

#[derive(Debug, Clone)]
pub struct HttpBlendApi {
    base: String,
    client: reqwest::Client,
}

impl HttpBlendApi {
    /// `base` is the API root, e.g. `http://localhost:3000/api`.
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn blend_url(&self, id: BlendId) -> String {
        format!("{}/blend/{}", self.base, id)
    }

    async fn rejected(response: Response) -> ClientError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        ClientError::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    async fn saved_id(response: Response) -> Result<BlendId, ClientError> {
        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }
        let body = response
            .json::<SavedResponse>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(body.id)
    }
}

#[async_trait]
impl BlendApi for HttpBlendApi {
    async fn fetch_latest(&self) -> Result<Option<BlendRecord>, ClientError> {
        let response = self
            .client
            .get(format!("{}/blend/latest", self.base))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let record = response
            .json::<BlendRecord>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(Some(record))
    }

    async fn create(&self, payload: &BlendPayload) -> Result<BlendId, ClientError> {
        let response = self
            .client
            .post(format!("{}/blend", self.base))
            .json(payload)
            .send()
            .await?;
        Self::saved_id(response).await
    }

    async fn update(&self, id: BlendId, payload: &BlendPayload) -> Result<BlendId, ClientError> {
        let response = self
            .client
            .put(self.blend_url(id))
            .json(payload)
            .send()
            .await?;
        Self::saved_id(response).await
    }
}
