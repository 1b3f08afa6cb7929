// HTTP response utilities for the JSON blend API
use crate::domain::blend::BlendId;
use crate::domain::error::BlendError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Body returned by create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedResponse {
    pub message: String,
    pub id: BlendId,
}

impl SavedResponse {
    pub fn saved(id: BlendId) -> Self {
        Self {
            message: "Blend saved".to_string(),
            id,
        }
    }

    pub fn updated(id: BlendId) -> Self {
        Self {
            message: "Blend updated".to_string(),
            id,
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for BlendError {
    fn into_response(self) -> Response {
        match self {
            BlendError::Validation(message) => error_response(StatusCode::BAD_REQUEST, message),
            BlendError::NotFound(message) => error_response(StatusCode::NOT_FOUND, message),
            BlendError::Storage(e) => {
                tracing::error!("Blend storage error: {:#}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (BlendError::invalid_payload(), StatusCode::BAD_REQUEST),
            (BlendError::no_blend(), StatusCode::NOT_FOUND),
            (BlendError::blend_not_found(), StatusCode::NOT_FOUND),
            (
                BlendError::Storage(anyhow::anyhow!("connection reset")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_saved_response_shape() {
        let id = BlendId::new();
        let body = serde_json::to_value(SavedResponse::saved(id)).unwrap();
        assert_eq!(body["message"], "Blend saved");
        assert_eq!(body["id"], id.to_string());
    }
}
