// Error taxonomy for blend persistence
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlendError {
    /// Malformed create/update payload.
    #[error("{0}")]
    Validation(String),

    /// No blend at all, or none with the requested id.
    #[error("{0}")]
    NotFound(String),

    /// The underlying store failed.
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl BlendError {
    pub fn invalid_payload() -> Self {
        Self::Validation("Invalid payload".to_string())
    }

    pub fn no_blend() -> Self {
        Self::NotFound("No blend data found".to_string())
    }

    pub fn blend_not_found() -> Self {
        Self::NotFound("Blend not found".to_string())
    }
}
