// Blend domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::cast;
use super::error::BlendError;

/// Number of coal rows on the blend sheet.
pub const ROW_COUNT: usize = 3;

/// Number of mills fed by the blend. Mill indices run `0..MILL_COUNT`.
pub const MILL_COUNT: usize = 6;

/// Server-assigned identity of a blend record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlendId(Uuid);

impl BlendId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BlendId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BlendId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for BlendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BlendId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// One coal row of a blend: the coal's name, its split per mill and the
/// client-computed quality figures. Percentages may hold gaps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowEntry {
    #[serde(default, deserialize_with = "cast::text")]
    pub coal: String,
    #[serde(default, deserialize_with = "cast::numbers")]
    pub percentages: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "cast::number")]
    pub gcv: Option<f64>,
    #[serde(default, deserialize_with = "cast::number")]
    pub cost: Option<f64>,
}

/// Body of a create or update request. Ids and timestamps are never taken
/// from the client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlendPayload {
    pub rows: Vec<RowEntry>,
    #[serde(deserialize_with = "cast::numbers")]
    pub flows: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "cast::number")]
    pub generation: Option<f64>,
}

impl BlendPayload {
    /// Validate a raw JSON body. `rows` and `flows` must be present and be
    /// arrays. Their contents are cast the way the store always has: nulls
    /// stay as gaps, numeric strings become numbers, a null coal name is
    /// empty. Only values that cannot be cast are rejected.
    pub fn from_json(body: Value) -> Result<Self, BlendError> {
        let Some(object) = body.as_object() else {
            return Err(BlendError::invalid_payload());
        };

        let is_array = |key: &str| object.get(key).is_some_and(Value::is_array);
        if !is_array("rows") || !is_array("flows") {
            return Err(BlendError::invalid_payload());
        }

        serde_json::from_value(body).map_err(|e| {
            tracing::debug!("Rejected blend payload: {}", e);
            BlendError::invalid_payload()
        })
    }
}

/// The single persisted blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendRecord {
    #[serde(alias = "_id")]
    pub id: BlendId,
    pub rows: Vec<RowEntry>,
    #[serde(deserialize_with = "cast::numbers")]
    pub flows: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "cast::number")]
    pub generation: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlendRecord {
    pub fn create(payload: BlendPayload, now: DateTime<Utc>) -> Self {
        Self {
            id: BlendId::new(),
            rows: payload.rows,
            flows: payload.flows,
            generation: payload.generation,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the blend content and refresh the update timestamp.
    pub fn apply(&mut self, payload: BlendPayload, now: DateTime<Utc>) {
        self.rows = payload.rows;
        self.flows = payload.flows;
        self.generation = payload.generation;
        self.updated_at = now;
    }

    #[cfg(test)]
    pub fn payload(&self) -> BlendPayload {
        BlendPayload {
            rows: self.rows.clone(),
            flows: self.flows.clone(),
            generation: self.generation,
        }
    }
}
