// PostgreSQL repository implementation
use crate::application::blend_repository::BlendRepository;
use crate::domain::blend::{BlendId, BlendPayload, BlendRecord, RowEntry};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use uuid::Uuid;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS blends (
    id          UUID PRIMARY KEY,
    rows        JSONB NOT NULL,
    flows       JSONB NOT NULL,
    generation  DOUBLE PRECISION,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL
)
"#;

#[derive(Debug, Clone)]
pub struct PgBlendRepository {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct BlendRow {
    id: Uuid,
    rows: Json<Vec<RowEntry>>,
    flows: Json<Vec<Option<f64>>>,
    generation: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlendRow> for BlendRecord {
    fn from(row: BlendRow) -> Self {
        Self {
            id: BlendId::from(row.id),
            rows: row.rows.0,
            flows: row.flows.0,
            generation: row.generation,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl PgBlendRepository {
    /// Connect to the database and make sure the blends table exists.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("Failed to connect to the blend database")?;

        let repository = Self { pool };
        repository.ensure_schema().await?;
        Ok(repository)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .context("Failed to create the blends table")?;
        Ok(())
    }
}

#[async_trait]
impl BlendRepository for PgBlendRepository {
    async fn latest(&self) -> Result<Option<BlendRecord>> {
        let row = sqlx::query_as::<_, BlendRow>(
            "SELECT id, rows, flows, generation, created_at, updated_at \
             FROM blends ORDER BY updated_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch the latest blend")?;

        Ok(row.map(BlendRecord::from))
    }

    async fn replace_all(&self, record: &BlendRecord) -> Result<()> {
        // Readers see either the old blend or the new one, never an empty table.
        let mut tx = self.pool.begin().await?;

        // Plain reads still go through; a second create waits here until this
        // one commits, so its DELETE sees our row.
        sqlx::query("LOCK TABLE blends IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await
            .context("Failed to lock the blends table")?;

        sqlx::query("DELETE FROM blends")
            .execute(&mut *tx)
            .await
            .context("Failed to clear previous blends")?;

        sqlx::query(
            "INSERT INTO blends (id, rows, flows, generation, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(record.id.as_uuid())
        .bind(Json(&record.rows))
        .bind(Json(&record.flows))
        .bind(record.generation)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await
        .context("Failed to insert blend")?;

        tx.commit().await.context("Failed to commit blend")?;
        Ok(())
    }

    async fn update(
        &self,
        id: BlendId,
        payload: &BlendPayload,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<BlendId>> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            "UPDATE blends SET rows = $1, flows = $2, generation = $3, updated_at = $4 \
             WHERE id = $5 RETURNING id",
        )
        .bind(Json(&payload.rows))
        .bind(Json(&payload.flows))
        .bind(payload.generation)
        .bind(updated_at)
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update blend")?;

        Ok(updated.map(BlendId::from))
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blends")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count blends")?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
