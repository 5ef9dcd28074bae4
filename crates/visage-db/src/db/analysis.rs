use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres};
use visage_core::models::{AnalysisRecord, AnalysisResult, Likelihood, StoredObject};
use visage_core::AppError;

/// Persistence of `(object key -> analysis)` associations.
///
/// `record` is an upsert: recording the same pair twice leaves a single
/// association.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn record(
        &self,
        stored: &StoredObject,
        analysis: &AnalysisResult,
    ) -> Result<AnalysisRecord, AppError>;

    async fn get(&self, object_key: &str) -> Result<Option<AnalysisRecord>, AppError>;

    /// Records for whichever of `object_keys` have one, in no particular order.
    async fn get_many(&self, object_keys: &[String]) -> Result<Vec<AnalysisRecord>, AppError>;

    /// Readiness check
    async fn ping(&self) -> Result<(), AppError>;
}

/// The stored object and its analysis must describe the same key.
pub fn ensure_matching_keys(
    stored: &StoredObject,
    analysis: &AnalysisResult,
) -> Result<(), AppError> {
    if stored.key != analysis.object_key {
        return Err(AppError::Internal(format!(
            "analysis for '{}' cannot be recorded against '{}'",
            analysis.object_key, stored.key
        )));
    }
    Ok(())
}

#[derive(Debug, FromRow)]
struct AnalysisRow {
    object_key: String,
    joy: String,
    recorded_at: DateTime<Utc>,
}

impl TryFrom<AnalysisRow> for AnalysisRecord {
    type Error = AppError;

    fn try_from(row: AnalysisRow) -> Result<Self, Self::Error> {
        let joy = row.joy.parse::<Likelihood>().map_err(|e| {
            AppError::Persistence(format!(
                "stored joy for '{}' is invalid: {}",
                row.object_key, e
            ))
        })?;
        Ok(AnalysisRecord {
            object_key: row.object_key,
            joy,
            recorded_at: row.recorded_at,
        })
    }
}

/// Repository for photo analyses
#[derive(Clone)]
pub struct PostgresAnalysisRepository {
    pool: PgPool,
}

impl PostgresAnalysisRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisStore for PostgresAnalysisRepository {
    #[tracing::instrument(
        skip(self, stored, analysis),
        fields(db.table = "photo_analyses", db.operation = "upsert", key = %stored.key)
    )]
    async fn record(
        &self,
        stored: &StoredObject,
        analysis: &AnalysisResult,
    ) -> Result<AnalysisRecord, AppError> {
        ensure_matching_keys(stored, analysis)?;

        let row = sqlx::query_as::<Postgres, AnalysisRow>(
            r#"
            INSERT INTO photo_analyses (object_key, joy, recorded_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (object_key) DO UPDATE
            SET joy = EXCLUDED.joy, recorded_at = EXCLUDED.recorded_at
            RETURNING object_key, joy, recorded_at
            "#,
        )
        .bind(&stored.key)
        .bind(analysis.joy.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    #[tracing::instrument(skip(self), fields(db.table = "photo_analyses", db.operation = "select"))]
    async fn get(&self, object_key: &str) -> Result<Option<AnalysisRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, AnalysisRow>(
            "SELECT object_key, joy, recorded_at FROM photo_analyses WHERE object_key = $1",
        )
        .bind(object_key)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AnalysisRecord::try_from).transpose()
    }

    #[tracing::instrument(
        skip(self, object_keys),
        fields(db.table = "photo_analyses", db.operation = "select", keys = object_keys.len())
    )]
    async fn get_many(&self, object_keys: &[String]) -> Result<Vec<AnalysisRecord>, AppError> {
        if object_keys.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<Postgres, AnalysisRow>(
            "SELECT object_key, joy, recorded_at FROM photo_analyses WHERE object_key = ANY($1)",
        )
        .bind(object_keys)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AnalysisRecord::try_from).collect()
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
