//! Database operations for `rank_sync_runs`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What started a run. Stored as text in `trigger_source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Api,
    Cli,
}

impl TriggerSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerSource::Api => "api",
            TriggerSource::Cli => "cli",
        }
    }
}

/// Lifecycle state of a run. Stored as text in `status`.
///
/// Runs are created `running` and move exactly once to a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Succeeded,
    Partial,
    Failed,
}

impl RunStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Succeeded => "succeeded",
            RunStatus::Partial => "partial",
            RunStatus::Failed => "failed",
        }
    }
}

/// Per-product counts of a run that got past its upfront checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankRunOutcome {
    pub succeeded: usize,
    pub failed: usize,
}

impl RankRunOutcome {
    /// `succeeded` when no write failed, `partial` otherwise.
    #[must_use]
    pub fn status(self) -> RunStatus {
        if self.failed == 0 {
            RunStatus::Succeeded
        } else {
            RunStatus::Partial
        }
    }
}

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `rank_sync_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RankRunRow {
    pub id: i64,
    pub public_id: Uuid,
    pub shop_domain: String,
    pub collection_id: String,
    pub handle: String,
    pub trigger_source: String,
    pub status: String,
    pub products_succeeded: i32,
    pub products_failed: i32,
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

const RUN_COLUMNS: &str = "id, public_id, shop_domain, collection_id, handle, trigger_source, \
     status, products_succeeded, products_failed, error_message, \
     started_at, completed_at, created_at";

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Creates a run in `running` status with a fresh `public_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_rank_run(
    pool: &PgPool,
    shop_domain: &str,
    collection_id: &str,
    handle: &str,
    trigger_source: TriggerSource,
) -> Result<RankRunRow, DbError> {
    let row = sqlx::query_as::<_, RankRunRow>(&format!(
        "INSERT INTO rank_sync_runs \
             (public_id, shop_domain, collection_id, handle, trigger_source, status) \
         VALUES ($1, $2, $3, $4, $5, 'running') \
         RETURNING {RUN_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(shop_domain)
    .bind(collection_id)
    .bind(handle)
    .bind(trigger_source.as_str())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Records the per-product counts and moves the run to `succeeded` or
/// `partial`.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`,
/// [`DbError::OutOfRange`] if a count does not fit the column, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn complete_rank_run(
    pool: &PgPool,
    id: i64,
    outcome: RankRunOutcome,
) -> Result<(), DbError> {
    let succeeded = to_count("products_succeeded", outcome.succeeded)?;
    let failed = to_count("products_failed", outcome.failed)?;

    let result = sqlx::query(
        "UPDATE rank_sync_runs \
         SET status = $1, completed_at = NOW(), \
             products_succeeded = $2, products_failed = $3 \
         WHERE id = $4 AND status = 'running'",
    )
    .bind(outcome.status().as_str())
    .bind(succeeded)
    .bind(failed)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Marks a run `failed` with `error_message`.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn fail_rank_run(pool: &PgPool, id: i64, error_message: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE rank_sync_runs \
         SET status = 'failed', completed_at = NOW(), error_message = $1 \
         WHERE id = $2 AND status = 'running'",
    )
    .bind(error_message)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Fetches a run by its public UUID.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no run has that `public_id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_rank_run_by_public_id(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<RankRunRow, DbError> {
    sqlx::query_as::<_, RankRunRow>(&format!(
        "SELECT {RUN_COLUMNS} FROM rank_sync_runs WHERE public_id = $1"
    ))
    .bind(public_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Returns the most recent `limit` runs for `shop_domain`, newest first,
/// optionally narrowed to one collection.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_rank_runs(
    pool: &PgPool,
    shop_domain: &str,
    collection_id: Option<&str>,
    limit: i64,
) -> Result<Vec<RankRunRow>, DbError> {
    let rows = sqlx::query_as::<_, RankRunRow>(&format!(
        "SELECT {RUN_COLUMNS} \
         FROM rank_sync_runs \
         WHERE shop_domain = $1 \
           AND ($2::TEXT IS NULL OR collection_id = $2) \
         ORDER BY created_at DESC, id DESC \
         LIMIT $3"
    ))
    .bind(shop_domain)
    .bind(collection_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn to_count(field: &'static str, value: usize) -> Result<i32, DbError> {
    i32::try_from(value).map_err(|_| DbError::OutOfRange { field, value })
}
