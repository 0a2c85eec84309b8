//! Database operations for `shop_sessions`.
//!
//! One row per shop holding the offline Admin API token the server uses when
//! the shop is not the ambient default.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `shop_sessions` table.
#[derive(Clone, sqlx::FromRow)]
pub struct ShopSessionRow {
    pub id: i64,
    pub shop_domain: String,
    pub access_token: String,
    pub scope: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for ShopSessionRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopSessionRow")
            .field("id", &self.id)
            .field("shop_domain", &self.shop_domain)
            .field("access_token", &"[redacted]")
            .field("scope", &self.scope)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Inserts or replaces the session for `shop_domain`.
///
/// On conflict the token and scope are overwritten and `updated_at` is bumped;
/// `created_at` keeps its original value.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_shop_session(
    pool: &PgPool,
    shop_domain: &str,
    access_token: &str,
    scope: Option<&str>,
) -> Result<ShopSessionRow, DbError> {
    let row = sqlx::query_as::<_, ShopSessionRow>(
        "INSERT INTO shop_sessions (shop_domain, access_token, scope) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (shop_domain) DO UPDATE \
         SET access_token = EXCLUDED.access_token, \
             scope = EXCLUDED.scope, \
             updated_at = NOW() \
         RETURNING id, shop_domain, access_token, scope, created_at, updated_at",
    )
    .bind(shop_domain)
    .bind(access_token)
    .bind(scope)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns the stored session for `shop_domain`, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_shop_session(
    pool: &PgPool,
    shop_domain: &str,
) -> Result<Option<ShopSessionRow>, DbError> {
    let row = sqlx::query_as::<_, ShopSessionRow>(
        "SELECT id, shop_domain, access_token, scope, created_at, updated_at \
         FROM shop_sessions \
         WHERE shop_domain = $1",
    )
    .bind(shop_domain)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Deletes the session for `shop_domain`. Returns `true` if a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_shop_session(pool: &PgPool, shop_domain: &str) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM shop_sessions WHERE shop_domain = $1")
        .bind(shop_domain)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Returns every stored session ordered by shop domain.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_shop_sessions(pool: &PgPool) -> Result<Vec<ShopSessionRow>, DbError> {
    let rows = sqlx::query_as::<_, ShopSessionRow>(
        "SELECT id, shop_domain, access_token, scope, created_at, updated_at \
         FROM shop_sessions \
         ORDER BY shop_domain",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
