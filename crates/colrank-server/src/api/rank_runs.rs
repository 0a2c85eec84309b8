use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use colrank_core::collection_gid;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, shop, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct RankRunsQuery {
    pub limit: Option<i64>,
    pub collection_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RankRunItem {
    run_id: Uuid,
    shop_domain: String,
    collection_id: String,
    handle: String,
    trigger_source: String,
    status: String,
    products_succeeded: i32,
    products_failed: i32,
    error_message: Option<String>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<colrank_db::RankRunRow> for RankRunItem {
    fn from(row: colrank_db::RankRunRow) -> Self {
        Self {
            run_id: row.public_id,
            shop_domain: row.shop_domain,
            collection_id: row.collection_id,
            handle: row.handle,
            trigger_source: row.trigger_source,
            status: row.status,
            products_succeeded: row.products_succeeded,
            products_failed: row.products_failed,
            error_message: row.error_message,
            started_at: row.started_at,
            completed_at: row.completed_at,
            created_at: row.created_at,
        }
    }
}

pub(super) async fn list_rank_runs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Query(query): Query<RankRunsQuery>,
) -> Result<Json<ApiResponse<Vec<RankRunItem>>>, ApiError> {
    let shop_domain = shop::requested_shop(&state, &headers, &req_id.0)?;
    let collection_id = query
        .collection_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(collection_gid);

    let rows = colrank_db::list_rank_runs(
        &state.pool,
        &shop_domain,
        collection_id.as_deref(),
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(RankRunItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
