use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Extension, Json,
};
use colrank_core::{assign_ranks, collection_gid, CollectionSortOrder};
use colrank_shopify::{fetch_collection, CollectionPage, SyncError};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_sync_error, shop, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CollectionsQuery {
    pub limit: Option<u32>,
    pub after: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RankedProductItem {
    id: String,
    title: String,
    rank: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct CollectionDetail {
    id: String,
    title: String,
    handle: String,
    sort_order: CollectionSortOrder,
    /// Whether a rank sync would be accepted for this collection.
    is_manual: bool,
    truncated: bool,
    products: Vec<RankedProductItem>,
}

/// The Admin API caps `first:` at 250.
fn normalize_page_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(50).clamp(1, 250)
}

pub(super) async fn list_collections(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Query(query): Query<CollectionsQuery>,
) -> Result<Json<ApiResponse<CollectionPage>>, ApiError> {
    let client = shop::resolve_admin_client(&state, &headers, &req_id.0).await?;

    let page = colrank_shopify::list_collections(
        &client,
        normalize_page_limit(query.limit),
        query.after.as_deref(),
    )
    .await
    .map_err(|e| map_sync_error(req_id.0.clone(), &SyncError::from(e)))?;

    Ok(Json(ApiResponse {
        data: page,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_collection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Path(collection_id): Path<String>,
) -> Result<Json<ApiResponse<CollectionDetail>>, ApiError> {
    let client = shop::resolve_admin_client(&state, &headers, &req_id.0).await?;
    let gid = collection_gid(collection_id.trim());

    let fetched = fetch_collection(
        &client,
        &gid,
        state.config.rank_page_size,
        state.config.rank_max_products,
    )
    .await
    .map_err(|e| map_sync_error(req_id.0.clone(), &SyncError::from(e)))?
    .ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("collection {gid} not found"),
        )
    })?;

    let collection = fetched.collection;
    let products = assign_ranks(&collection.products)
        .map(|(rank, product)| RankedProductItem {
            id: product.id.clone(),
            title: product.title.clone(),
            rank,
        })
        .collect();

    Ok(Json(ApiResponse {
        data: CollectionDetail {
            is_manual: collection.sort_order.is_manual(),
            id: collection.id,
            title: collection.title,
            handle: collection.handle,
            sort_order: collection.sort_order,
            truncated: fetched.truncated,
            products,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
