//! Collection-rank synchronization.
//!
//! Fetches a manually sorted collection and writes each product's 1-based
//! position into `<namespace>.<handle>_rank`. Writes run one at a time in
//! collection order; a failed write is recorded and the loop moves on.

use chrono::Utc;
use colrank_core::{
    assign_ranks, collection_gid, last_rendered_key, rank_field_key, validate_handle, AppConfig,
    RankUpdateResult,
};

use crate::api::AdminApi;
use crate::collections::{fetch_manual_collection, FetchedCollection};
use crate::error::SyncError;
use crate::metafields::{set_product_rank, stamp_collection_rendered};

/// Knobs for one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankSyncOptions {
    pub namespace: String,
    pub page_size: u32,
    /// `0` means every product in the collection is ranked.
    pub max_products: usize,
    pub stamp_last_rendered: bool,
}

impl Default for RankSyncOptions {
    fn default() -> Self {
        Self {
            namespace: "custom".to_owned(),
            page_size: 100,
            max_products: 0,
            stamp_last_rendered: true,
        }
    }
}

impl RankSyncOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            namespace: config.rank_namespace.clone(),
            page_size: config.rank_page_size,
            max_products: config.rank_max_products,
            stamp_last_rendered: config.stamp_last_rendered,
        }
    }
}

/// Fetches the collection and applies the upfront guards, without writing.
///
/// # Errors
///
/// - [`SyncError::InvalidHandle`] if `handle` cannot form a metafield key.
/// - [`SyncError::NotFound`] if the collection does not exist.
/// - [`SyncError::InvalidState`] if the collection is not manually sorted.
/// - [`SyncError::AuthenticationRequired`] if the API rejects the credentials.
/// - [`SyncError::Unexpected`] for any other fetch failure.
pub async fn load_rankable_collection<A: AdminApi>(
    api: &A,
    collection_id: &str,
    handle: &str,
    options: &RankSyncOptions,
) -> Result<FetchedCollection, SyncError> {
    validate_handle(handle)?;
    let gid = collection_gid(collection_id);

    let fetched = fetch_manual_collection(api, &gid, options.page_size, options.max_products)
        .await?
        .ok_or_else(|| SyncError::NotFound {
            collection_id: gid.clone(),
        })?;

    let sort_order = fetched.collection.sort_order;
    if !sort_order.is_manual() {
        return Err(SyncError::InvalidState {
            collection_id: gid,
            sort_order,
        });
    }

    Ok(fetched)
}

/// Writes `<handle>_rank` on every product of a manually sorted collection.
///
/// Product at index `i` receives `i + 1`, based on the single snapshot taken
/// at fetch time. A failed write is counted in the result and does not stop
/// the run. When enabled, the collection is stamped with
/// `<handle>_last_rendered_at` afterwards; a failed stamp is only logged.
///
/// # Errors
///
/// Only the upfront failures listed on [`load_rankable_collection`].
pub async fn sync_collection_ranks<A: AdminApi>(
    api: &A,
    collection_id: &str,
    handle: &str,
    options: &RankSyncOptions,
) -> Result<RankUpdateResult, SyncError> {
    let FetchedCollection {
        collection,
        truncated,
    } = load_rankable_collection(api, collection_id, handle, options).await?;

    let key = rank_field_key(handle);
    tracing::info!(
        shop = api.shop_domain(),
        collection_id = %collection.id,
        key = %key,
        products = collection.products.len(),
        "starting rank sync"
    );

    let mut result = RankUpdateResult {
        truncated,
        ..RankUpdateResult::default()
    };

    for (rank, product) in assign_ranks(&collection.products) {
        match set_product_rank(api, &product.id, &options.namespace, &key, rank).await {
            Ok(()) => result.record_success(),
            Err(e) => {
                tracing::warn!(
                    product_id = %product.id,
                    rank,
                    error = %e,
                    "rank write failed; continuing with next product"
                );
                result.record_failure(product, e.to_string());
            }
        }
    }

    if options.stamp_last_rendered {
        let stamp_key = last_rendered_key(handle);
        if let Err(e) = stamp_collection_rendered(
            api,
            &collection.id,
            &options.namespace,
            &stamp_key,
            Utc::now(),
        )
        .await
        {
            tracing::warn!(
                collection_id = %collection.id,
                error = %e,
                "failed to stamp collection with last-rendered time"
            );
        }
    }

    tracing::info!(
        collection_id = %collection.id,
        success = result.success,
        failed = result.failed,
        "rank sync finished"
    );

    Ok(result)
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
