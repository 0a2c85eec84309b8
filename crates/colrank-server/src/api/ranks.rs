use axum::{extract::State, http::HeaderMap, Extension, Json};
use colrank_core::{collection_gid, validate_handle, RankUpdateResult};
use colrank_db::{RankRunOutcome, TriggerSource};
use colrank_shopify::{sync_collection_ranks, AdminApi, AdminClient, RankSyncOptions, SyncError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::guard::RankLease;
use crate::middleware::RequestId;

use super::{map_sync_error, shop, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RankRequest {
    pub collection_id: String,
    pub handle: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RankResponse {
    success: bool,
    results: RankUpdateResult,
    message: String,
    /// Absent when the run could not be recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<Uuid>,
}

/// `POST /api/v1/collections/rank`
///
/// Writes `<handle>_rank` on every product of a manually sorted collection.
/// Per-product failures come back in `results.errors`; only upfront failures
/// (auth, missing collection, non-manual sort) are errors.
///
/// The sync runs in its own task that owns the lease and the run record, so
/// a client that disconnects mid-run does not leave the run `running`.
pub(super) async fn rank_collection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Json(body): Json<RankRequest>,
) -> Result<Json<ApiResponse<RankResponse>>, ApiError> {
    let collection_id = body.collection_id.trim();
    if collection_id.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "collectionId is required",
        ));
    }
    validate_handle(&body.handle)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let client = shop::resolve_admin_client(&state, &headers, &req_id.0).await?;
    let gid = collection_gid(collection_id);

    let Some(lease) = state.leases.try_acquire(client.shop_domain(), &gid) else {
        tracing::info!(shop = client.shop_domain(), collection_id = %gid, "rank sync already running");
        return Err(ApiError::new(
            req_id.0,
            "conflict",
            format!("a rank sync for {gid} is already running"),
        ));
    };

    let handle = body.handle;
    let task = tokio::spawn(recorded_sync(state, client, gid, handle.clone(), lease));
    let (run_id, outcome) = task.await.map_err(|e| {
        tracing::error!(error = %e, "rank sync task did not complete");
        ApiError::new(req_id.0.clone(), "internal_error", "rank sync aborted")
    })?;

    match outcome {
        Ok(results) => {
            let message = results.summary_message(&handle);
            Ok(Json(ApiResponse {
                data: RankResponse {
                    success: true,
                    results,
                    message,
                    run_id,
                },
                meta: ResponseMeta::new(req_id.0),
            }))
        }
        Err(e) => Err(map_sync_error(req_id.0, &e)),
    }
}

/// Records the run, syncs, and records the outcome. Holds `_lease` until done.
async fn recorded_sync(
    state: AppState,
    client: AdminClient,
    gid: String,
    handle: String,
    _lease: RankLease,
) -> (Option<Uuid>, Result<RankUpdateResult, SyncError>) {
    let run_id = start_run_best_effort(&state, client.shop_domain(), &gid, &handle).await;
    let options = RankSyncOptions::from_config(&state.config);

    let outcome = sync_collection_ranks(&client, &gid, &handle, &options).await;
    if let Some((id, _)) = run_id {
        match &outcome {
            Ok(results) => complete_run_best_effort(&state, id, results).await,
            Err(e) => fail_run_best_effort(&state, id, e).await,
        }
    }
    (run_id.map(|(_, public_id)| public_id), outcome)
}

/// Returns `(id, public_id)` of the new run, or `None` if it could not be
/// recorded. History is never a reason to refuse a sync.
async fn start_run_best_effort(
    state: &AppState,
    shop_domain: &str,
    collection_id: &str,
    handle: &str,
) -> Option<(i64, Uuid)> {
    match colrank_db::create_rank_run(
        &state.pool,
        shop_domain,
        collection_id,
        handle,
        TriggerSource::Api,
    )
    .await
    {
        Ok(run) => Some((run.id, run.public_id)),
        Err(e) => {
            tracing::error!(shop = shop_domain, collection_id, error = %e, "failed to record rank run start");
            None
        }
    }
}

async fn complete_run_best_effort(state: &AppState, run_id: i64, results: &RankUpdateResult) {
    let outcome = RankRunOutcome {
        succeeded: results.success,
        failed: results.failed,
    };
    if let Err(e) = colrank_db::complete_rank_run(&state.pool, run_id, outcome).await {
        tracing::error!(run_id, error = %e, "failed to record rank run completion");
    }
}

async fn fail_run_best_effort(state: &AppState, run_id: i64, error: &SyncError) {
    let message = format!("{}: {error}", error.code());
    if let Err(e) = colrank_db::fail_rank_run(&state.pool, run_id, &message).await {
        tracing::error!(run_id, error = %e, "failed to record rank run failure");
    }
}
