//! `rank` and `runs` subcommands.
//!
//! A rank run is recorded in `rank_sync_runs` before any write is issued;
//! the final status is recorded best-effort so a history failure never hides
//! the outcome of the sync itself.

use colrank_core::{assign_ranks, collection_gid, rank_field_key, AppConfig, Product, RankUpdateResult};
use colrank_db::{RankRunOutcome, TriggerSource};
use colrank_shopify::{load_rankable_collection, sync_collection_ranks, AdminApi, RankSyncOptions};

use crate::shop::{admin_client, resolve_shop};

pub(crate) struct RankArgs<'a> {
    pub collection: &'a str,
    pub handle: &'a str,
    pub shop: Option<&'a str>,
    pub dry_run: bool,
}

/// Runs one collection-rank sync, or prints the plan when `dry_run` is set.
///
/// # Errors
///
/// Returns an error for any upfront failure (no token, missing collection,
/// non-manual sort, bad handle) or if the run cannot be recorded. Per-product
/// write failures are printed, not returned.
pub(crate) async fn run_rank(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    args: &RankArgs<'_>,
) -> anyhow::Result<()> {
    let client = admin_client(pool, config, args.shop).await?;
    let options = RankSyncOptions::from_config(config);

    if args.dry_run {
        let fetched =
            load_rankable_collection(&client, args.collection, args.handle, &options).await?;
        println!(
            "dry-run: would set {}.{} on {} products of {} ({})",
            options.namespace,
            rank_field_key(args.handle),
            fetched.collection.products.len(),
            fetched.collection.title,
            fetched.collection.id,
        );
        for line in plan_lines(&fetched.collection.products) {
            println!("{line}");
        }
        if fetched.truncated {
            println!("(product list truncated by COLRANK_RANK_MAX_PRODUCTS)");
        }
        return Ok(());
    }

    let gid = collection_gid(args.collection);
    let run = colrank_db::create_rank_run(
        pool,
        client.shop_domain(),
        &gid,
        args.handle,
        TriggerSource::Cli,
    )
    .await?;

    match sync_collection_ranks(&client, &gid, args.handle, &options).await {
        Ok(result) => {
            complete_run_best_effort(pool, run.id, &result).await;
            println!("{}", result.summary_message(args.handle));
            for failure in &result.errors {
                println!(
                    "  failed {} ({}): {}",
                    failure.product_id, failure.title, failure.error
                );
            }
            println!("run {}", run.public_id);
            Ok(())
        }
        Err(err) => {
            fail_run_best_effort(pool, run.id, format!("{}: {err}", err.code())).await;
            Err(err.into())
        }
    }
}

/// Prints recent runs for a shop, newest first.
///
/// # Errors
///
/// Returns an error if no shop can be resolved or the query fails.
pub(crate) async fn run_runs(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    shop: Option<&str>,
    collection: Option<&str>,
    limit: i64,
) -> anyhow::Result<()> {
    let shop_domain = resolve_shop(config, shop)?;
    let collection_id = collection.map(collection_gid);
    let runs = colrank_db::list_rank_runs(
        pool,
        &shop_domain,
        collection_id.as_deref(),
        limit.clamp(1, 200),
    )
    .await?;

    if runs.is_empty() {
        println!("no rank runs recorded for {shop_domain}");
        return Ok(());
    }

    println!(
        "{:<18}{:<11}{:<6}{:>5}{:>5}  {:<36}HANDLE",
        "STARTED", "STATUS", "FROM", "OK", "FAIL", "COLLECTION"
    );
    for run in &runs {
        println!(
            "{:<18}{:<11}{:<6}{:>5}{:>5}  {:<36}{}",
            run.started_at.format("%Y-%m-%d %H:%M"),
            run.status,
            run.trigger_source,
            run.products_succeeded,
            run.products_failed,
            run.collection_id,
            run.handle
        );
        if let Some(message) = &run.error_message {
            println!("  {message}");
        }
    }
    Ok(())
}

/// One line per product: rank, product id, title.
pub(crate) fn plan_lines(products: &[Product]) -> Vec<String> {
    assign_ranks(products)
        .map(|(rank, product)| format!("{rank:>5}  {:<40}{}", product.id, product.title))
        .collect()
}

async fn complete_run_best_effort(pool: &sqlx::PgPool, run_id: i64, result: &RankUpdateResult) {
    let outcome = RankRunOutcome {
        succeeded: result.success,
        failed: result.failed,
    };
    if let Err(mark_err) = colrank_db::complete_rank_run(pool, run_id, outcome).await {
        tracing::error!(run_id, error = %mark_err, "failed to mark rank run as completed");
    }
}

async fn fail_run_best_effort(pool: &sqlx::PgPool, run_id: i64, message: String) {
    if let Err(mark_err) = colrank_db::fail_rank_run(pool, run_id, &message).await {
        tracing::error!(
            run_id,
            error = %mark_err,
            original_error = %message,
            "failed to mark rank run as failed"
        );
    }
}
