//! `collections` subcommand.

use colrank_core::AppConfig;
use colrank_shopify::list_collections;

use crate::shop::admin_client;

pub(crate) async fn run_collections(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    shop: Option<&str>,
    limit: u32,
) -> anyhow::Result<()> {
    let client = admin_client(pool, config, shop).await?;
    let page = list_collections(&client, limit.clamp(1, 250), None).await?;

    if page.collections.is_empty() {
        println!("no collections found");
        return Ok(());
    }

    println!(
        "{:<40}{:<30}{:<14}{:>9}  TITLE",
        "ID", "HANDLE", "SORT", "PRODUCTS"
    );
    for c in &page.collections {
        let count = c
            .products_count
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let sort = if c.is_manual {
            c.sort_order.to_string()
        } else {
            format!("{} *", c.sort_order)
        };
        println!(
            "{:<40}{:<30}{:<14}{:>9}  {}",
            c.id, c.handle, sort, count, c.title
        );
    }
    if page.collections.iter().any(|c| !c.is_manual) {
        println!("* not manually sorted; cannot be ranked");
    }
    if page.next_cursor.is_some() {
        println!("(more collections available; raise --limit)");
    }
    Ok(())
}
