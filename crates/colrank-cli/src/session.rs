//! `session` subcommands.

use colrank_shopify::normalize_shop_domain;

pub(crate) async fn run_session_set(
    pool: &sqlx::PgPool,
    shop: &str,
    token: &str,
    scope: Option<&str>,
) -> anyhow::Result<()> {
    let shop_domain = normalize_shop_domain(shop)?;
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("--token must not be empty");
    }

    let row = colrank_db::upsert_shop_session(pool, &shop_domain, token, scope).await?;
    tracing::info!(shop = %row.shop_domain, "stored shop session");
    println!("stored session for {}", row.shop_domain);
    Ok(())
}

pub(crate) async fn run_session_remove(pool: &sqlx::PgPool, shop: &str) -> anyhow::Result<()> {
    let shop_domain = normalize_shop_domain(shop)?;
    if colrank_db::delete_shop_session(pool, &shop_domain).await? {
        println!("removed session for {shop_domain}");
    } else {
        println!("no session stored for {shop_domain}");
    }
    Ok(())
}

pub(crate) async fn run_session_list(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let sessions = colrank_db::list_shop_sessions(pool).await?;
    if sessions.is_empty() {
        println!("no shop sessions stored; run `session set` first");
        return Ok(());
    }

    println!("{:<40}{:<30}UPDATED", "SHOP", "SCOPE");
    for session in &sessions {
        println!(
            "{:<40}{:<30}{}",
            session.shop_domain,
            session.scope.as_deref().unwrap_or("-"),
            session.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}
