//! Shop and token resolution shared by the commands that call the Admin API.

use colrank_core::AppConfig;
use colrank_shopify::{build_http_client, normalize_shop_domain, AdminClient};

/// `--shop` if given, otherwise `SHOPIFY_SHOP_DOMAIN`, normalized.
pub(crate) fn resolve_shop(config: &AppConfig, shop: Option<&str>) -> anyhow::Result<String> {
    let raw = shop
        .or(config.shopify_shop_domain.as_deref())
        .ok_or_else(|| anyhow::anyhow!("no shop given; pass --shop or set SHOPIFY_SHOP_DOMAIN"))?;
    Ok(normalize_shop_domain(raw)?)
}

/// Builds an Admin API client, preferring the ambient token for the default
/// shop and falling back to a stored session.
pub(crate) async fn admin_client(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    shop: Option<&str>,
) -> anyhow::Result<AdminClient> {
    let shop_domain = resolve_shop(config, shop)?;

    let token = match config.ambient_token_for(&shop_domain) {
        Some(token) => token.to_owned(),
        None => colrank_db::get_shop_session(pool, &shop_domain)
            .await?
            .map(|session| session.access_token)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "no access token for {shop_domain}; run `session set --shop {shop_domain} --token ...`"
                )
            })?,
    };

    let http = build_http_client(config.shopify_request_timeout_secs, &config.user_agent)?;
    Ok(AdminClient::for_shop(http, config, &shop_domain, &token)?)
}
