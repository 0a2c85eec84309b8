//! Shop domain and Admin endpoint helpers.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::error::ShopifyError;

static SHOP_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9-]*\.myshopify\.com$").expect("valid shop domain regex")
});

/// Normalizes a shop domain to bare lowercase `name.myshopify.com`.
///
/// Accepts inputs such as `"https://Best-Store.myshopify.com/"`.
///
/// # Errors
///
/// Returns [`ShopifyError::InvalidShopDomain`] if the result is not a
/// `*.myshopify.com` host.
pub fn normalize_shop_domain(shop_domain: &str) -> Result<String, ShopifyError> {
    let trimmed = shop_domain.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let host = without_scheme.trim_end_matches('/').to_ascii_lowercase();

    if !SHOP_DOMAIN_RE.is_match(&host) {
        return Err(ShopifyError::InvalidShopDomain {
            shop_domain: shop_domain.to_owned(),
            reason: "expected a <name>.myshopify.com domain".to_owned(),
        });
    }
    Ok(host)
}

/// Builds `{base_url}/admin/api/{api_version}/graphql.json`.
///
/// # Errors
///
/// Returns [`ShopifyError::InvalidBaseUrl`] if `base_url` does not parse.
pub fn admin_endpoint(base_url: &str, api_version: &str) -> Result<Url, ShopifyError> {
    let base = format!(
        "{}/admin/api/{}/graphql.json",
        base_url.trim_end_matches('/'),
        api_version.trim_matches('/')
    );
    Url::parse(&base).map_err(|e| ShopifyError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })
}
