//! Which shop a request targets, and which token to call it with.

use axum::http::HeaderMap;
use colrank_shopify::{normalize_shop_domain, AdminClient};

use super::{map_db_error, ApiError, AppState};

pub(super) const SHOP_HEADER: &str = "x-shop-domain";

/// The shop named by `x-shop-domain`, falling back to `SHOPIFY_SHOP_DOMAIN`.
pub(super) fn requested_shop(
    state: &AppState,
    headers: &HeaderMap,
    request_id: &str,
) -> Result<String, ApiError> {
    let raw = match headers.get(SHOP_HEADER) {
        Some(value) => value.to_str().map_err(|_| {
            ApiError::new(
                request_id,
                "validation_error",
                "x-shop-domain header is not valid ASCII",
            )
        })?,
        None => state.config.shopify_shop_domain.as_deref().ok_or_else(|| {
            ApiError::new(
                request_id,
                "validation_error",
                "no shop specified; send x-shop-domain or set SHOPIFY_SHOP_DOMAIN",
            )
        })?,
    };

    normalize_shop_domain(raw)
        .map_err(|e| ApiError::new(request_id, "validation_error", e.to_string()))
}

/// Builds an Admin API client for `shop_domain`.
///
/// The ambient token wins for the default shop; any other shop needs a
/// stored session.
pub(super) async fn admin_client_for(
    state: &AppState,
    shop_domain: &str,
    request_id: &str,
) -> Result<AdminClient, ApiError> {
    let token = match state.config.ambient_token_for(shop_domain) {
        Some(token) => token.to_owned(),
        None => colrank_db::get_shop_session(&state.pool, shop_domain)
            .await
            .map_err(|e| map_db_error(request_id.to_owned(), &e))?
            .map(|session| session.access_token)
            .ok_or_else(|| {
                ApiError::new(
                    request_id,
                    "authentication_required",
                    format!("no access token for shop {shop_domain}; install the app or store a session"),
                )
            })?,
    };

    AdminClient::for_shop(state.http.clone(), &state.config, shop_domain, &token).map_err(|e| {
        tracing::error!(shop = shop_domain, error = %e, "failed to build admin client");
        ApiError::new(request_id, "internal_error", "failed to build admin client")
    })
}

/// [`requested_shop`] followed by [`admin_client_for`].
pub(super) async fn resolve_admin_client(
    state: &AppState,
    headers: &HeaderMap,
    request_id: &str,
) -> Result<AdminClient, ApiError> {
    let shop = requested_shop(state, headers, request_id)?;
    admin_client_for(state, &shop, request_id).await
}
