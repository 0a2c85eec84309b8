//! HTTP client for the Shopify Admin GraphQL endpoint.

mod endpoint;

use std::time::Duration;

use colrank_core::AppConfig;
use reqwest::{Client, Url};
use serde_json::json;

use crate::api::AdminApi;
use crate::error::ShopifyError;
use crate::types::GraphQlResponse;

pub use endpoint::{admin_endpoint, normalize_shop_domain};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Builds the shared `reqwest::Client` used for Admin API calls.
///
/// # Errors
///
/// Returns [`ShopifyError::Http`] if the client cannot be constructed.
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, ShopifyError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Admin GraphQL client bound to one shop and one access token.
///
/// Maps 401/403 to [`ShopifyError::Unauthorized`], 429 to
/// [`ShopifyError::RateLimited`], `THROTTLED` GraphQL errors to
/// [`ShopifyError::Throttled`], and any other top-level GraphQL error to
/// [`ShopifyError::GraphQl`]. Nothing is retried.
pub struct AdminClient {
    client: Client,
    shop_domain: String,
    access_token: String,
    endpoint: Url,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("shop_domain", &self.shop_domain)
            .field("access_token", &"[redacted]")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    /// Creates a client for `https://{shop_domain}` with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidShopDomain`] for a malformed shop domain
    /// or [`ShopifyError::Http`] if the HTTP client cannot be built.
    pub fn new(
        shop_domain: &str,
        access_token: &str,
        api_version: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ShopifyError> {
        let shop = normalize_shop_domain(shop_domain)?;
        let base_url = format!("https://{shop}");
        Self::with_base_url(
            &shop,
            access_token,
            api_version,
            timeout_secs,
            user_agent,
            &base_url,
        )
    }

    /// Creates a client that sends requests to `base_url` instead of the shop
    /// host (for proxies and wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidShopDomain`], [`ShopifyError::InvalidBaseUrl`]
    /// or [`ShopifyError::Http`].
    pub fn with_base_url(
        shop_domain: &str,
        access_token: &str,
        api_version: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ShopifyError> {
        let client = build_http_client(timeout_secs, user_agent)?;
        let endpoint = admin_endpoint(base_url, api_version)?;
        Self::with_http_client(client, shop_domain, access_token, endpoint)
    }

    /// Wraps an existing HTTP client, so many shop handles can share one
    /// connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidShopDomain`] for a malformed shop domain.
    pub fn with_http_client(
        client: Client,
        shop_domain: &str,
        access_token: &str,
        endpoint: Url,
    ) -> Result<Self, ShopifyError> {
        Ok(Self {
            client,
            shop_domain: normalize_shop_domain(shop_domain)?,
            access_token: access_token.to_owned(),
            endpoint,
        })
    }

    /// Builds a client for `shop_domain` from application config, honouring
    /// `COLRANK_SHOPIFY_ADMIN_BASE_URL` when set.
    ///
    /// # Errors
    ///
    /// See [`Self::with_http_client`] and [`admin_endpoint`].
    pub fn for_shop(
        client: Client,
        config: &AppConfig,
        shop_domain: &str,
        access_token: &str,
    ) -> Result<Self, ShopifyError> {
        let shop = normalize_shop_domain(shop_domain)?;
        let base_url = config
            .shopify_admin_base_url
            .clone()
            .unwrap_or_else(|| format!("https://{shop}"));
        let endpoint = admin_endpoint(&base_url, &config.shopify_api_version)?;
        Self::with_http_client(client, &shop, access_token, endpoint)
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post_graphql(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, ShopifyError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ShopifyError::Unauthorized {
                shop: self.shop_domain.clone(),
                status: status.as_u16(),
            });
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<f64>().ok())
                .map_or(2, whole_seconds);
            return Err(ShopifyError::RateLimited {
                shop: self.shop_domain.clone(),
                retry_after_secs,
            });
        }

        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = response.text().await?;
        let envelope = serde_json::from_str::<GraphQlResponse>(&body).map_err(|e| {
            ShopifyError::Deserialize {
                context: format!("GraphQL response from {}", self.shop_domain),
                source: e,
            }
        })?;

        if !envelope.errors.is_empty() {
            let messages = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            if envelope.errors.iter().any(|e| e.code() == Some("THROTTLED")) {
                return Err(ShopifyError::Throttled {
                    shop: self.shop_domain.clone(),
                    message: messages,
                });
            }
            return Err(ShopifyError::GraphQl(messages));
        }

        envelope.data.ok_or_else(|| ShopifyError::MissingData {
            context: format!("GraphQL response from {}", self.shop_domain),
        })
    }
}

/// Shopify sends `Retry-After` as a decimal (`"2.0"`).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_seconds(secs: f64) -> u64 {
    secs.ceil().max(0.0) as u64
}

impl AdminApi for AdminClient {
    fn shop_domain(&self) -> &str {
        &self.shop_domain
    }

    async fn graphql(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, ShopifyError> {
        tracing::debug!(shop = %self.shop_domain, "sending Admin GraphQL request");
        self.post_graphql(query, variables).await
    }
}
