use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Default shop, e.g. `"best-store.myshopify.com"`.
    pub shopify_shop_domain: Option<String>,
    /// Ambient Admin API token for [`Self::shopify_shop_domain`]. When absent,
    /// tokens come from stored shop sessions.
    pub shopify_access_token: Option<String>,
    pub shopify_api_version: String,
    /// Overrides `https://{shop}` as the Admin API base URL.
    pub shopify_admin_base_url: Option<String>,
    pub shopify_request_timeout_secs: u64,
    pub user_agent: String,
    pub rank_namespace: String,
    /// Products requested per collection page (1..=250).
    pub rank_page_size: u32,
    /// Upper bound on products ranked per run. `0` means no cap.
    pub rank_max_products: usize,
    pub stamp_last_rendered: bool,
}

impl AppConfig {
    /// Returns the ambient access token if `shop_domain` is the configured default shop.
    #[must_use]
    pub fn ambient_token_for(&self, shop_domain: &str) -> Option<&str> {
        match (&self.shopify_shop_domain, &self.shopify_access_token) {
            (Some(default_shop), Some(token)) if *default_shop == bare_shop_domain(shop_domain) => {
                Some(token.as_str())
            }
            _ => None,
        }
    }
}

/// Strips scheme, trailing slashes and case from a shop domain, so
/// `https://Best-Store.myshopify.com/` and `best-store.myshopify.com` compare equal.
pub(crate) fn bare_shop_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed)
        .trim_end_matches('/')
        .to_ascii_lowercase()
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("shopify_shop_domain", &self.shopify_shop_domain)
            .field(
                "shopify_access_token",
                &self.shopify_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("shopify_api_version", &self.shopify_api_version)
            .field("shopify_admin_base_url", &self.shopify_admin_base_url)
            .field(
                "shopify_request_timeout_secs",
                &self.shopify_request_timeout_secs,
            )
            .field("user_agent", &self.user_agent)
            .field("rank_namespace", &self.rank_namespace)
            .field("rank_page_size", &self.rank_page_size)
            .field("rank_max_products", &self.rank_max_products)
            .field("stamp_last_rendered", &self.stamp_last_rendered)
            .finish()
    }
}
