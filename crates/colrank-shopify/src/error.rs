use colrank_core::{CollectionSortOrder, CoreError};
use thiserror::Error;

/// Errors from a single Admin API call.
#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Admin API rejected credentials for {shop} (HTTP {status})")]
    Unauthorized { shop: String, status: u16 },

    #[error("rate limited by {shop} (retry after {retry_after_secs}s)")]
    RateLimited { shop: String, retry_after_secs: u64 },

    #[error("query cost throttled by {shop}: {message}")]
    Throttled { shop: String, message: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("{context} rejected: {messages}")]
    UserErrors { context: String, messages: String },

    #[error("response for {context} carried no data")]
    MissingData { context: String },

    #[error("pagination for {context} returned cursor \"{cursor}\" twice")]
    RepeatedCursor { context: String, cursor: String },

    #[error("invalid shop domain \"{shop_domain}\": {reason}")]
    InvalidShopDomain { shop_domain: String, reason: String },

    #[error("invalid Admin API base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// Top-level failures of a rank sync run.
///
/// Per-product write failures never surface here; they are collected in
/// [`colrank_core::RankUpdateResult::errors`].
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("authentication required for shop {shop}")]
    AuthenticationRequired { shop: String },

    #[error("collection {collection_id} not found")]
    NotFound { collection_id: String },

    #[error("collection {collection_id} is sorted {sort_order}; only manually sorted collections can be ranked")]
    InvalidState {
        collection_id: String,
        sort_order: CollectionSortOrder,
    },

    #[error(transparent)]
    InvalidHandle(#[from] CoreError),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl SyncError {
    /// Stable machine-readable code for API responses and run history.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SyncError::AuthenticationRequired { .. } => "authentication_required",
            SyncError::NotFound { .. } => "not_found",
            SyncError::InvalidState { .. } => "invalid_state",
            SyncError::InvalidHandle(_) => "validation_error",
            SyncError::Unexpected(_) => "internal_error",
        }
    }
}

impl From<ShopifyError> for SyncError {
    fn from(err: ShopifyError) -> Self {
        match err {
            ShopifyError::Unauthorized { shop, .. } => SyncError::AuthenticationRequired { shop },
            other => SyncError::Unexpected(other.to_string()),
        }
    }
}
