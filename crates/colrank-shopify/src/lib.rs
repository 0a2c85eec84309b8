//! Shopify Admin GraphQL access and the collection-rank synchronizer.

pub mod api;
pub mod client;
pub mod collections;
pub mod error;
pub mod metafields;
pub mod queries;
pub mod sync;
pub mod types;

pub use api::AdminApi;
pub use client::{admin_endpoint, build_http_client, normalize_shop_domain, AdminClient};
pub use collections::{fetch_collection, list_collections, FetchedCollection};
pub use error::{ShopifyError, SyncError};
pub use metafields::{set_product_rank, stamp_collection_rendered};
pub use sync::{load_rankable_collection, sync_collection_ranks, RankSyncOptions};
pub use types::{CollectionPage, CollectionSummary};
