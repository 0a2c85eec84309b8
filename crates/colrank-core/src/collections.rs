use serde::{Deserialize, Serialize};

const COLLECTION_GID_PREFIX: &str = "gid://shopify/Collection/";

/// How a collection orders its products, as reported by the Admin API's
/// `sortOrder` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionSortOrder {
    Manual,
    BestSelling,
    AlphaAsc,
    AlphaDesc,
    PriceAsc,
    PriceDesc,
    Created,
    CreatedDesc,
    /// Any value this build does not know about.
    #[serde(other)]
    Unknown,
}

impl CollectionSortOrder {
    /// Only manually sorted collections carry an order worth mirroring; every
    /// other mode is recomputed by the platform.
    #[must_use]
    pub fn is_manual(self) -> bool {
        matches!(self, CollectionSortOrder::Manual)
    }
}

impl std::fmt::Display for CollectionSortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CollectionSortOrder::Manual => "MANUAL",
            CollectionSortOrder::BestSelling => "BEST_SELLING",
            CollectionSortOrder::AlphaAsc => "ALPHA_ASC",
            CollectionSortOrder::AlphaDesc => "ALPHA_DESC",
            CollectionSortOrder::PriceAsc => "PRICE_ASC",
            CollectionSortOrder::PriceDesc => "PRICE_DESC",
            CollectionSortOrder::Created => "CREATED",
            CollectionSortOrder::CreatedDesc => "CREATED_DESC",
            CollectionSortOrder::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Admin API GID, e.g. `"gid://shopify/Product/7301"`.
    pub id: String,
    pub title: String,
}

/// A collection and its products, in collection order, as fetched at one
/// point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub sort_order: CollectionSortOrder,
    pub products: Vec<Product>,
}

/// Normalizes a collection identifier to its Admin API GID.
///
/// Accepts either the bare numeric id (`"4412"`) or the full GID
/// (`"gid://shopify/Collection/4412"`).
#[must_use]
pub fn collection_gid(id: &str) -> String {
    let id = id.trim();
    if id.starts_with("gid://") {
        id.to_string()
    } else {
        format!("{COLLECTION_GID_PREFIX}{id}")
    }
}
