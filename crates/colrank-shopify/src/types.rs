//! Admin GraphQL response shapes.
//!
//! Only the fields the queries in [`crate::queries`] select are modelled.
//! `productsCount` is an object (`{ "count": 12 }`) in API versions from
//! 2024-04 on, and may be `null` when the caller lacks product read scope.

use colrank_core::CollectionSortOrder;
use serde::{Deserialize, Serialize};

/// The `{ data, errors }` envelope every GraphQL response uses.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphQlErrorExtensions>,
}

impl GraphQlError {
    pub(crate) fn code(&self) -> Option<&str> {
        self.extensions.as_ref().and_then(|e| e.code.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectionProductsData {
    pub collection: Option<CollectionNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectionNode {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub sort_order: CollectionSortOrder,
    pub products: ProductConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductConnection {
    pub nodes: Vec<ProductNode>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductNode {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectionsData {
    pub collections: CollectionConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectionConnection {
    pub nodes: Vec<CollectionSummaryNode>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectionSummaryNode {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub sort_order: CollectionSortOrder,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub products_count: Option<CountNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountNode {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetafieldsSetData {
    pub metafields_set: Option<MetafieldsSetPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetafieldsSetPayload {
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(path) if !path.is_empty() => write!(f, "{}: {}", path.join("."), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// A collection as listed for the merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub sort_order: CollectionSortOrder,
    pub is_manual: bool,
    pub products_count: Option<u64>,
    pub updated_at: Option<String>,
}

impl From<CollectionSummaryNode> for CollectionSummary {
    fn from(node: CollectionSummaryNode) -> Self {
        Self {
            is_manual: node.sort_order.is_manual(),
            id: node.id,
            title: node.title,
            handle: node.handle,
            sort_order: node.sort_order,
            products_count: node.products_count.map(|c| c.count),
            updated_at: node.updated_at,
        }
    }
}

/// One page of [`CollectionSummary`] values plus the cursor for the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionPage {
    pub collections: Vec<CollectionSummary>,
    pub next_cursor: Option<String>,
}
