//! Collection reads: the ordered product list and the shop's collection index.

use std::collections::HashSet;

use colrank_core::{Collection, Product};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::api::AdminApi;
use crate::error::ShopifyError;
use crate::queries::{COLLECTIONS_QUERY, COLLECTION_PRODUCTS_QUERY};
use crate::types::{CollectionPage, CollectionProductsData, CollectionSummary, CollectionsData};

/// A fetched collection and whether its product list was cut at the cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedCollection {
    pub collection: Collection,
    pub truncated: bool,
}

/// Fetches a collection and its products in collection order, following
/// cursors until the list is exhausted or `max_products` is reached.
///
/// `page_size` is the `first:` argument per request. `max_products == 0`
/// means no cap. Returns `Ok(None)` when the collection does not exist.
///
/// # Errors
///
/// Propagates any [`ShopifyError`] from the API, and returns
/// [`ShopifyError::RepeatedCursor`] if the API hands back a cursor it has
/// already returned.
pub async fn fetch_collection<A: AdminApi>(
    api: &A,
    collection_id: &str,
    page_size: u32,
    max_products: usize,
) -> Result<Option<FetchedCollection>, ShopifyError> {
    fetch_pages(api, collection_id, page_size, max_products, false).await
}

/// Like [`fetch_collection`], but stops after the first page when the
/// collection is not manually sorted. The returned product list is then
/// incomplete and must only be used to report the sort order.
pub(crate) async fn fetch_manual_collection<A: AdminApi>(
    api: &A,
    collection_id: &str,
    page_size: u32,
    max_products: usize,
) -> Result<Option<FetchedCollection>, ShopifyError> {
    fetch_pages(api, collection_id, page_size, max_products, true).await
}

async fn fetch_pages<A: AdminApi>(
    api: &A,
    collection_id: &str,
    page_size: u32,
    max_products: usize,
    manual_only: bool,
) -> Result<Option<FetchedCollection>, ShopifyError> {
    let mut cursor: Option<String> = None;
    let mut seen_cursors: HashSet<String> = HashSet::new();
    let mut collection: Option<Collection> = None;
    let mut truncated = false;

    loop {
        let fetched_so_far = collection.as_ref().map_or(0, |c| c.products.len());
        let first = page_request_size(page_size, max_products, fetched_so_far);

        let data = api
            .graphql(
                COLLECTION_PRODUCTS_QUERY,
                json!({ "id": collection_id, "first": first, "after": cursor }),
            )
            .await?;
        let page: CollectionProductsData =
            decode(data, &format!("collection {collection_id} products"))?;

        let Some(node) = page.collection else {
            return Ok(None);
        };

        let target = collection.get_or_insert_with(|| Collection {
            id: node.id.clone(),
            title: node.title.clone(),
            handle: node.handle.clone(),
            sort_order: node.sort_order,
            products: Vec::new(),
        });
        target.products.extend(
            node.products
                .nodes
                .into_iter()
                .map(|p| Product { id: p.id, title: p.title }),
        );

        if manual_only && !target.sort_order.is_manual() {
            tracing::debug!(
                collection_id,
                sort_order = %target.sort_order,
                "collection is not manually sorted; skipping remaining pages"
            );
            break;
        }

        let page_info = node.products.page_info;
        if max_products > 0 && target.products.len() >= max_products {
            truncated = target.products.len() > max_products || page_info.has_next_page;
            target.products.truncate(max_products);
            break;
        }

        cursor = page_info.end_cursor.filter(|_| page_info.has_next_page);
        match &cursor {
            None => break,
            Some(next) if !seen_cursors.insert(next.clone()) => {
                return Err(ShopifyError::RepeatedCursor {
                    context: format!("collection {collection_id}"),
                    cursor: next.clone(),
                });
            }
            Some(_) => {}
        }
    }

    if truncated {
        tracing::warn!(
            collection_id,
            max_products,
            "collection has more products than the configured cap; ranking a truncated list"
        );
    }

    Ok(collection.map(|collection| FetchedCollection {
        collection,
        truncated,
    }))
}

/// Fetches one page of the shop's collections.
///
/// # Errors
///
/// Propagates any [`ShopifyError`] from the API.
pub async fn list_collections<A: AdminApi>(
    api: &A,
    first: u32,
    after: Option<&str>,
) -> Result<CollectionPage, ShopifyError> {
    let data = api
        .graphql(COLLECTIONS_QUERY, json!({ "first": first, "after": after }))
        .await?;
    let page: CollectionsData = decode(data, "collections list")?;
    let connection = page.collections;

    Ok(CollectionPage {
        collections: connection
            .nodes
            .into_iter()
            .map(CollectionSummary::from)
            .collect(),
        next_cursor: connection
            .page_info
            .end_cursor
            .filter(|_| connection.page_info.has_next_page),
    })
}

/// Products to request next: the page size, shrunk so the cap is not overshot.
fn page_request_size(page_size: u32, max_products: usize, fetched_so_far: usize) -> u32 {
    if max_products == 0 {
        return page_size;
    }
    let remaining = max_products.saturating_sub(fetched_so_far);
    u32::try_from(remaining).map_or(page_size, |r| r.clamp(1, page_size))
}

pub(crate) fn decode<T: DeserializeOwned>(
    data: serde_json::Value,
    context: &str,
) -> Result<T, ShopifyError> {
    serde_json::from_value(data).map_err(|e| ShopifyError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}
