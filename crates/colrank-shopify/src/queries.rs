//! GraphQL documents sent to the Admin API.

/// One page of a collection's products in collection order.
///
/// `sortKey: COLLECTION_DEFAULT` returns products in the collection's own
/// order, which for a manual collection is the merchant's arrangement.
pub const COLLECTION_PRODUCTS_QUERY: &str = r"
query CollectionProducts($id: ID!, $first: Int!, $after: String) {
  collection(id: $id) {
    id
    title
    handle
    sortOrder
    products(first: $first, after: $after, sortKey: COLLECTION_DEFAULT) {
      nodes {
        id
        title
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
";

/// One page of the shop's collections, by title.
pub const COLLECTIONS_QUERY: &str = r"
query Collections($first: Int!, $after: String) {
  collections(first: $first, after: $after, sortKey: TITLE) {
    nodes {
      id
      title
      handle
      sortOrder
      updatedAt
      productsCount {
        count
      }
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}
";

pub const METAFIELDS_SET_MUTATION: &str = r"
mutation MetafieldsSet($metafields: [MetafieldsSetInput!]!) {
  metafieldsSet(metafields: $metafields) {
    metafields {
      id
      namespace
      key
      value
    }
    userErrors {
      field
      message
      code
    }
  }
}
";
