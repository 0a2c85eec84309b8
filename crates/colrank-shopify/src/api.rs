use std::future::Future;

use crate::error::ShopifyError;

/// An authenticated handle on one shop's Admin GraphQL API.
///
/// Everything that talks to the shop takes `&impl AdminApi`, so the same code
/// runs against an ambient token, a stored session, or a test double.
pub trait AdminApi: Sync {
    /// The `*.myshopify.com` domain this handle is bound to.
    fn shop_domain(&self) -> &str;

    /// Runs one GraphQL document and returns its `data` object.
    fn graphql(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> impl Future<Output = Result<serde_json::Value, ShopifyError>> + Send;
}
