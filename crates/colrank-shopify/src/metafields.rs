//! Metafield writes via `metafieldsSet`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use crate::api::AdminApi;
use crate::collections::decode;
use crate::error::ShopifyError;
use crate::queries::METAFIELDS_SET_MUTATION;
use crate::types::MetafieldsSetData;

/// Writes `namespace.key = rank` (type `number_integer`) on a product.
///
/// # Errors
///
/// Returns any transport/API [`ShopifyError`], or
/// [`ShopifyError::UserErrors`] when the mutation reports user errors.
pub async fn set_product_rank<A: AdminApi>(
    api: &A,
    product_id: &str,
    namespace: &str,
    key: &str,
    rank: u32,
) -> Result<(), ShopifyError> {
    set_metafield(
        api,
        product_id,
        namespace,
        key,
        "number_integer",
        &rank.to_string(),
    )
    .await
}

/// Writes `namespace.key = at` (type `date_time`) on a collection.
///
/// # Errors
///
/// Same as [`set_product_rank`].
pub async fn stamp_collection_rendered<A: AdminApi>(
    api: &A,
    collection_id: &str,
    namespace: &str,
    key: &str,
    at: DateTime<Utc>,
) -> Result<(), ShopifyError> {
    let value = at.to_rfc3339_opts(SecondsFormat::Secs, true);
    set_metafield(api, collection_id, namespace, key, "date_time", &value).await
}

async fn set_metafield<A: AdminApi>(
    api: &A,
    owner_id: &str,
    namespace: &str,
    key: &str,
    kind: &str,
    value: &str,
) -> Result<(), ShopifyError> {
    let variables = json!({
        "metafields": [{
            "ownerId": owner_id,
            "namespace": namespace,
            "key": key,
            "type": kind,
            "value": value,
        }]
    });

    let data = api.graphql(METAFIELDS_SET_MUTATION, variables).await?;
    let context = format!("metafieldsSet {namespace}.{key} on {owner_id}");
    let payload = decode::<MetafieldsSetData>(data, &context)?
        .metafields_set
        .ok_or_else(|| ShopifyError::MissingData {
            context: context.clone(),
        })?;

    if !payload.user_errors.is_empty() {
        let messages = payload
            .user_errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ShopifyError::UserErrors { context, messages });
    }

    Ok(())
}
