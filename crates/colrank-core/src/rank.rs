//! Rank assignment and the per-run result aggregate.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::collections::Product;
use crate::CoreError;

/// Metafield keys are limited to 64 characters.
const MAX_METAFIELD_KEY_LEN: usize = 64;

const RANK_SUFFIX: &str = "_rank";
const LAST_RENDERED_SUFFIX: &str = "_last_rendered_at";

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid handle regex"));

/// Metafield key holding a product's position within the collection `handle`.
#[must_use]
pub fn rank_field_key(handle: &str) -> String {
    format!("{handle}{RANK_SUFFIX}")
}

/// Metafield key stamped on the collection after a sync run.
#[must_use]
pub fn last_rendered_key(handle: &str) -> String {
    format!("{handle}{LAST_RENDERED_SUFFIX}")
}

/// Checks that `handle` can be used to build both metafield keys.
///
/// # Errors
///
/// Returns [`CoreError::InvalidHandle`] if the handle is empty, contains
/// characters other than ASCII letters, digits, `-` and `_`, or would produce a
/// key longer than 64 characters.
pub fn validate_handle(handle: &str) -> Result<(), CoreError> {
    let invalid = |reason: &str| CoreError::InvalidHandle {
        handle: handle.to_string(),
        reason: reason.to_string(),
    };

    if handle.is_empty() {
        return Err(invalid("handle must not be empty"));
    }

    if !HANDLE_RE.is_match(handle) {
        return Err(invalid(
            "only ASCII letters, digits, '-' and '_' are allowed",
        ));
    }

    if last_rendered_key(handle).len() > MAX_METAFIELD_KEY_LEN {
        return Err(invalid("handle is too long to form a metafield key"));
    }

    Ok(())
}

/// Pairs each product with its 1-based position in the slice.
pub fn assign_ranks(products: &[Product]) -> impl Iterator<Item = (u32, &Product)> + '_ {
    (1u32..).zip(products)
}

/// A product whose rank write failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankFailure {
    pub product_id: String,
    pub title: String,
    pub error: String,
}

/// Outcome of one sync run: per-product successes and failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankUpdateResult {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<RankFailure>,
    /// Set when the product list was cut short by the configured cap.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl RankUpdateResult {
    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, product: &Product, error: impl Into<String>) {
        self.failed += 1;
        self.errors.push(RankFailure {
            product_id: product.id.clone(),
            title: product.title.clone(),
            error: error.into(),
        });
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.success + self.failed
    }

    /// Human-readable one-liner for notifications and CLI output.
    #[must_use]
    pub fn summary_message(&self, handle: &str) -> String {
        let key = rank_field_key(handle);
        let mut message = match (self.total(), self.failed) {
            (0, _) => "collection has no products; nothing to rank".to_string(),
            (total, 0) => format!("updated {key} for {total} products"),
            (total, failed) => format!(
                "updated {key} for {} of {total} products; {failed} failed",
                self.success
            ),
        };
        if self.truncated {
            message.push_str(" (product list truncated by COLRANK_RANK_MAX_PRODUCTS)");
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(n: u32) -> Product {
        Product {
            id: format!("gid://shopify/Product/{n}"),
            title: format!("Product {n}"),
        }
    }

    #[test]
    fn keys_are_namespaced_by_handle() {
        assert_eq!(rank_field_key("best-sellers"), "best-sellers_rank");
        assert_eq!(
            last_rendered_key("best-sellers"),
            "best-sellers_last_rendered_at"
        );
    }

    #[test]
    fn assign_ranks_is_one_based_and_ordered() {
        let products = vec![product(10), product(20), product(30)];
        let ranks: Vec<(u32, &str)> = assign_ranks(&products)
            .map(|(rank, p)| (rank, p.id.as_str()))
            .collect();
        assert_eq!(
            ranks,
            vec![
                (1, "gid://shopify/Product/10"),
                (2, "gid://shopify/Product/20"),
                (3, "gid://shopify/Product/30"),
            ]
        );
    }

    #[test]
    fn assign_ranks_empty_slice() {
        assert_eq!(assign_ranks(&[]).count(), 0);
    }

    #[test]
    fn validate_handle_accepts_slugs() {
        assert!(validate_handle("best-sellers").is_ok());
        assert!(validate_handle("summer_2024").is_ok());
    }

    #[test]
    fn validate_handle_rejects_bad_input() {
        assert!(validate_handle("").is_err());
        assert!(validate_handle("best sellers").is_err());
        assert!(validate_handle("café").is_err());
        assert!(validate_handle(&"a".repeat(60)).is_err());
    }

    #[test]
    fn record_failure_keeps_product_details() {
        let mut result = RankUpdateResult::default();
        result.record_success();
        result.record_failure(&product(2), "throttled");
        assert_eq!(result.success, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.total(), 2);
        assert_eq!(result.errors[0].product_id, "gid://shopify/Product/2");
        assert_eq!(result.errors[0].title, "Product 2");
        assert_eq!(result.errors[0].error, "throttled");
    }

    #[test]
    fn summary_message_variants() {
        let mut all_ok = RankUpdateResult::default();
        for _ in 0..3 {
            all_ok.record_success();
        }
        assert_eq!(
            all_ok.summary_message("best-sellers"),
            "updated best-sellers_rank for 3 products"
        );

        let mut partial = all_ok.clone();
        partial.record_failure(&product(4), "boom");
        assert_eq!(
            partial.summary_message("best-sellers"),
            "updated best-sellers_rank for 3 of 4 products; 1 failed"
        );

        assert_eq!(
            RankUpdateResult::default().summary_message("x"),
            "collection has no products; nothing to rank"
        );
    }

    #[test]
    fn result_serializes_with_camel_case_errors() {
        let mut result = RankUpdateResult::default();
        result.record_failure(&product(1), "boom");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], 0);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["errors"][0]["productId"], "gid://shopify/Product/1");
        assert!(json.get("truncated").is_none());
    }
}
