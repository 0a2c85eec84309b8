//! Offline tests for colrank-db pool configuration and row types.
//! These tests do not require a live database connection.

use colrank_core::{AppConfig, Environment};
use colrank_db::{PoolConfig, RankRunOutcome, RankRunRow, RunStatus, ShopSessionRow};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        shopify_shop_domain: None,
        shopify_access_token: None,
        shopify_api_version: "2024-10".to_string(),
        shopify_admin_base_url: None,
        shopify_request_timeout_secs: 30,
        user_agent: "ua".to_string(),
        rank_namespace: "custom".to_string(),
        rank_page_size: 100,
        rank_max_products: 0,
        stamp_last_rendered: true,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`RankRunRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn rank_run_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = RankRunRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        shop_domain: "best-store.myshopify.com".to_string(),
        collection_id: "gid://shopify/Collection/77".to_string(),
        handle: "best-sellers".to_string(),
        trigger_source: "cli".to_string(),
        status: RunStatus::Running.as_str().to_string(),
        products_succeeded: 0_i32,
        products_failed: 0_i32,
        error_message: None,
        started_at: Utc::now(),
        completed_at: None,
        created_at: Utc::now(),
    };

    assert_eq!(row.status, "running");
    assert_eq!(row.handle, "best-sellers");
    assert!(row.completed_at.is_none());
}

#[test]
fn shop_session_debug_redacts_token() {
    use chrono::Utc;

    let row = ShopSessionRow {
        id: 1,
        shop_domain: "best-store.myshopify.com".to_string(),
        access_token: "shpat_secret".to_string(),
        scope: Some("write_products".to_string()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let debug = format!("{row:?}");
    assert!(!debug.contains("shpat_secret"));
    assert!(debug.contains("best-store.myshopify.com"));
}

#[test]
fn partial_outcome_maps_to_partial_status() {
    let outcome = RankRunOutcome {
        succeeded: 3,
        failed: 1,
    };
    assert_eq!(outcome.status(), RunStatus::Partial);
}
