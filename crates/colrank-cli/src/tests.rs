use super::*;

#[test]
fn parses_migrate_command() {
    let cli = Cli::try_parse_from(["colrank-cli", "migrate"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Migrate)));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["colrank-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_session_set_with_scope() {
    let cli = Cli::try_parse_from([
        "colrank-cli",
        "session",
        "set",
        "--shop",
        "best-store.myshopify.com",
        "--token",
        "shpat_abc",
        "--scope",
        "write_products",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Session {
            command: SessionCommands::Set {
                ref shop,
                ref token,
                scope: Some(ref scope),
            }
        }) if shop == "best-store.myshopify.com" && token == "shpat_abc" && scope == "write_products"
    ));
}

#[test]
fn session_set_requires_shop() {
    let result = Cli::try_parse_from(["colrank-cli", "session", "set", "--token", "shpat_abc"]);
    assert!(result.is_err());
}

#[test]
fn parses_session_remove_and_list() {
    let cli = Cli::try_parse_from(["colrank-cli", "session", "remove", "--shop", "a.myshopify.com"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Session {
            command: SessionCommands::Remove { ref shop }
        }) if shop == "a.myshopify.com"
    ));

    let cli = Cli::try_parse_from(["colrank-cli", "session", "list"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Session {
            command: SessionCommands::List
        })
    ));
}

#[test]
fn collections_defaults_limit() {
    let cli = Cli::try_parse_from(["colrank-cli", "collections"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Collections {
            shop: None,
            limit: 50
        })
    ));
}

#[test]
fn parses_rank_command() {
    let cli = Cli::try_parse_from([
        "colrank-cli",
        "rank",
        "--collection",
        "77",
        "--handle",
        "best-sellers",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Rank {
            ref collection,
            ref handle,
            shop: None,
            dry_run: false,
        }) if collection == "77" && handle == "best-sellers"
    ));
}

#[test]
fn parses_rank_dry_run_with_shop() {
    let cli = Cli::try_parse_from([
        "colrank-cli",
        "rank",
        "--collection",
        "gid://shopify/Collection/77",
        "--handle",
        "best-sellers",
        "--shop",
        "other.myshopify.com",
        "--dry-run",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Rank {
            shop: Some(ref s),
            dry_run: true,
            ..
        }) if s == "other.myshopify.com"
    ));
}

#[test]
fn rank_requires_handle() {
    let result = Cli::try_parse_from(["colrank-cli", "rank", "--collection", "77"]);
    assert!(result.is_err());
}

#[test]
fn parses_runs_with_filters() {
    let cli = Cli::try_parse_from([
        "colrank-cli",
        "runs",
        "--limit",
        "5",
        "--collection",
        "77",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Runs {
            limit: 5,
            collection: Some(ref c),
            shop: None,
        }) if c == "77"
    ));
}

#[test]
fn runs_defaults_limit() {
    let cli = Cli::try_parse_from(["colrank-cli", "runs"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Runs {
            limit: 20,
            collection: None,
            shop: None,
        })
    ));
}

#[test]
fn plan_lines_are_one_based_in_collection_order() {
    let products = vec![
        colrank_core::Product {
            id: "gid://shopify/Product/10".to_string(),
            title: "A".to_string(),
        },
        colrank_core::Product {
            id: "gid://shopify/Product/20".to_string(),
            title: "B".to_string(),
        },
    ];

    let lines = rank::plan_lines(&products);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].trim_start().starts_with("1  gid://shopify/Product/10"));
    assert!(lines[0].ends_with('A'));
    assert!(lines[1].trim_start().starts_with("2  gid://shopify/Product/20"));
}

#[test]
fn resolve_shop_prefers_flag_over_default() {
    let mut config = test_config();
    config.shopify_shop_domain = Some("default.myshopify.com".to_string());

    assert_eq!(
        shop::resolve_shop(&config, Some("https://Other.myshopify.com/")).unwrap(),
        "other.myshopify.com"
    );
    assert_eq!(
        shop::resolve_shop(&config, None).unwrap(),
        "default.myshopify.com"
    );
}

#[test]
fn resolve_shop_without_any_shop_fails() {
    let config = test_config();
    assert!(shop::resolve_shop(&config, None).is_err());
}

fn test_config() -> colrank_core::AppConfig {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    colrank_core::AppConfig {
        database_url: "postgres://example".to_string(),
        env: colrank_core::Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 1,
        db_min_connections: 1,
        db_acquire_timeout_secs: 1,
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
