mod collections;
mod rank;
mod session;
mod shop;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "colrank-cli")]
#[command(about = "Mirror manual collection order into product rank metafields")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Manage stored per-shop Admin API tokens
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// List a shop's collections
    Collections {
        /// Shop domain (defaults to SHOPIFY_SHOP_DOMAIN)
        #[arg(long)]
        shop: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    /// Write `<handle>_rank` on every product of a manually sorted collection
    Rank {
        /// Collection id, numeric or `gid://shopify/Collection/...`
        #[arg(long)]
        collection: String,
        /// Metafield key prefix, e.g. `best-sellers`
        #[arg(long)]
        handle: String,
        /// Shop domain (defaults to SHOPIFY_SHOP_DOMAIN)
        #[arg(long)]
        shop: Option<String>,
        /// Print the planned assignments without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Show recent rank sync runs
    Runs {
        #[arg(long, default_value_t = 20)]
        limit: i64,
        /// Only runs for this collection
        #[arg(long)]
        collection: Option<String>,
        /// Shop domain (defaults to SHOPIFY_SHOP_DOMAIN)
        #[arg(long)]
        shop: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum SessionCommands {
    /// Store or replace the token for a shop
    Set {
        #[arg(long)]
        shop: String,
        #[arg(long, env = "COLRANK_SESSION_TOKEN", hide_env_values = true)]
        token: String,
        #[arg(long)]
        scope: Option<String>,
    },
    /// Delete the token for a shop
    Remove {
        #[arg(long)]
        shop: String,
    },
    /// List shops with a stored token
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("colrank-cli: no command given; see --help");
        return Ok(());
    };

    let config = colrank_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = colrank_db::PoolConfig::from_app_config(&config);
    let pool = colrank_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Migrate => {
            let applied = colrank_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Session { command } => match command {
            SessionCommands::Set { shop, token, scope } => {
                session::run_session_set(&pool, &shop, &token, scope.as_deref()).await?;
            }
            SessionCommands::Remove { shop } => session::run_session_remove(&pool, &shop).await?,
            SessionCommands::List => session::run_session_list(&pool).await?,
        },
        Commands::Collections { shop, limit } => {
            collections::run_collections(&pool, &config, shop.as_deref(), limit).await?;
        }
        Commands::Rank {
            collection,
            handle,
            shop,
            dry_run,
        } => {
            rank::run_rank(
                &pool,
                &config,
                &rank::RankArgs {
                    collection: &collection,
                    handle: &handle,
                    shop: shop.as_deref(),
                    dry_run,
                },
            )
            .await?;
        }
        Commands::Runs {
            limit,
            collection,
            shop,
        } => {
            rank::run_runs(&pool, &config, shop.as_deref(), collection.as_deref(), limit).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
