pub mod app_config;
pub mod collections;
pub mod config;
pub mod rank;

pub use app_config::{AppConfig, Environment};
pub use collections::{collection_gid, Collection, CollectionSortOrder, Product};
pub use config::{load_app_config, load_app_config_from_env};
pub use rank::{
    assign_ranks, last_rendered_key, rank_field_key, validate_handle, RankFailure,
    RankUpdateResult,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid collection handle \"{handle}\": {reason}")]
    InvalidHandle { handle: String, reason: String },
}
