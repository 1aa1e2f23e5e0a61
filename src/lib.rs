pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use self::config::cli::CliConfig;

pub use self::api::{router, AppState};
pub use self::config::{toml_config::TomlConfig, ServiceSettings};
pub use self::core::{deck::DeckBuilder, fetcher::IconFetcher, resolver::IconResolver};
pub use self::utils::error::{DeckError, Result};
