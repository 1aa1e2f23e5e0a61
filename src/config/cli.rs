use crate::config::{
    validate_provider, DEFAULT_DECK_TITLE, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_HOST,
    DEFAULT_ICON_SIZE, DEFAULT_PLACEHOLDER_BACKGROUND, DEFAULT_PLACEHOLDER_ENDPOINT,
    DEFAULT_PLACEHOLDER_FOREGROUND, DEFAULT_PORT, DEFAULT_SEARCH_ENDPOINT,
};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "icon-deck")]
#[command(about = "HTTP API that turns icon names into a PowerPoint grid")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, default_value = DEFAULT_SEARCH_ENDPOINT)]
    pub search_endpoint: String,

    #[arg(long, default_value = DEFAULT_PLACEHOLDER_ENDPOINT)]
    pub placeholder_endpoint: String,

    #[arg(long, default_value = DEFAULT_PLACEHOLDER_BACKGROUND)]
    pub placeholder_background: String,

    #[arg(long, default_value = DEFAULT_PLACEHOLDER_FOREGROUND)]
    pub placeholder_foreground: String,

    #[arg(long, default_value_t = DEFAULT_ICON_SIZE)]
    pub icon_size: u32,

    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_secs: u64,

    #[arg(long, default_value = DEFAULT_DECK_TITLE)]
    pub deck_title: String,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn search_endpoint(&self) -> &str {
        &self.search_endpoint
    }

    fn placeholder_endpoint(&self) -> &str {
        &self.placeholder_endpoint
    }

    fn placeholder_background(&self) -> &str {
        &self.placeholder_background
    }

    fn placeholder_foreground(&self) -> &str {
        &self.placeholder_foreground
    }

    fn icon_size(&self) -> u32 {
        self.icon_size
    }

    fn fetch_timeout_secs(&self) -> u64 {
        self.fetch_timeout_secs
    }

    fn deck_title(&self) -> &str {
        &self.deck_title
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
