#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.iconify.design";
pub const DEFAULT_PLACEHOLDER_ENDPOINT: &str = "https://via.placeholder.com";
pub const DEFAULT_PLACEHOLDER_BACKGROUND: &str = "4A90E2";
pub const DEFAULT_PLACEHOLDER_FOREGROUND: &str = "FFFFFF";
pub const DEFAULT_ICON_SIZE: u32 = 128;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DECK_TITLE: &str = "Your Icons";

/// 解析完成的服務設定，不論來源是 CLI 還是 TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSettings {
    pub host: String,
    pub port: u16,
    pub search_endpoint: String,
    pub placeholder_endpoint: String,
    pub placeholder_background: String,
    pub placeholder_foreground: String,
    pub icon_size: u32,
    pub fetch_timeout_secs: u64,
    pub deck_title: String,
}

impl ServiceSettings {
    pub fn from_provider<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            host: config.host().to_string(),
            port: config.port(),
            search_endpoint: config.search_endpoint().to_string(),
            placeholder_endpoint: config.placeholder_endpoint().to_string(),
            placeholder_background: config.placeholder_background().to_string(),
            placeholder_foreground: config.placeholder_foreground().to_string(),
            icon_size: config.icon_size(),
            fetch_timeout_secs: config.fetch_timeout_secs(),
            deck_title: config.deck_title().to_string(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            placeholder_endpoint: DEFAULT_PLACEHOLDER_ENDPOINT.to_string(),
            placeholder_background: DEFAULT_PLACEHOLDER_BACKGROUND.to_string(),
            placeholder_foreground: DEFAULT_PLACEHOLDER_FOREGROUND.to_string(),
            icon_size: DEFAULT_ICON_SIZE,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            deck_title: DEFAULT_DECK_TITLE.to_string(),
        }
    }
}

impl ConfigProvider for ServiceSettings {
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

/// 所有設定來源共用的檢查
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validation::validate_non_empty_string("host", config.host())?;
    validation::validate_positive_number("port", config.port(), 1)?;
    validation::validate_url("search_endpoint", config.search_endpoint())?;
    validation::validate_url("placeholder_endpoint", config.placeholder_endpoint())?;
    validation::validate_hex_color("placeholder_background", config.placeholder_background())?;
    validation::validate_hex_color("placeholder_foreground", config.placeholder_foreground())?;
    validation::validate_range("icon_size", config.icon_size(), 16, 1024)?;
    validation::validate_positive_number("fetch_timeout_secs", config.fetch_timeout_secs(), 1)?;
    validation::validate_non_empty_string("deck_title", config.deck_title())?;
    Ok(())
}

impl Validate for ServiceSettings {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = ServiceSettings::default();

        assert!(settings.validate().is_ok());
        assert_eq!(settings.bind_address(), "0.0.0.0:8000");
        assert_eq!(settings.icon_size, 128);
        assert_eq!(settings.fetch_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let settings = ServiceSettings {
            search_endpoint: "not a url".to_string(),
            ..ServiceSettings::default()
        };

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let settings = ServiceSettings {
            placeholder_foreground: "#FFF".to_string(),
            ..ServiceSettings::default()
        };

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_from_provider_copies_every_field() {
        let source = ServiceSettings {
            port: 9000,
            deck_title: "Team Icons".to_string(),
            ..ServiceSettings::default()
        };

        let copied = ServiceSettings::from_provider(&source);
        assert_eq!(copied, source);
    }
}
