use crate::config::{
    validate_provider, DEFAULT_DECK_TITLE, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_HOST,
    DEFAULT_ICON_SIZE, DEFAULT_PLACEHOLDER_BACKGROUND, DEFAULT_PLACEHOLDER_ENDPOINT,
    DEFAULT_PLACEHOLDER_FOREGROUND, DEFAULT_PORT, DEFAULT_SEARCH_ENDPOINT,
};
use crate::core::ConfigProvider;
use crate::utils::error::{DeckError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub icons: IconsSection,
    #[serde(default)]
    pub fetch: FetchSection,
    #[serde(default)]
    pub deck: DeckSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IconsSection {
    pub search_endpoint: Option<String>,
    pub placeholder_endpoint: Option<String>,
    pub placeholder_background: Option<String>,
    pub placeholder_foreground: Option<String>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchSection {
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeckSection {
    pub title: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // 常數樣式，編譯失敗代表程式本身有錯
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DeckError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DeckError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ICON_SEARCH_ENDPOINT})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn host(&self) -> &str {
        self.server.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    fn port(&self) -> u16 {
        self.server.port.unwrap_or(DEFAULT_PORT)
    }

    fn search_endpoint(&self) -> &str {
        self.icons
            .search_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_SEARCH_ENDPOINT)
    }

    fn placeholder_endpoint(&self) -> &str {
        self.icons
            .placeholder_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_PLACEHOLDER_ENDPOINT)
    }

    fn placeholder_background(&self) -> &str {
        self.icons
            .placeholder_background
            .as_deref()
            .unwrap_or(DEFAULT_PLACEHOLDER_BACKGROUND)
    }

    fn placeholder_foreground(&self) -> &str {
        self.icons
            .placeholder_foreground
            .as_deref()
            .unwrap_or(DEFAULT_PLACEHOLDER_FOREGROUND)
    }

    fn icon_size(&self) -> u32 {
        self.icons.size.unwrap_or(DEFAULT_ICON_SIZE)
    }

    fn fetch_timeout_secs(&self) -> u64 {
        self.fetch.timeout_seconds.unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS)
    }

    fn deck_title(&self) -> &str {
        self.deck.title.as_deref().unwrap_or(DEFAULT_DECK_TITLE)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
