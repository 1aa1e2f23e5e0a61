use crate::config::ServiceSettings;
use crate::core::endpoint_url;
use crate::utils::error::{DeckError, Result};
use url::Url;

/// 佔位圖服務: `{endpoint}/{size}/{background}/{foreground}?text=...`
#[derive(Debug, Clone)]
pub struct PlaceholderService {
    base: Url,
    size: u32,
    background: String,
    foreground: String,
}

impl PlaceholderService {
    pub fn new(endpoint: &str, size: u32, background: &str, foreground: &str) -> Result<Self> {
        let base = Url::parse(endpoint)?;
        if base.cannot_be_a_base() {
            return Err(DeckError::ConfigError {
                message: format!("Placeholder endpoint cannot carry a path: {}", endpoint),
            });
        }

        Ok(Self {
            base,
            size,
            background: background.to_string(),
            foreground: foreground.to_string(),
        })
    }

    pub fn from_settings(settings: &ServiceSettings) -> Result<Self> {
        Self::new(
            &settings.placeholder_endpoint,
            settings.icon_size,
            &settings.placeholder_background,
            &settings.placeholder_foreground,
        )
    }

    /// Placeholder keyed on the icon name, e.g. `arrow` renders `AR`.
    pub fn labelled_url(&self, icon_name: &str) -> String {
        self.url_with_text(&short_label(icon_name))
    }

    /// The name-independent image used when a download fails.
    pub fn generic_url(&self) -> String {
        self.url_with_text("?")
    }

    fn url_with_text(&self, text: &str) -> String {
        let size = self.size.to_string();
        let mut url = endpoint_url(
            &self.base,
            &[size.as_str(), self.background.as_str(), self.foreground.as_str()],
        );
        url.query_pairs_mut().clear().append_pair("text", text);
        url.into()
    }
}

/// 名稱前兩個字元轉大寫
pub fn short_label(icon_name: &str) -> String {
    icon_name.chars().take(2).collect::<String>().to_uppercase()
}
