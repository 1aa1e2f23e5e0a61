use crate::config::ServiceSettings;
use crate::core::placeholder::PlaceholderService;
use crate::core::{endpoint_url, IconSearchResult, IconSource, ResolvedIcon};
use crate::utils::error::{DeckError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// Iconify 搜尋服務
pub struct IconifySource {
    client: Client,
    base: Url,
    icon_size: u32,
}

impl IconifySource {
    pub fn new(client: Client, endpoint: &str, icon_size: u32) -> Result<Self> {
        let base = Url::parse(endpoint)?;
        if base.cannot_be_a_base() {
            return Err(DeckError::ConfigError {
                message: format!("Search endpoint cannot carry a path: {}", endpoint),
            });
        }

        Ok(Self {
            client,
            base,
            icon_size,
        })
    }

    /// `{endpoint}/{icon_id}.svg?height={size}`
    pub fn image_url(&self, icon_id: &str) -> String {
        let file_name = format!("{}.svg", icon_id);
        let mut url = endpoint_url(&self.base, &[file_name.as_str()]);
        url.query_pairs_mut()
            .append_pair("height", &self.icon_size.to_string());
        url.into()
    }

    async fn search(&self, icon_name: &str) -> Result<Option<String>> {
        let search_url = endpoint_url(&self.base, &["search"]);
        tracing::debug!("Searching icons at {} for '{}'", search_url, icon_name);

        let response = self
            .client
            .get(search_url)
            .query(&[("query", icon_name), ("limit", "1")])
            .send()
            .await?;

        tracing::debug!("Icon search response status: {}", response.status());

        let result: IconSearchResult = response.error_for_status()?.json().await?;

        // 只取第一筆，不做額外排序
        Ok(result
            .icons
            .into_iter()
            .next()
            .map(|icon_id| self.image_url(&icon_id)))
    }
}

#[async_trait]
impl IconSource for IconifySource {
    fn name(&self) -> &'static str {
        "iconify"
    }

    async fn locate(&self, icon_name: &str) -> Option<String> {
        match self.search(icon_name).await {
            Ok(Some(url)) => Some(url),
            Ok(None) => {
                tracing::warn!("⚠️ No icon found for '{}'", icon_name);
                None
            }
            Err(e) => {
                tracing::warn!("⚠️ Error searching for icon '{}': {}", icon_name, e);
                None
            }
        }
    }
}

/// 依序嘗試每個來源，全部失敗時回傳佔位圖網址
pub struct IconResolver {
    sources: Vec<Arc<dyn IconSource>>,
    placeholder: PlaceholderService,
}

impl IconResolver {
    pub fn new(sources: Vec<Arc<dyn IconSource>>, placeholder: PlaceholderService) -> Self {
        Self {
            sources,
            placeholder,
        }
    }

    pub fn from_settings(client: Client, settings: &ServiceSettings) -> Result<Self> {
        let iconify = IconifySource::new(client, &settings.search_endpoint, settings.icon_size)?;
        Ok(Self::new(
            vec![Arc::new(iconify)],
            PlaceholderService::from_settings(settings)?,
        ))
    }

    pub fn placeholder(&self) -> &PlaceholderService {
        &self.placeholder
    }

    pub async fn resolve(&self, icon_name: &str) -> String {
        for source in &self.sources {
            if let Some(url) = source.locate(icon_name).await {
                tracing::debug!("🔎 '{}' resolved by {}: {}", icon_name, source.name(), url);
                return url;
            }
        }

        let url = self.placeholder.labelled_url(icon_name);
        tracing::debug!("🔎 '{}' falls back to placeholder: {}", icon_name, url);
        url
    }

    /// 依輸入順序逐一解析，每個名稱都會得到一個結果
    pub async fn resolve_all(&self, icon_names: &[String]) -> Vec<ResolvedIcon> {
        let mut icons = Vec::with_capacity(icon_names.len());
        for name in icon_names {
            icons.push(ResolvedIcon {
                name: name.clone(),
                url: self.resolve(name).await,
            });
        }
        icons
    }
}
