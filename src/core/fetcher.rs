use crate::config::ServiceSettings;
use crate::core::placeholder::PlaceholderService;
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

/// 下載圖示位元組；失敗時改抓通用佔位圖，不會把錯誤往外丟
pub struct IconFetcher {
    client: Client,
    timeout: Duration,
    placeholder: PlaceholderService,
}

impl IconFetcher {
    pub fn new(client: Client, timeout: Duration, placeholder: PlaceholderService) -> Self {
        Self {
            client,
            timeout,
            placeholder,
        }
    }

    pub fn from_settings(client: Client, settings: &ServiceSettings) -> Result<Self> {
        Ok(Self::new(
            client,
            Duration::from_secs(settings.fetch_timeout_secs),
            PlaceholderService::from_settings(settings)?,
        ))
    }

    /// Returns the body at `url`, the generic placeholder's body, or an empty
    /// buffer when neither could be downloaded.
    pub async fn fetch(&self, url: &str) -> Vec<u8> {
        match self.download(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("⚠️ Error downloading icon from {}: {}", url, e);
                self.fetch_generic().await
            }
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Downloading icon from {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    async fn fetch_generic(&self) -> Vec<u8> {
        let url = self.placeholder.generic_url();

        // 不檢查狀態碼，回應內容照單全收
        let result = async {
            let response = self.client.get(&url).timeout(self.timeout).send().await?;
            response.bytes().await
        }
        .await;

        match result {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                tracing::warn!("⚠️ Generic placeholder unavailable at {}: {}", url, e);
                Vec::new()
            }
        }
    }
}
