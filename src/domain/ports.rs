use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn search_endpoint(&self) -> &str;
    fn placeholder_endpoint(&self) -> &str;
    fn placeholder_background(&self) -> &str;
    fn placeholder_foreground(&self) -> &str;
    fn icon_size(&self) -> u32;
    fn fetch_timeout_secs(&self) -> u64;
    fn deck_title(&self) -> &str;
}

/// One link of the resolution chain. `None` hands the name to the next source.
#[async_trait]
pub trait IconSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn locate(&self, icon_name: &str) -> Option<String>;
}
