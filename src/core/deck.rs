use crate::config::ServiceSettings;
use crate::core::fetcher::IconFetcher;
use crate::core::layout::{inches_milli, Frame, GridLayout};
use crate::core::pptx::{EmbeddedImage, Presentation, Slide, TextBox};
use crate::core::resolver::IconResolver;
use crate::utils::error::Result;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// 28.8pt
pub const TITLE_FONT_SIZE: u32 = 2_880;
/// 10.8pt
pub const LABEL_FONT_SIZE: u32 = 1_080;

const TITLE_FRAME: Frame = Frame::new(
    inches_milli(500),
    inches_milli(500),
    inches_milli(9_000),
    inches_milli(1_000),
);

/// 把圖示名稱排成單張投影片的網格
pub struct DeckBuilder {
    resolver: Arc<IconResolver>,
    fetcher: Arc<IconFetcher>,
    layout: GridLayout,
    title: String,
}

impl DeckBuilder {
    pub fn new(
        resolver: Arc<IconResolver>,
        fetcher: Arc<IconFetcher>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            layout: GridLayout::default(),
            title: title.into(),
        }
    }

    pub fn from_settings(client: Client, settings: &ServiceSettings) -> Result<Self> {
        let resolver = IconResolver::from_settings(client.clone(), settings)?;
        let fetcher = IconFetcher::from_settings(client, settings)?;
        Ok(Self::new(
            Arc::new(resolver),
            Arc::new(fetcher),
            settings.deck_title.clone(),
        ))
    }

    pub fn resolver(&self) -> &Arc<IconResolver> {
        &self.resolver
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Builds the slide model. Per-icon failures degrade and never abort the deck.
    pub async fn build_presentation(&self, icon_names: &[String]) -> Presentation {
        let mut presentation = Presentation::new(self.title.clone());
        let slide = presentation.add_slide();

        slide.add_text_box(
            TextBox::new(TITLE_FRAME, self.title.clone())
                .font_size(TITLE_FONT_SIZE)
                .bold()
                .centered(),
        );

        for (index, name) in icon_names.iter().enumerate() {
            self.place_icon(slide, index, name).await;
        }

        tracing::debug!(
            "Laid out {} icon(s) into {} shape(s)",
            icon_names.len(),
            slide.shapes().len()
        );
        presentation
    }

    /// 產生 `.pptx` 位元組
    pub async fn build(&self, icon_names: &[String]) -> Result<Vec<u8>> {
        self.build_presentation(icon_names).await.to_pptx()
    }

    async fn place_icon(&self, slide: &mut Slide, index: usize, name: &str) {
        let slot = self.layout.slot(index);
        let frame = self.layout.icon_frame(slot);

        let url = self.resolver.resolve(name).await;
        let bytes = self.icon_bytes(name, &url).await;

        match EmbeddedImage::decode(bytes) {
            Ok(image) => slide.add_picture(frame, name, image),
            Err(e) => {
                tracing::warn!("⚠️ Error adding icon '{}': {}", name, e);
                slide.add_text_box(TextBox::new(frame, fallback_text(name)).centered());
            }
        }

        slide.add_text_box(
            TextBox::new(self.layout.label_frame(slot), name)
                .font_size(LABEL_FONT_SIZE)
                .centered(),
        );
    }

    async fn icon_bytes(&self, name: &str, url: &str) -> Vec<u8> {
        if is_vector_url(url) {
            // 不做 SVG 點陣化，一律換成兩字元佔位圖
            let placeholder = self.resolver.placeholder().labelled_url(name);
            tracing::debug!("'{}' resolved to vector image, using {}", name, placeholder);
            return self.fetcher.fetch(&placeholder).await;
        }

        self.fetcher.fetch(url).await
    }
}

/// 無法嵌入圖片時顯示的文字：名稱前四個字元轉大寫
pub fn fallback_text(icon_name: &str) -> String {
    icon_name.chars().take(4).collect::<String>().to_uppercase()
}

/// True when the URL path names an SVG file; the query string is ignored.
pub fn is_vector_url(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    };
    path.to_ascii_lowercase().ends_with(".svg")
}
