pub mod handlers;

use crate::config::ServiceSettings;
use crate::core::deck::DeckBuilder;
use crate::core::resolver::IconResolver;
use crate::utils::error::Result;
use axum::routing::{get, post};
use axum::Router;
use reqwest::Client;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub const SERVICE_NAME: &str = "Icon to PowerPoint API";

/// 每個請求共用的唯讀狀態；唯一共享的資源是 HTTP client
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<IconResolver>,
    pub deck: Arc<DeckBuilder>,
}

impl AppState {
    pub fn new(deck: DeckBuilder) -> Self {
        Self {
            resolver: Arc::clone(deck.resolver()),
            deck: Arc::new(deck),
        }
    }

    pub fn from_settings(settings: &ServiceSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(DeckBuilder::from_settings(client, settings)?))
    }
}

/// 允許任意來源；因為要帶 credentials，所以回填請求的 Origin 而不是 `*`
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/search-icons", post(handlers::search_icons))
        .route("/generate-powerpoint", post(handlers::generate_powerpoint))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
