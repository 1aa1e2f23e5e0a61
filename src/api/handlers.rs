use crate::api::{AppState, SERVICE_NAME};
use crate::core::pptx::PPTX_MEDIA_TYPE;
use crate::domain::model::{IconRequest, MessageResponse, SearchIconsResponse};
use crate::utils::error::DeckError;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub const DECK_FILE_NAME: &str = "icons.pptx";

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<DeckError> for ApiError {
    fn from(err: DeckError) -> Self {
        tracing::error!(
            "❌ Error generating PowerPoint: {} (Category: {:?}, Severity: {:?})",
            err,
            err.category(),
            err.severity()
        );
        ApiError::internal(format!("Error generating PowerPoint: {}", err))
    }
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: SERVICE_NAME.to_string(),
    })
}

#[tracing::instrument(skip_all)]
pub async fn search_icons(
    State(state): State<AppState>,
    Json(request): Json<IconRequest>,
) -> Json<SearchIconsResponse> {
    let icons = state.resolver.resolve_all(&request.icon_names).await;
    tracing::info!("🔎 Resolved {} icon(s)", icons.len());
    Json(SearchIconsResponse { icons })
}

#[tracing::instrument(skip_all)]
pub async fn generate_powerpoint(
    State(state): State<AppState>,
    Json(request): Json<IconRequest>,
) -> Result<Response, ApiError> {
    let bytes = state.deck.build(&request.icon_names).await?;
    tracing::info!(
        "📦 Generated presentation with {} icon(s), {} bytes",
        request.icon_names.len(),
        bytes.len()
    );

    let disposition = format!("attachment; filename=\"{}\"", DECK_FILE_NAME);
    Ok((
        [
            (header::CONTENT_TYPE, PPTX_MEDIA_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
