use serde::{Deserialize, Serialize};

/// 請求內容：依序排列的圖示名稱，順序決定投影片上的位置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconRequest {
    pub icon_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIcon {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIconsResponse {
    pub icons: Vec<ResolvedIcon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Iconify `/search` 回應中我們用得到的部分
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IconSearchResult {
    #[serde(default)]
    pub icons: Vec<String>,
}

/// 網格中的位置，由索引推導，不另外儲存
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub row: usize,
    pub column: usize,
}
