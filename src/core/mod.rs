pub mod deck;
pub mod fetcher;
pub mod layout;
pub mod placeholder;
pub mod pptx;
pub mod resolver;

pub use crate::domain::model::{IconRequest, IconSearchResult, ResolvedIcon, Slot};
pub use crate::domain::ports::{ConfigProvider, IconSource};
pub use crate::utils::error::Result;

use url::Url;

/// Appends path segments to a base endpoint, keeping any prefix path it already has.
pub(crate) fn endpoint_url(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
