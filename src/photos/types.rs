use serde::Deserialize;

/// One entry from a `mediaItems.list` page.
///
/// Received fresh per page and never persisted; `base_url` is an ephemeral,
/// time-limited download base that must be suffixed with a variant query
/// (`=d` / `=dv`) to fetch actual bytes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    pub filename: String,
    pub mime_type: String,
    pub base_url: String,
    #[serde(default)]
    pub media_metadata: Option<MediaMetadata>,
}

impl MediaItem {
    /// Creation timestamp as reported by the service, if present.
    pub fn creation_time(&self) -> Option<&str> {
        self.media_metadata
            .as_ref()
            .and_then(|m| m.creation_time.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    #[serde(default)]
    pub creation_time: Option<String>,
}

/// One `mediaItems.list` response. The service omits `mediaItems` entirely
/// on an empty page, and omits `nextPageToken` on the terminal page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemsPage {
    #[serde(default)]
    pub media_items: Vec<MediaItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
