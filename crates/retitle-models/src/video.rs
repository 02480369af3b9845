//! Video descriptors returned by the channel lookup service.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Base for canonical watch links attached to improved titles.
const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// One upload as described by the channel lookup service.
///
/// Field names follow the collaborator's camelCase wire format. Only `id`
/// and `title` are required; everything else is lenient so a sparse
/// response still deserializes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub views: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<VideoChannel>,
    #[serde(default)]
    pub is_live: bool,
}

impl Video {
    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("{WATCH_URL_BASE}{}", self.id)
    }
}

/// Thumbnail descriptor nested in a video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Channel block nested in a video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoChannel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub artist: bool,
}

/// One improved title produced by the AI collaborator, mapped back to its
/// source video by position.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImprovedTitle {
    pub original: String,
    pub improved: String,
    pub rationale: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        let video = Video {
            id: "dQw4w9WgXcQ".to_string(),
            title: "Some title".to_string(),
            thumbnail: None,
            published_at: String::new(),
            views: String::new(),
            channel: None,
            is_live: false,
        };
        assert_eq!(
            video.watch_url(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_sparse_wire_video_deserializes() {
        let video: Video =
            serde_json::from_str(r#"{"id": "abc", "title": "T", "isLive": true}"#).unwrap();
        assert_eq!(video.id, "abc");
        assert!(video.is_live);
        assert!(video.thumbnail.is_none());
        assert!(video.views.is_empty());
    }
}
