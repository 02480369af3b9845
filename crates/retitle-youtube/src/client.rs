//! Channel lookup client.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use retitle_models::Video;

use crate::error::{YoutubeError, YoutubeResult};

/// Client for the channel lookup service.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    base_url: String,
    client: Client,
}

/// Channel descriptor returned by the lookup service.
///
/// `id` is absent when the service has no matching channel; that absence,
/// not an error status, is the "not found" signal. When queried by channel
/// id the response also carries a `results` collection of labeled sub-lists.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subscriber: Option<u64>,
    #[serde(default)]
    pub videos: Option<u64>,
    #[serde(default)]
    pub results: Vec<ResultSection>,
}

/// One labeled sub-list in a by-id lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultSection {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

impl ChannelResponse {
    /// The sub-list labeled "videos" (case-insensitive); empty when the
    /// response has no such section.
    pub fn videos_section(&self) -> Vec<Video> {
        self.results
            .iter()
            .find(|section| {
                section
                    .title
                    .as_deref()
                    .is_some_and(|title| title.eq_ignore_ascii_case("videos"))
            })
            .map(|section| section.videos.clone())
            .unwrap_or_default()
    }
}

impl YoutubeClient {
    /// Create a client against the given service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Look up a channel by raw identifier or handle (sigil already
    /// stripped by the caller).
    pub async fn channel(&self, key: &str) -> YoutubeResult<ChannelResponse> {
        let url = format!("{}/channel/{}", self.base_url, urlencoding::encode(key));
        debug!(%url, "Looking up channel");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| YoutubeError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(YoutubeError::BadStatus { status, body });
        }

        response
            .json::<ChannelResponse>()
            .await
            .map_err(|e| YoutubeError::Decode(e.to_string()))
    }
}
