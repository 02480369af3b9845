//! Event topics and payloads routed between pipeline stages.
//!
//! Stages never call each other; the only coupling is the payload a stage
//! emits and the topic the next stage subscribes to. The topic strings are
//! an interoperability contract shared with external consumers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::job::JobId;
use crate::video::{ImprovedTitle, Video};

/// Routing topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Topic {
    #[serde(rename = "yt.submit")]
    Submit,
    #[serde(rename = "yt.channel.resolved")]
    ChannelResolved,
    #[serde(rename = "yt.channel.error")]
    ChannelError,
    #[serde(rename = "yt.videos.fetched")]
    VideosFetched,
    #[serde(rename = "yt.videos.error")]
    VideosError,
    #[serde(rename = "yt.titles.ready")]
    TitlesReady,
    #[serde(rename = "yt.titles.error")]
    TitlesError,
}

impl Topic {
    /// Get the wire name of this topic.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Submit => "yt.submit",
            Topic::ChannelResolved => "yt.channel.resolved",
            Topic::ChannelError => "yt.channel.error",
            Topic::VideosFetched => "yt.videos.fetched",
            Topic::VideosError => "yt.videos.error",
            Topic::TitlesReady => "yt.titles.ready",
            Topic::TitlesError => "yt.titles.error",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload for `yt.submit`: the creation inputs plus the generated job id.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJob {
    pub job_id: JobId,
    pub email: String,
    pub channel: String,
}

/// Payload for `yt.channel.resolved`.
///
/// Carries the resolved channel fields the fetch stage consumes. The job
/// record itself is not updated with them until the fetch stage persists
/// its own result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelResolved {
    pub job_id: JobId,
    pub email: String,
    pub channel_id: String,
    pub channel_name: String,
}

/// Payload for `yt.videos.fetched`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideosFetched {
    pub job_id: JobId,
    pub email: String,
    pub channel_id: String,
    pub channel_name: String,
    pub videos: Vec<Video>,
}

/// Payload for `yt.videos.error`.
///
/// The channel fields are present on the no-videos-found path, where they
/// are already known, and absent on the exception path.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideosError {
    pub job_id: JobId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    pub message: String,
}

/// Payload for `yt.titles.ready`: the terminal successful result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TitlesReady {
    pub job_id: JobId,
    pub email: String,
    pub channel_name: String,
    pub improved_titles: Vec<ImprovedTitle>,
}

/// Payload for `yt.channel.error` and `yt.titles.error`: the addressing
/// fields plus a user-facing message distinct from the diagnostic stored on
/// the job record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageError {
    pub job_id: JobId,
    pub email: String,
    pub message: String,
}

/// A typed event tagged with its routing topic.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "topic", content = "data")]
pub enum Event {
    #[serde(rename = "yt.submit")]
    Submit(SubmitJob),
    #[serde(rename = "yt.channel.resolved")]
    ChannelResolved(ChannelResolved),
    #[serde(rename = "yt.channel.error")]
    ChannelError(StageError),
    #[serde(rename = "yt.videos.fetched")]
    VideosFetched(VideosFetched),
    #[serde(rename = "yt.videos.error")]
    VideosError(VideosError),
    #[serde(rename = "yt.titles.ready")]
    TitlesReady(TitlesReady),
    #[serde(rename = "yt.titles.error")]
    TitlesError(StageError),
}

impl Event {
    /// Routing topic for this event.
    pub fn topic(&self) -> Topic {
        match self {
            Event::Submit(_) => Topic::Submit,
            Event::ChannelResolved(_) => Topic::ChannelResolved,
            Event::ChannelError(_) => Topic::ChannelError,
            Event::VideosFetched(_) => Topic::VideosFetched,
            Event::VideosError(_) => Topic::VideosError,
            Event::TitlesReady(_) => Topic::TitlesReady,
            Event::TitlesError(_) => Topic::TitlesError,
        }
    }
}
