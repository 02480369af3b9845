//! Job record and status state machine.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::video::{ImprovedTitle, Video};

/// Unique identifier for a job.
///
/// Generated at submission time from a millisecond timestamp plus a random
/// component, so ids stay unique across processes while remaining readable
/// in logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new job ID.
    pub fn new() -> Self {
        Self(format!(
            "Job_{}_{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple()
        ))
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job status advancing along the pipeline.
///
/// The serialized strings (including their uneven capitalization) are the
/// storage and wire format shared with existing records and consumers and
/// must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum JobStatus {
    /// Job created, pipeline not yet triggered
    #[default]
    #[serde(rename = "queued")]
    Queued,
    /// Resolve stage is looking up the channel
    #[serde(rename = "resolving channel")]
    ResolvingChannel,
    /// Fetch stage is loading the channel's uploads
    #[serde(rename = "Fetching videos")]
    FetchingVideos,
    /// Uploads persisted, titles stage not yet started
    #[serde(rename = "videos fetched")]
    VideosFetched,
    /// Titles stage is waiting on the AI collaborator
    #[serde(rename = "Generating titles")]
    GeneratingTitles,
    /// Terminal success, improved titles persisted
    #[serde(rename = "titles ready")]
    TitlesReady,
    /// Terminal failure, reachable from any non-terminal state
    #[serde(rename = "failed")]
    Failed,
}

impl JobStatus {
    /// Get the storage/wire string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::ResolvingChannel => "resolving channel",
            JobStatus::FetchingVideos => "Fetching videos",
            JobStatus::VideosFetched => "videos fetched",
            JobStatus::GeneratingTitles => "Generating titles",
            JobStatus::TitlesReady => "titles ready",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::TitlesReady | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single user-initiated request moving through the pipeline.
///
/// One record exists per job id; each downstream stage overwrites the whole
/// record once with its own status and stage-specific fields. Nothing ever
/// rewinds or deletes an earlier stage's data.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique job ID
    pub job_id: JobId,

    /// Notification address supplied at creation
    pub email: String,

    /// Channel identifier or @handle supplied at creation
    pub channel: String,

    /// Current pipeline status
    #[serde(default)]
    pub status: JobStatus,

    /// Diagnostic message, present only when the job failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Resolved channel id, persisted by the fetch stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,

    /// Resolved channel name, persisted by the fetch stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,

    /// Channel uploads, persisted by the fetch stage
    #[serde(default)]
    pub videos: Vec<Video>,

    /// Terminal successful payload, persisted by the titles stage
    #[serde(default)]
    pub improved_titles: Vec<ImprovedTitle>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Create a fresh queued job.
    pub fn new(job_id: JobId, email: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            job_id,
            email: email.into(),
            channel: channel.into(),
            status: JobStatus::Queued,
            error: None,
            channel_id: None,
            channel_name: None,
            videos: Vec::new(),
            improved_titles: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Update the status field.
    pub fn set_status(&mut self, status: JobStatus) {
        self.status = status;
    }

    /// Mark the job failed with a diagnostic message.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
    }

    /// Check if the job reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_is_queued() {
        let job = Job::new(JobId::new(), "a@b.com", "@example");
        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.error.is_none());
        assert!(job.videos.is_empty());
        assert!(!job.is_terminal());
    }

    #[test]
    fn test_job_id_format() {
        let id = JobId::new();
        assert!(id.as_str().starts_with("Job_"));
        assert_ne!(JobId::new(), JobId::new());
    }

    #[test]
    fn test_fail_is_terminal_and_records_error() {
        let mut job = Job::new(JobId::new(), "a@b.com", "@example");
        job.set_status(JobStatus::ResolvingChannel);
        job.fail("Channel not found!");

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("Channel not found!"));
        assert!(job.is_terminal());
    }

    #[test]
    fn test_status_wire_strings() {
        // Storage format contract: these exact strings, capitalization included.
        assert_eq!(
            serde_json::to_value(JobStatus::FetchingVideos).unwrap(),
            "Fetching videos"
        );
        assert_eq!(
            serde_json::to_value(JobStatus::TitlesReady).unwrap(),
            "titles ready"
        );
        assert_eq!(
            serde_json::from_value::<JobStatus>("resolving channel".into()).unwrap(),
            JobStatus::ResolvingChannel
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::TitlesReady.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::GeneratingTitles.is_terminal());
    }

    #[test]
    fn test_record_field_names() {
        let job = Job::new(JobId::from_string("Job_1_x"), "a@b.com", "UC123");
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["jobId"], "Job_1_x");
        assert_eq!(value["status"], "queued");
        assert!(value.get("createdAt").is_some());
        // Absent optionals stay off the record entirely.
        assert!(value.get("error").is_none());
        assert!(value.get("channelId").is_none());
    }
}
