//! Pipeline error types.
//!
//! Every variant's display string ends up in the job record's `error`
//! field, so the wording is part of the observable contract.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Generation failed: Channel name is missing")]
    MissingChannelName,

    #[error("Videos are missing")]
    MissingVideos,

    #[error("Gemini API key is not configured")]
    MissingApiKey,

    #[error("Gemini API Error: {0}")]
    AiApi(String),

    #[error("AI generation failed: {0}")]
    AiFailed(String),

    #[error("Title count mismatch: expected {expected}, got {got}")]
    TitleCountMismatch { expected: usize, got: usize },

    #[error("Channel lookup error: {0}")]
    Youtube(#[from] retitle_youtube::YoutubeError),

    #[error("Store error: {0}")]
    Store(#[from] retitle_store::StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn ai_failed(msg: impl Into<String>) -> Self {
        Self::AiFailed(msg.into())
    }
}
