//! Channel lookup error types.

use thiserror::Error;

pub type YoutubeResult<T> = Result<T, YoutubeError>;

#[derive(Debug, Error)]
pub enum YoutubeError {
    #[error("Channel lookup request failed: {0}")]
    RequestFailed(String),

    #[error("Channel lookup returned {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("Failed to decode channel lookup response: {0}")]
    Decode(String),
}
