//! Shared data models for the retitle backend.
//!
//! This crate provides:
//! - The job record and its status state machine
//! - Video descriptors returned by the channel lookup service
//! - Event payloads and topic names routed over the bus

pub mod event;
pub mod job;
pub mod video;

pub use event::{
    ChannelResolved, Event, StageError, SubmitJob, TitlesReady, Topic, VideosError, VideosFetched,
};
pub use job::{Job, JobId, JobStatus};
pub use video::{ImprovedTitle, Thumbnail, Video, VideoChannel};
