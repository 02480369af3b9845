//! Event-driven pipeline stages.
//!
//! This crate provides:
//! - The resolve/fetch/titles stage handlers
//! - The Gemini title-generation client
//! - Stage wiring over the in-process bus

pub mod config;
pub mod error;
pub mod gemini;
pub mod runtime;
pub mod stages;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use gemini::{GeneratedTitle, TitleGenClient};
pub use runtime::spawn_stages;
pub use stages::{FetchVideosStage, GenerateTitlesStage, ResolveChannelStage};
