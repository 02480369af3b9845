//! Channel lookup collaborator client.
//!
//! This crate provides:
//! - A thin HTTP client for the channel lookup service
//! - The channel descriptor returned for id and handle queries

pub mod client;
pub mod error;

pub use client::{ChannelResponse, ResultSection, YoutubeClient};
pub use error::{YoutubeError, YoutubeResult};
