//! HTTP surface for the retitle pipeline.
//!
//! This crate provides:
//! - The submission endpoint that creates jobs and triggers the pipeline
//! - Job record and health endpoints
//! - The server binary wiring store, bus and stages into one process

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
