//! In-process event routing.
//!
//! This crate provides:
//! - A topic-keyed bus with fire-and-forget emission
//! - Per-subscriber channels wired once at startup

pub mod bus;

pub use bus::{EventBus, Subscription};
