//! Stage handlers.
//!
//! Each stage consumes exactly one topic, performs one external call,
//! updates the job record and emits exactly one success or failure event.
//! Stages never reference each other; the bus is the only coupling.

pub mod fetch;
pub mod resolve;
pub mod titles;

pub use fetch::FetchVideosStage;
pub use resolve::ResolveChannelStage;
pub use titles::GenerateTitlesStage;
