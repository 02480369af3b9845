//! Resolve-channel stage.

use std::sync::Arc;

use tracing::{error, info, warn};

use retitle_bus::EventBus;
use retitle_models::{ChannelResolved, Event, Job, JobStatus, StageError, SubmitJob};
use retitle_store::JobStore;
use retitle_youtube::YoutubeClient;

use crate::error::PipelineResult;

/// User-facing message carried on `yt.channel.error`.
const RESOLVE_ERROR_MESSAGE: &str = "Failed to resolve channel, please try again";

/// Consumes `yt.submit`, resolves the channel and emits
/// `yt.channel.resolved`.
pub struct ResolveChannelStage {
    store: Arc<dyn JobStore>,
    bus: EventBus,
    youtube: YoutubeClient,
}

impl ResolveChannelStage {
    pub fn new(store: Arc<dyn JobStore>, bus: EventBus, youtube: YoutubeClient) -> Self {
        Self {
            store,
            bus,
            youtube,
        }
    }

    /// Handle one submission event.
    ///
    /// Processing errors mark the job failed and emit `yt.channel.error`;
    /// they never propagate to the consume loop.
    pub async fn handle(&self, input: SubmitJob) {
        if let Err(err) = self.process(&input).await {
            warn!(job_id = %input.job_id, error = %err, "Error resolving channel");
            self.fail_job(&input, err.to_string()).await;
            self.bus.emit(Event::ChannelError(StageError {
                job_id: input.job_id.clone(),
                email: input.email.clone(),
                message: RESOLVE_ERROR_MESSAGE.to_string(),
            }));
        }
    }

    async fn process(&self, input: &SubmitJob) -> PipelineResult<()> {
        info!(job_id = %input.job_id, channel = %input.channel, "Resolving channel");

        let mut job = self.load_or_rebuild(input).await?;
        job.set_status(JobStatus::ResolvingChannel);
        self.store.put(&job).await?;

        // "@handle" resolves by handle, anything else by raw identifier.
        let lookup_key = input.channel.strip_prefix('@').unwrap_or(&input.channel);
        let channel = self.youtube.channel(lookup_key).await?;

        let Some(channel_id) = channel.id.clone() else {
            // Terminal silent failure: the job record is the only signal.
            // No `yt.channel.error` is emitted for an unknown channel.
            error!(job_id = %input.job_id, channel = %input.channel, "Channel not found");
            job.fail("Channel not found!");
            self.store.put(&job).await?;
            return Ok(());
        };

        let channel_name = channel.title.clone().unwrap_or_default();
        info!(
            job_id = %input.job_id,
            channel_id = %channel_id,
            channel_name = %channel_name,
            subscribers = channel.subscriber.unwrap_or(0),
            videos = channel.videos.unwrap_or(0),
            "Resolved channel"
        );

        self.bus.emit(Event::ChannelResolved(ChannelResolved {
            job_id: input.job_id.clone(),
            email: input.email.clone(),
            channel_id,
            channel_name,
        }));
        Ok(())
    }

    /// Load the record, rebuilding a minimal one from the event when the
    /// store has none.
    async fn load_or_rebuild(&self, input: &SubmitJob) -> PipelineResult<Job> {
        Ok(self.store.get(&input.job_id).await?.unwrap_or_else(|| {
            Job::new(
                input.job_id.clone(),
                input.email.as_str(),
                input.channel.as_str(),
            )
        }))
    }

    async fn fail_job(&self, input: &SubmitJob, error: String) {
        let mut job = match self.store.get(&input.job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => Job::new(
                input.job_id.clone(),
                input.email.as_str(),
                input.channel.as_str(),
            ),
            Err(store_err) => {
                error!(job_id = %input.job_id, error = %store_err, "Failed to load job for failure update");
                Job::new(
                    input.job_id.clone(),
                    input.email.as_str(),
                    input.channel.as_str(),
                )
            }
        };
        job.fail(error);
        if let Err(store_err) = self.store.put(&job).await {
            error!(job_id = %input.job_id, error = %store_err, "Failed to persist failure status");
        }
    }
}
