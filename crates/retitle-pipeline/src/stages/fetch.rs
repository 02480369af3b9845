//! Fetch-videos stage.

use std::sync::Arc;

use tracing::{error, info, warn};

use retitle_bus::EventBus;
use retitle_models::{ChannelResolved, Event, Job, JobStatus, VideosError, VideosFetched};
use retitle_store::JobStore;
use retitle_youtube::YoutubeClient;

use crate::error::PipelineResult;

/// User-facing message carried on `yt.videos.error`.
const FETCH_ERROR_MESSAGE: &str = "Failed to fetch videos, please try again";

/// Consumes `yt.channel.resolved`, fetches the channel's uploads and emits
/// `yt.videos.fetched`.
pub struct FetchVideosStage {
    store: Arc<dyn JobStore>,
    bus: EventBus,
    youtube: YoutubeClient,
}

impl FetchVideosStage {
    pub fn new(store: Arc<dyn JobStore>, bus: EventBus, youtube: YoutubeClient) -> Self {
        Self {
            store,
            bus,
            youtube,
        }
    }

    /// Handle one resolved-channel event.
    pub async fn handle(&self, input: ChannelResolved) {
        if let Err(err) = self.process(&input).await {
            warn!(job_id = %input.job_id, error = %err, "Error fetching videos");
            self.fail_job(&input, err.to_string()).await;
            self.bus.emit(Event::VideosError(VideosError {
                job_id: input.job_id.clone(),
                email: input.email.clone(),
                channel_id: None,
                channel_name: None,
                message: FETCH_ERROR_MESSAGE.to_string(),
            }));
        }
    }

    async fn process(&self, input: &ChannelResolved) -> PipelineResult<()> {
        info!(job_id = %input.job_id, channel_id = %input.channel_id, "Fetching videos");

        let mut job = self.load_or_rebuild(input).await?;
        job.set_status(JobStatus::FetchingVideos);
        self.store.put(&job).await?;

        let channel = self.youtube.channel(&input.channel_id).await?;
        let videos = channel.videos_section();

        if videos.is_empty() {
            error!(job_id = %input.job_id, channel_id = %input.channel_id, "No videos found for channel");
            job.fail("No videos found!");
            self.store.put(&job).await?;
            // Unlike the resolve stage's not-found, this failure does raise
            // the error topic, with the channel fields it already knows.
            self.bus.emit(Event::VideosError(VideosError {
                job_id: input.job_id.clone(),
                email: input.email.clone(),
                channel_id: Some(input.channel_id.clone()),
                channel_name: Some(input.channel_name.clone()),
                message: FETCH_ERROR_MESSAGE.to_string(),
            }));
            return Ok(());
        }

        info!(
            job_id = %input.job_id,
            channel_id = %input.channel_id,
            channel_name = %input.channel_name,
            video_count = videos.len(),
            "Videos fetched"
        );

        job.set_status(JobStatus::VideosFetched);
        job.channel_id = Some(input.channel_id.clone());
        job.channel_name = Some(input.channel_name.clone());
        job.videos = videos.clone();
        self.store.put(&job).await?;

        self.bus.emit(Event::VideosFetched(VideosFetched {
            job_id: input.job_id.clone(),
            email: input.email.clone(),
            channel_id: input.channel_id.clone(),
            channel_name: input.channel_name.clone(),
            videos,
        }));
        Ok(())
    }

    async fn load_or_rebuild(&self, input: &ChannelResolved) -> PipelineResult<Job> {
        Ok(self
            .store
            .get(&input.job_id)
            .await?
            .unwrap_or_else(|| Job::new(input.job_id.clone(), input.email.as_str(), "")))
    }

    async fn fail_job(&self, input: &ChannelResolved, error: String) {
        let mut job = match self.store.get(&input.job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => Job::new(input.job_id.clone(), input.email.as_str(), ""),
            Err(store_err) => {
                error!(job_id = %input.job_id, error = %store_err, "Failed to load job for failure update");
                Job::new(input.job_id.clone(), input.email.as_str(), "")
            }
        };
        job.fail(error);
        if let Err(store_err) = self.store.put(&job).await {
            error!(job_id = %input.job_id, error = %store_err, "Failed to persist failure status");
        }
    }
}
