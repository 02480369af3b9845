//! Generate-titles stage.

use std::sync::Arc;

use tracing::{error, info, warn};

use retitle_bus::EventBus;
use retitle_models::{Event, ImprovedTitle, Job, JobStatus, StageError, TitlesReady, VideosFetched};
use retitle_store::JobStore;

use crate::error::{PipelineError, PipelineResult};
use crate::gemini::TitleGenClient;

/// User-facing message carried on `yt.titles.error`.
const TITLES_ERROR_MESSAGE: &str = "Failed to generate titles, please try again";

/// Consumes `yt.videos.fetched`, asks the AI collaborator for improved
/// titles and emits `yt.titles.ready`.
pub struct GenerateTitlesStage {
    store: Arc<dyn JobStore>,
    bus: EventBus,
    gemini: TitleGenClient,
}

impl GenerateTitlesStage {
    pub fn new(store: Arc<dyn JobStore>, bus: EventBus, gemini: TitleGenClient) -> Self {
        Self { store, bus, gemini }
    }

    /// Handle one fetched-videos event.
    pub async fn handle(&self, input: VideosFetched) {
        if let Err(err) = self.process(&input).await {
            warn!(job_id = %input.job_id, error = %err, "Error generating titles");
            self.fail_job(&input, err.to_string()).await;
            self.bus.emit(Event::TitlesError(StageError {
                job_id: input.job_id.clone(),
                email: input.email.clone(),
                message: TITLES_ERROR_MESSAGE.to_string(),
            }));
        }
    }

    async fn process(&self, input: &VideosFetched) -> PipelineResult<()> {
        info!(job_id = %input.job_id, videos = input.videos.len(), "Generating titles");

        // Validation failures take this handler's own failure path; nothing
        // has touched the record yet.
        if input.channel_name.is_empty() {
            return Err(PipelineError::MissingChannelName);
        }
        if input.videos.is_empty() {
            return Err(PipelineError::MissingVideos);
        }
        if !self.gemini.is_configured() {
            return Err(PipelineError::MissingApiKey);
        }

        let mut job = self.load_or_rebuild(input).await?;
        job.set_status(JobStatus::GeneratingTitles);
        self.store.put(&job).await?;

        let generated = self
            .gemini
            .improve_titles(&input.channel_name, &input.videos)
            .await?;

        // Titles map back to videos by position, so the counts must agree.
        if generated.len() != input.videos.len() {
            return Err(PipelineError::TitleCountMismatch {
                expected: input.videos.len(),
                got: generated.len(),
            });
        }

        let improved_titles: Vec<ImprovedTitle> = generated
            .into_iter()
            .zip(&input.videos)
            .map(|(title, video)| ImprovedTitle {
                original: title.original,
                improved: title.improved,
                rationale: title.rationale,
                url: video.watch_url(),
            })
            .collect();

        info!(job_id = %input.job_id, count = improved_titles.len(), "Titles generated");

        job.set_status(JobStatus::TitlesReady);
        job.improved_titles = improved_titles.clone();
        self.store.put(&job).await?;

        self.bus.emit(Event::TitlesReady(TitlesReady {
            job_id: input.job_id.clone(),
            email: input.email.clone(),
            channel_name: input.channel_name.clone(),
            improved_titles,
        }));
        Ok(())
    }

    async fn load_or_rebuild(&self, input: &VideosFetched) -> PipelineResult<Job> {
        Ok(self
            .store
            .get(&input.job_id)
            .await?
            .unwrap_or_else(|| Job::new(input.job_id.clone(), input.email.as_str(), "")))
    }

    async fn fail_job(&self, input: &VideosFetched, error: String) {
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
