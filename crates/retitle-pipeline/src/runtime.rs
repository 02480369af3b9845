//! Stage wiring.
//!
//! Each stage runs as one task looping over its topic subscription. Handler
//! failures are absorbed inside the stage, so a bad event is dropped and
//! the loop keeps consuming.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use retitle_bus::EventBus;
use retitle_models::{Event, Topic};
use retitle_store::JobStore;
use retitle_youtube::YoutubeClient;

use crate::config::PipelineConfig;
use crate::gemini::TitleGenClient;
use crate::stages::{FetchVideosStage, GenerateTitlesStage, ResolveChannelStage};

/// Subscribe every stage to its topic and spawn its consume loop.
///
/// Subscriptions are registered before this function returns, so events
/// emitted afterwards are guaranteed a consumer.
pub fn spawn_stages(
    config: &PipelineConfig,
    store: Arc<dyn JobStore>,
    bus: EventBus,
) -> Vec<JoinHandle<()>> {
    let youtube = YoutubeClient::new(config.youtube_api_base.as_str());
    let gemini = TitleGenClient::new(config);

    let resolve = ResolveChannelStage::new(Arc::clone(&store), bus.clone(), youtube.clone());
    let fetch = FetchVideosStage::new(Arc::clone(&store), bus.clone(), youtube);
    let titles = GenerateTitlesStage::new(store, bus.clone(), gemini);

    let mut submit_rx = bus.subscribe(Topic::Submit);
    let mut resolved_rx = bus.subscribe(Topic::ChannelResolved);
    let mut fetched_rx = bus.subscribe(Topic::VideosFetched);

    info!("Pipeline stages subscribed");

    vec![
        tokio::spawn(async move {
            while let Some(event) = submit_rx.recv().await {
                if let Event::Submit(input) = event {
                    resolve.handle(input).await;
                }
            }
        }),
        tokio::spawn(async move {
            while let Some(event) = resolved_rx.recv().await {
                if let Event::ChannelResolved(input) = event {
                    fetch.handle(input).await;
                }
            }
        }),
        tokio::spawn(async move {
            while let Some(event) = fetched_rx.recv().await {
                if let Event::VideosFetched(input) = event {
                    titles.handle(input).await;
                }
            }
        }),
    ]
}
