use std::sync::Arc;

use reelcraft_ai::{
    AiConfig, GeminiClient, ImageGenerator, ImagenClient, PromptCache, SpeechSynthesizer,
    TextGenerator, TtsClient, VeoClient, VideoGenerator,
};
use reelcraft_cloud::{ObjectStore, S3Store};
use reelcraft_db::DbPool;
use reelcraft_events::{EventBus, PlatformEvent};

use crate::ads::AdPublishers;
use crate::error::PipelineResult;
use crate::limiter::GenerationLimiter;
use crate::stitch::{ClipStitcher, FfmpegStitcher};

/// Handles shared by every pipeline operation. Cheap to clone.
#[derive(Clone)]
pub struct PipelineContext {
    pub pool: DbPool,
    pub text: Arc<dyn TextGenerator>,
    pub video: Arc<dyn VideoGenerator>,
    pub images: Arc<dyn ImageGenerator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub store: Arc<dyn ObjectStore>,
    pub events: Arc<EventBus>,
    pub prompt_cache: Arc<PromptCache>,
    pub limiter: Arc<GenerationLimiter>,
    pub publishers: Arc<AdPublishers>,
    pub stitcher: Arc<dyn ClipStitcher>,
}

impl PipelineContext {
    /// Build the production context: Google AI clients, S3 storage, stub
    /// ad publishers, and ffmpeg stitching.
    ///
    /// # Panics
    ///
    /// Panics if `GEMINI_API_KEY` is not set (see [`AiConfig::from_env`]).
    pub fn from_env(
        pool: DbPool,
        events: Arc<EventBus>,
        limiter: GenerationLimiter,
    ) -> PipelineResult<Self> {
        let ai = AiConfig::from_env();
        let http = ai.http_client();
        let store = S3Store::from_env()?;

        tracing::info!(
            text_model = %ai.text_model,
            video_model = %ai.video_model,
            image_model = %ai.image_model,
            "AI clients configured"
        );

        Ok(Self {
            pool,
            text: Arc::new(GeminiClient::new(&ai, http.clone())),
            video: Arc::new(VeoClient::new(&ai, http.clone())),
            images: Arc::new(ImagenClient::new(&ai, http.clone())),
            speech: Arc::new(TtsClient::new(&ai, http)),
            store: Arc::new(store),
            events,
            prompt_cache: Arc::new(PromptCache::default()),
            limiter: Arc::new(limiter),
            publishers: Arc::new(AdPublishers::stubs()),
            stitcher: Arc::new(FfmpegStitcher),
        })
    }

    pub(crate) fn publish(&self, event: PlatformEvent) {
        self.events.publish(event);
    }
}
