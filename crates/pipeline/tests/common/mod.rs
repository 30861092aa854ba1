//! Fake vendor clients and seed helpers for pipeline tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reelcraft_ai::{
    AiError, GeneratedImage, ImageGenerator, ImageRequest, OperationStatus, PromptCache,
    SpeechRequest, SpeechSynthesizer, TextGenerator, VideoGenerator, VideoRequest,
};
use reelcraft_cloud::MemoryStore;
use reelcraft_core::ffmpeg::{FfmpegError, WatermarkSpec};
use reelcraft_core::types::DbId;
use reelcraft_core::workflow::ProjectStatus;
use reelcraft_db::models::project::{CreateProject, Project};
use reelcraft_db::models::scene::{CreateScene, Scene, UpdateScene};
use reelcraft_db::models::user::{CreateUser, User};
use reelcraft_db::repositories::{ProjectRepo, SceneRepo, UserRepo};
use reelcraft_events::EventBus;
use reelcraft_pipeline::ads::AdPublishers;
use reelcraft_pipeline::stitch::ClipStitcher;
use reelcraft_pipeline::{GenerationLimiter, PipelineContext};
use sqlx::PgPool;

fn vendor_error(service: &'static str) -> AiError {
    AiError::Api {
        service,
        status: 500,
        body: "upstream exploded".to_string(),
    }
}

/// Replies with queued canned texts, counting calls.
#[derive(Default)]
pub struct FakeText {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<usize>,
}

impl FakeText {
    pub fn reply(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(text.into());
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl TextGenerator for FakeText {
    fn model(&self) -> &str {
        "fake-llm"
    }

    async fn generate_json(&self, _prompt: &str) -> Result<String, AiError> {
        *self.calls.lock().unwrap() += 1;
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| vendor_error("fake-llm"))
    }
}

/// Video fake: submissions succeed unless the prompt contains "FAIL";
/// polls return scripted statuses, `Running` once the script is empty.
#[derive(Default)]
pub struct FakeVideo {
    submitted: Mutex<Vec<VideoRequest>>,
    polls: Mutex<VecDeque<Result<OperationStatus, ()>>>,
}

impl FakeVideo {
    pub fn script_poll(&self, status: OperationStatus) {
        self.polls.lock().unwrap().push_back(Ok(status));
    }

    pub fn script_poll_error(&self) {
        self.polls.lock().unwrap().push_back(Err(()));
    }

    pub fn submitted(&self) -> Vec<VideoRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoGenerator for FakeVideo {
    fn provider(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-video"
    }

    async fn submit(&self, request: &VideoRequest) -> Result<String, AiError> {
        if request.prompt.contains("FAIL") {
            return Err(vendor_error("fake-video"));
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(request.clone());
        Ok(format!("operations/op-{}", submitted.len()))
    }

    async fn poll(&self, _operation_name: &str) -> Result<OperationStatus, AiError> {
        match self.polls.lock().unwrap().pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(())) => Err(vendor_error("fake-video")),
            None => Ok(OperationStatus::Running),
        }
    }

    async fn download(&self, _video_uri: &str) -> Result<Vec<u8>, AiError> {
        Ok(b"fake-mp4-bytes".to_vec())
    }
}

#[derive(Default)]
pub struct FakeImages {
    pub fail: bool,
}

#[async_trait]
impl ImageGenerator for FakeImages {
    fn provider(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-image"
    }

    async fn generate(&self, _request: &ImageRequest) -> Result<GeneratedImage, AiError> {
        if self.fail {
            return Err(vendor_error("fake-image"));
        }
        Ok(GeneratedImage {
            bytes: b"fake-png".to_vec(),
            mime_type: "image/png".to_string(),
        })
    }
}

#[derive(Default)]
pub struct FakeSpeech;

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    fn provider(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-voice"
    }

    async fn synthesize(&self, _request: &SpeechRequest) -> Result<Vec<u8>, AiError> {
        Ok(b"fake-mp3".to_vec())
    }
}

/// Writes the clips back to back into the output file.
#[derive(Default)]
pub struct FakeStitcher;

#[async_trait]
impl ClipStitcher for FakeStitcher {
    async fn stitch(
        &self,
        _work_dir: &Path,
        clips: &[PathBuf],
        output: &Path,
        _watermark: Option<&WatermarkSpec>,
    ) -> Result<(), FfmpegError> {
        if clips.is_empty() {
            return Err(FfmpegError::NoInputs);
        }
        let mut joined = Vec::new();
        for clip in clips {
            joined.extend(tokio::fs::read(clip).await?);
        }
        tokio::fs::write(output, joined).await?;
        Ok(())
    }
}

/// Context plus handles to the fakes behind it.
pub struct Harness {
    pub ctx: PipelineContext,
    pub text: Arc<FakeText>,
    pub video: Arc<FakeVideo>,
    pub store: Arc<MemoryStore>,
    pub events: Arc<EventBus>,
}

pub fn harness(pool: PgPool) -> Harness {
    harness_with_images(pool, FakeImages::default())
}

pub fn harness_with_images(pool: PgPool, images: FakeImages) -> Harness {
    let text = Arc::new(FakeText::default());
    let video = Arc::new(FakeVideo::default());
    let store = Arc::new(MemoryStore::default());
    let events = Arc::new(EventBus::default());
    let ctx = PipelineContext {
        pool,
        text: text.clone(),
        video: video.clone(),
        images: Arc::new(images),
        speech: Arc::new(FakeSpeech),
        store: store.clone(),
        events: events.clone(),
        prompt_cache: Arc::new(PromptCache::default()),
        limiter: Arc::new(GenerationLimiter::per_minute(1_000)),
        publishers: Arc::new(AdPublishers::stubs()),
        stitcher: Arc::new(FakeStitcher),
    };
    Harness {
        ctx,
        text,
        video,
        store,
        events,
    }
}

pub async fn seed_user(pool: &PgPool, email: &str, budget_cents: Option<i32>) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: None,
            role: None,
            daily_budget_cents: budget_cents,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_project(pool: &PgPool, user_id: DbId, status: ProjectStatus) -> Project {
    let project = ProjectRepo::create(
        pool,
        user_id,
        &CreateProject {
            name: "Trail shoe launch".to_string(),
            description: None,
            brief: Some(serde_json::json!({
                "product": "Trail running shoe",
                "audience": "Weekend runners",
            })),
            brand_kit_id: None,
            campaign_id: None,
            aspect_ratio: None,
        },
    )
    .await
    .unwrap();
    if status == ProjectStatus::Draft {
        return project;
    }
    ProjectRepo::set_status(pool, project.id, &[ProjectStatus::Draft], status)
        .await
        .unwrap()
        .unwrap()
}

pub async fn seed_approved_scene(pool: &PgPool, project_id: DbId, description: &str) -> Scene {
    let scene = SceneRepo::create(
        pool,
        project_id,
        &CreateScene {
            description: description.to_string(),
            sort_order: None,
            duration_secs: Some(8),
            audio_config: None,
        },
    )
    .await
    .unwrap();
    SceneRepo::update(
        pool,
        scene.id,
        &UpdateScene {
            is_approved: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap()
}
