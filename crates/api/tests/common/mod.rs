//! Shared harness for HTTP-level tests: fake vendor clients, an in-memory
//! object store, a seeded user with a signed token, and request helpers that
//! drive the router through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use reelcraft_ai::{
    AiError, GeneratedImage, ImageGenerator, ImageRequest, OperationStatus, PromptCache,
    SpeechRequest, SpeechSynthesizer, TextGenerator, VideoGenerator, VideoRequest,
};
use reelcraft_api::auth::jwt::{generate_access_token, JwtConfig};
use reelcraft_api::config::ServerConfig;
use reelcraft_api::router::build_app_router;
use reelcraft_api::state::AppState;
use reelcraft_cloud::MemoryStore;
use reelcraft_db::models::user::{CreateUser, User};
use reelcraft_db::repositories::UserRepo;
use reelcraft_events::EventBus;
use reelcraft_pipeline::ads::AdPublishers;
use reelcraft_pipeline::stitch::FfmpegStitcher;
use reelcraft_pipeline::{GenerationLimiter, PipelineContext};
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Fake vendor clients
// ---------------------------------------------------------------------------

fn vendor_error(service: &'static str) -> AiError {
    AiError::Api {
        service,
        status: 500,
        body: "upstream exploded".to_string(),
    }
}

/// Replies with queued canned texts; errors once the queue is empty.
#[derive(Default)]
pub struct FakeText {
    replies: Mutex<VecDeque<String>>,
}

impl FakeText {
    pub fn reply(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(text.into());
    }
}

#[async_trait]
impl TextGenerator for FakeText {
    fn model(&self) -> &str {
        "fake-llm"
    }

    async fn generate_json(&self, _prompt: &str) -> Result<String, AiError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| vendor_error("fake-llm"))
    }
}

/// Submissions always succeed; polls replay a script, then `Running`.
#[derive(Default)]
pub struct FakeVideo {
    submitted: Mutex<usize>,
    polls: Mutex<VecDeque<OperationStatus>>,
}

impl FakeVideo {
    pub fn script_poll(&self, status: OperationStatus) {
        self.polls.lock().unwrap().push_back(status);
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

    async fn submit(&self, _request: &VideoRequest) -> Result<String, AiError> {
        let mut submitted = self.submitted.lock().unwrap();
        *submitted += 1;
        Ok(format!("operations/op-{submitted}"))
    }

    async fn poll(&self, _operation_name: &str) -> Result<OperationStatus, AiError> {
        Ok(self
            .polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(OperationStatus::Running))
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

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        generation_rate_limit_per_minute: 1_000,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// A router backed by fakes, plus handles for scripting and inspection.
pub struct TestApp {
    pub state: AppState,
    pub text: Arc<FakeText>,
    pub video: Arc<FakeVideo>,
    pub store: Arc<MemoryStore>,
    pub events: Arc<EventBus>,
    pub user: User,
    pub token: String,
}

impl TestApp {
    /// A fresh router over the same state. Routers are consumed by
    /// `oneshot`, so each request builds one.
    pub fn router(&self) -> Router {
        build_app_router(self.state.clone(), &self.state.config)
    }

    pub fn pool(&self) -> &PgPool {
        &self.state.pool
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        send(self.router(), "GET", uri, Some(&self.token), None).await
    }

    pub async fn post(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        send(self.router(), "POST", uri, Some(&self.token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        send(self.router(), "PUT", uri, Some(&self.token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        send(self.router(), "DELETE", uri, Some(&self.token), None).await
    }

    /// Token for another user, for ownership checks.
    pub async fn token_for_new_user(&self, email: &str) -> String {
        let user = seed_user(self.pool(), email, "member").await;
        token_for(&user)
    }
}

pub async fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with_images(pool, FakeImages::default()).await
}

pub async fn build_test_app_with_images(pool: PgPool, images: FakeImages) -> TestApp {
    let config = test_config();
    let text = Arc::new(FakeText::default());
    let video = Arc::new(FakeVideo::default());
    let store = Arc::new(MemoryStore::default());
    let events = Arc::new(EventBus::default());

    let pipeline = PipelineContext {
        pool: pool.clone(),
        text: text.clone(),
        video: video.clone(),
        images: Arc::new(images),
        speech: Arc::new(FakeSpeech),
        store: store.clone(),
        events: events.clone(),
        prompt_cache: Arc::new(PromptCache::default()),
        limiter: Arc::new(GenerationLimiter::per_minute(
            config.generation_rate_limit_per_minute,
        )),
        publishers: Arc::new(AdPublishers::stubs()),
        stitcher: Arc::new(FfmpegStitcher),
    };

    let user = seed_user(&pool, "owner@example.com", "member").await;
    let token = token_for(&user);

    TestApp {
        state: AppState {
            pool,
            config: Arc::new(config),
            pipeline,
        },
        text,
        video,
        store,
        events,
        user,
        token,
    }
}

pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: Some("Test User".to_string()),
            role: Some(role.to_string()),
            daily_budget_cents: None,
        },
    )
    .await
    .unwrap()
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a request with an optional Bearer token and JSON body.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Send a pre-built request.
pub async fn send_request(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `data` field of a `{ "data": ... }` envelope.
pub async fn body_data(response: Response<Body>) -> serde_json::Value {
    body_json(response).await["data"].clone()
}
