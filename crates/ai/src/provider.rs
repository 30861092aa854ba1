//! Capability traits for the AI services.

use async_trait::async_trait;

use crate::error::AiError;

/// LLM text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn model(&self) -> &str;

    /// Run `prompt` and return the model's raw text, asking for JSON output.
    async fn generate_json(&self, prompt: &str) -> Result<String, AiError>;
}

/// Parameters for one text-to-video job.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub duration_secs: i32,
    pub aspect_ratio: String,
    pub generate_audio: bool,
}

/// State of a remote long-running video operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    Running,
    /// Finished with a downloadable video.
    Succeeded { video_uri: String },
    /// Finished with an error reported by the vendor.
    Failed { message: String },
}

/// Long-running text-to-video generation.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    fn provider(&self) -> &str;
    fn model(&self) -> &str;

    /// Start a job and return its operation name.
    async fn submit(&self, request: &VideoRequest) -> Result<String, AiError>;

    /// Query an operation by name.
    async fn poll(&self, operation_name: &str) -> Result<OperationStatus, AiError>;

    /// Fetch the bytes of a finished video.
    async fn download(&self, video_uri: &str) -> Result<Vec<u8>, AiError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub aspect_ratio: String,
}

#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Synchronous text-to-image generation.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    fn provider(&self) -> &str;
    fn model(&self) -> &str;

    async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage, AiError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    /// Vendor voice name; the client default is used when `None`.
    pub voice_name: Option<String>,
}

/// Text-to-speech producing MP3 audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn provider(&self) -> &str;
    /// Default voice used when a request does not name one.
    fn model(&self) -> &str;

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, AiError>;
}
