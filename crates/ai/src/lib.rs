//! Clients for the generative AI services Reelcraft wraps.
//!
//! Each capability sits behind an `async_trait` trait in [`provider`] so the
//! API and pipeline hold `Arc<dyn ...>` handles and tests substitute fakes.
//! The concrete clients talk to Google's Generative Language API (Gemini,
//! Veo, Imagen) and Cloud Text-to-Speech.

pub mod cache;
pub mod config;
pub mod error;
pub mod gemini;
mod http;
pub mod imagen;
pub mod provider;
pub mod tts;
pub mod veo;

pub use cache::PromptCache;
pub use config::AiConfig;
pub use error::AiError;
pub use gemini::GeminiClient;
pub use imagen::ImagenClient;
pub use provider::{
    GeneratedImage, ImageGenerator, ImageRequest, OperationStatus, SpeechRequest,
    SpeechSynthesizer, TextGenerator, VideoGenerator, VideoRequest,
};
pub use tts::TtsClient;
pub use veo::VeoClient;
