//! Cloud Text-to-Speech client producing MP3 narration.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::error::AiError;
use crate::http::{parse_response, API_KEY_HEADER};
use crate::provider::{SpeechRequest, SpeechSynthesizer};

const SERVICE: &str = "tts";

pub struct TtsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language_code: String,
    default_voice: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: Input<'a>,
    voice: Voice<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct Input<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Voice<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

impl TtsClient {
    pub fn new(config: &AiConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: config.tts_base_url.clone(),
            api_key: config.gemini_api_key.clone(),
            language_code: config.tts_language_code.clone(),
            default_voice: config.tts_default_voice.clone(),
        }
    }

    pub fn with_base_url(base_url: String, api_key: String, default_voice: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            language_code: "en-US".to_string(),
            default_voice,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for TtsClient {
    fn provider(&self) -> &str {
        SERVICE
    }

    fn model(&self) -> &str {
        &self.default_voice
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, AiError> {
        if request.text.trim().is_empty() {
            return Err(AiError::invalid(SERVICE, "refusing to synthesize empty text"));
        }
        let voice = request
            .voice_name
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(&self.default_voice);
        let body = SynthesizeRequest {
            input: Input {
                text: &request.text,
            },
            voice: Voice {
                language_code: &self.language_code,
                name: voice,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/text:synthesize", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        let parsed: SynthesizeResponse = parse_response(SERVICE, response).await?;
        let encoded = parsed
            .audio_content
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AiError::invalid(SERVICE, "no audioContent in response"))?;
        Ok(base64::engine::general_purpose::STANDARD.decode(encoded)?)
    }
}
