//! Imagen text-to-image client (`:predict`).

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::error::AiError;
use crate::http::{parse_response, API_KEY_HEADER};
use crate::provider::{GeneratedImage, ImageGenerator, ImageRequest};

const SERVICE: &str = "imagen";

pub struct ImagenClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: [Instance<'a>; 1],
    parameters: Parameters<'a>,
}

#[derive(Debug, Serialize)]
struct Instance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters<'a> {
    sample_count: u8,
    aspect_ratio: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

impl ImagenClient {
    pub fn new(config: &AiConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: config.gemini_base_url.clone(),
            api_key: config.gemini_api_key.clone(),
            model: config.image_model.clone(),
        }
    }

    pub fn with_base_url(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl ImageGenerator for ImagenClient {
    fn provider(&self) -> &str {
        SERVICE
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage, AiError> {
        let body = PredictRequest {
            instances: [Instance {
                prompt: &request.prompt,
            }],
            parameters: Parameters {
                sample_count: 1,
                aspect_ratio: &request.aspect_ratio,
                negative_prompt: request.negative_prompt.as_deref(),
            },
        };

        let response = self
            .client
            .post(format!("{}/models/{}:predict", self.base_url, self.model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        let parsed: PredictResponse = parse_response(SERVICE, response).await?;

        let prediction = parsed
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| AiError::invalid(SERVICE, "no predictions returned"))?;
        let encoded = prediction
            .bytes_base64_encoded
            .ok_or_else(|| AiError::invalid(SERVICE, "prediction has no image bytes"))?;
        let bytes = base64::engine::general_purpose::STANDARD.decode(encoded)?;

        Ok(GeneratedImage {
            bytes,
            mime_type: prediction
                .mime_type
                .unwrap_or_else(|| "image/png".to_string()),
        })
    }
}
