//! Veo text-to-video client built on long-running operations.
//!
//! `predictLongRunning` returns an operation name; the operation is then
//! polled with `GET {base}/{name}` until `done`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::error::AiError;
use crate::http::{ensure_success, parse_response, API_KEY_HEADER};
use crate::provider::{OperationStatus, VideoGenerator, VideoRequest};

const SERVICE: &str = "veo";

pub struct VeoClient {
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
    aspect_ratio: &'a str,
    duration_seconds: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<&'a str>,
    generate_audio: bool,
    sample_count: u8,
}

#[derive(Debug, Deserialize)]
struct OperationHandle {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Operation {
    #[serde(default)]
    done: bool,
    error: Option<OperationError>,
    response: Option<OperationResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
    /// Set when every sample was blocked by safety filters.
    #[serde(default)]
    rai_media_filtered_reasons: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    uri: Option<String>,
}

impl VeoClient {
    pub fn new(config: &AiConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: config.gemini_base_url.clone(),
            api_key: config.gemini_api_key.clone(),
            model: config.video_model.clone(),
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

/// Map a finished or pending operation document to a status.
fn interpret(operation: Operation) -> OperationStatus {
    if let Some(err) = operation.error {
        let message = if err.message.is_empty() {
            "video generation failed".to_string()
        } else {
            err.message
        };
        return OperationStatus::Failed { message };
    }
    if !operation.done {
        return OperationStatus::Running;
    }

    let response = operation.response.and_then(|r| r.generate_video_response);
    let uri = response.as_ref().and_then(|r| {
        r.generated_samples
            .iter()
            .find_map(|s| s.video.as_ref().and_then(|v| v.uri.clone()))
    });
    match uri {
        Some(video_uri) => OperationStatus::Succeeded { video_uri },
        None => {
            let reason = response
                .map(|r| r.rai_media_filtered_reasons.join("; "))
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "operation finished without a video".to_string());
            OperationStatus::Failed { message: reason }
        }
    }
}

#[async_trait]
impl VideoGenerator for VeoClient {
    fn provider(&self) -> &str {
        SERVICE
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn submit(&self, request: &VideoRequest) -> Result<String, AiError> {
        let body = PredictRequest {
            instances: [Instance {
                prompt: &request.prompt,
            }],
            parameters: Parameters {
                aspect_ratio: &request.aspect_ratio,
                duration_seconds: request.duration_secs,
                negative_prompt: request
                    .negative_prompt
                    .as_deref()
                    .filter(|n| !n.trim().is_empty()),
                generate_audio: request.generate_audio,
                sample_count: 1,
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/models/{}:predictLongRunning",
                self.base_url, self.model
            ))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        let handle: OperationHandle = parse_response(SERVICE, response).await?;
        if handle.name.is_empty() {
            return Err(AiError::invalid(SERVICE, "empty operation name"));
        }
        tracing::info!(operation = %handle.name, model = %self.model, "Video job submitted");
        Ok(handle.name)
    }

    async fn poll(&self, operation_name: &str) -> Result<OperationStatus, AiError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, operation_name))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let operation: Operation = parse_response(SERVICE, response).await?;
        Ok(interpret(operation))
    }

    async fn download(&self, video_uri: &str) -> Result<Vec<u8>, AiError> {
        let response = self
            .client
            .get(video_uri)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let response = ensure_success(SERVICE, response).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(AiError::invalid(SERVICE, "downloaded video is empty"));
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(json: serde_json::Value) -> OperationStatus {
        interpret(serde_json::from_value(json).unwrap())
    }

    #[test]
    fn not_done_is_running() {
        assert_eq!(op(serde_json::json!({"name": "x"})), OperationStatus::Running);
    }

    #[test]
    fn done_with_sample_succeeds() {
        let status = op(serde_json::json!({
            "done": true,
            "response": {"generateVideoResponse": {"generatedSamples": [
                {"video": {"uri": "https://files/v1"}}
            ]}}
        }));
        assert_eq!(
            status,
            OperationStatus::Succeeded {
                video_uri: "https://files/v1".into()
            }
        );
    }

    #[test]
    fn error_fails_even_if_not_done() {
        let status = op(serde_json::json!({"error": {"code": 3, "message": "bad prompt"}}));
        assert_eq!(
            status,
            OperationStatus::Failed {
                message: "bad prompt".into()
            }
        );
    }

    #[test]
    fn filtered_output_fails_with_reason() {
        let status = op(serde_json::json!({
            "done": true,
            "response": {"generateVideoResponse": {
                "generatedSamples": [],
                "raiMediaFilteredReasons": ["celebrity likeness"]
            }}
        }));
        assert_eq!(
            status,
            OperationStatus::Failed {
                message: "celebrity likeness".into()
            }
        );
    }
}
