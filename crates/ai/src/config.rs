/// Vendor endpoints, credentials, and model names.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub gemini_api_key: String,
    /// Generative Language API root, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub gemini_base_url: String,
    /// Cloud Text-to-Speech root, e.g. `https://texttospeech.googleapis.com`.
    pub tts_base_url: String,
    pub text_model: String,
    pub video_model: String,
    pub image_model: String,
    pub tts_language_code: String,
    pub tts_default_voice: String,
    pub request_timeout_secs: u64,
}

impl AiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                              |
    /// |--------------------------|------------------------------------------------------|
    /// | `GEMINI_API_KEY`         | (required)                                           |
    /// | `GEMINI_BASE_URL`        | `https://generativelanguage.googleapis.com/v1beta`   |
    /// | `TTS_BASE_URL`           | `https://texttospeech.googleapis.com`                |
    /// | `GEMINI_TEXT_MODEL`      | `gemini-2.5-flash`                                   |
    /// | `VEO_MODEL`              | `veo-3.0-generate-001`                               |
    /// | `IMAGEN_MODEL`           | `imagen-4.0-generate-001`                            |
    /// | `TTS_LANGUAGE_CODE`      | `en-US`                                              |
    /// | `TTS_DEFAULT_VOICE`      | `en-US-Neural2-F`                                    |
    /// | `AI_REQUEST_TIMEOUT_SECS`| `120`                                                |
    pub fn from_env() -> Self {
        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };

        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set"),
            gemini_base_url: var(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            )
            .trim_end_matches('/')
            .to_string(),
            tts_base_url: var("TTS_BASE_URL", "https://texttospeech.googleapis.com")
                .trim_end_matches('/')
                .to_string(),
            text_model: var("GEMINI_TEXT_MODEL", "gemini-2.5-flash"),
            video_model: var("VEO_MODEL", "veo-3.0-generate-001"),
            image_model: var("IMAGEN_MODEL", "imagen-4.0-generate-001"),
            tts_language_code: var("TTS_LANGUAGE_CODE", "en-US"),
            tts_default_voice: var("TTS_DEFAULT_VOICE", "en-US-Neural2-F"),
            request_timeout_secs: var("AI_REQUEST_TIMEOUT_SECS", "120")
                .parse()
                .expect("AI_REQUEST_TIMEOUT_SECS must be a valid u64"),
        }
    }

    /// Shared HTTP client with the configured timeout.
    pub fn http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.request_timeout_secs))
            .build()
            .unwrap_or_default()
    }
}
