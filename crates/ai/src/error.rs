/// Errors from the AI vendor clients.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The vendor returned a non-2xx status code.
    #[error("{service} API error ({status}): {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// A 2xx response that did not contain what we asked for.
    #[error("Unexpected {service} response: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },

    #[error("Failed to decode base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl AiError {
    pub(crate) fn invalid(service: &'static str, message: impl Into<String>) -> Self {
        AiError::InvalidResponse {
            service,
            message: message.into(),
        }
    }

    /// Whether retrying the same call later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AiError::Request(_) => true,
            AiError::Api { status, .. } => *status == 429 || *status >= 500,
            AiError::InvalidResponse { .. } | AiError::Decode(_) => false,
        }
    }
}
