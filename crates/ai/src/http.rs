//! Response helpers shared by the vendor clients.

use crate::error::AiError;

/// Header carrying the Generative Language API key.
pub(crate) const API_KEY_HEADER: &str = "x-goog-api-key";

/// Return the response unchanged on 2xx, or an [`AiError::Api`] with the
/// status and body text otherwise.
pub(crate) async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(AiError::Api {
            service,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T, AiError> {
    let response = ensure_success(service, response).await?;
    Ok(response.json::<T>().await?)
}
