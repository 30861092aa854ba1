use crate::error::{StorageError, StorageResult};

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// S3 API endpoint. `None` uses the AWS default for the region.
    pub endpoint_url: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub region: String,
    /// Base of public object URLs, e.g. a CDN domain. Defaults to
    /// `{endpoint}/{bucket}`.
    pub public_base_url: String,
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default                      |
    /// |------------------------|------------------------------|
    /// | `S3_ENDPOINT_URL`      | (unset: AWS)                 |
    /// | `S3_ACCESS_KEY_ID`     | (required)                   |
    /// | `S3_SECRET_ACCESS_KEY` | (required)                   |
    /// | `S3_BUCKET`            | (required)                   |
    /// | `S3_REGION`            | `auto`                       |
    /// | `S3_PUBLIC_BASE_URL`   | `{endpoint}/{bucket}`        |
    pub fn from_env() -> StorageResult<Self> {
        let required = |name: &str| {
            std::env::var(name).map_err(|_| StorageError::Config(format!("{name} not set")))
        };

        let endpoint_url = std::env::var("S3_ENDPOINT_URL")
            .ok()
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());
        let bucket = required("S3_BUCKET")?;
        let region = std::env::var("S3_REGION").unwrap_or_else(|_| "auto".to_string());

        let public_base_url = match std::env::var("S3_PUBLIC_BASE_URL") {
            Ok(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => match &endpoint_url {
                Some(endpoint) => format!("{endpoint}/{bucket}"),
                None => format!("https://{bucket}.s3.{region}.amazonaws.com"),
            },
        };

        Ok(Self {
            endpoint_url,
            access_key_id: required("S3_ACCESS_KEY_ID")?,
            secret_access_key: required("S3_SECRET_ACCESS_KEY")?,
            bucket,
            region,
            public_base_url,
        })
    }
}
