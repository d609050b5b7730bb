//! Secondary image renderer: the remote "Colours of Wine" image service
//!
//! The service takes the raw description text and answers with a base64
//! encoded image. It needs an opaque token passed as the `cookie` query
//! parameter.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use cow_common::config::RemoteImageConfig;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Renderer name stored alongside remote images
pub const REMOTE_RENDERER: &str = "remote";

const GENERATE_PATH: &str = "/expertGenerateImage";

/// Remote image errors
#[derive(Debug, Error)]
pub enum RemoteImageError {
    #[error("Remote image request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Remote image service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Remote image response is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Remote image service returned an empty image")]
    Empty,
}

/// HTTP client for the remote image service
#[derive(Debug, Clone)]
pub struct RemoteImageClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl RemoteImageClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteImageError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Build from the `[remote_image]` section and an already resolved token
    pub fn from_config(
        config: &RemoteImageConfig,
        token: impl Into<String>,
    ) -> Result<Self, RemoteImageError> {
        Self::new(
            config.base_url.clone(),
            token,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request an image for `description`, returning the decoded bytes
    pub async fn generate(&self, description: &str) -> Result<Vec<u8>, RemoteImageError> {
        let url = format!("{}{}", self.base_url, GENERATE_PATH);
        debug!(url = %url, "Requesting remote image");

        let response = self
            .client
            .post(&url)
            .query(&[("cookie", self.token.as_str())])
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(description.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteImageError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let text = response.text().await?;
        // services wrap long base64 bodies across lines
        let encoded: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if encoded.is_empty() {
            return Err(RemoteImageError::Empty);
        }

        let image = STANDARD.decode(encoded)?;
        if image.is_empty() {
            return Err(RemoteImageError::Empty);
        }

        debug!(bytes = image.len(), "Received remote image");
        Ok(image)
    }
}
