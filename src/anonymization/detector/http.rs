//! Remote span-detection service client
//!
//! Talks to a detection service over JSON:
//!
//! - `POST {base_url}/v1/detect` with `{"text", "labels", "threshold"}`,
//!   answered by `{"entities": [{"text", "label", "score"}]}`
//! - `GET {base_url}/health` for readiness during initialization
//!
//! The client never retries; retry policy belongs to the caller.

use super::{DetectedSpan, DetectorLoader, InitProgress, SpanDetector};
use crate::anonymization::config::HttpDetectorConfig;
use crate::config::SecretString;
use crate::domain::DetectorError;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Request body for the detect endpoint
#[derive(Debug, Serialize)]
struct DetectRequest<'a> {
    text: &'a str,
    labels: &'a [String],
    threshold: f32,
}

/// Response body of the detect endpoint
#[derive(Debug, Deserialize)]
struct DetectResponse {
    entities: Vec<DetectedSpan>,
}

/// HTTP span detector
pub struct HttpDetector {
    /// Base URL of the detection service, without trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// Bearer token, if the service requires one
    api_key: Option<SecretString>,
}

impl HttpDetector {
    /// Create a new HTTP detector from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &HttpDetectorConfig) -> Result<Self, DetectorError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| DetectorError::Other(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            api_key: config.api_key.clone(),
        })
    }

    /// Base URL of the detection service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.api_key {
            Some(ref key) => request.bearer_auth(key.expose_secret()),
            None => request,
        }
    }

    /// Check that the service is reachable and healthy
    pub async fn health_check(&self) -> Result<(), DetectorError> {
        let url = format!("{}/health", self.base_url);
        let resp = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(map_send_error)?;

        check_status(resp).await.map(|_| ())
    }
}

fn map_send_error(e: reqwest::Error) -> DetectorError {
    if e.is_timeout() {
        DetectorError::Timeout(e.to_string())
    } else {
        DetectorError::ConnectionFailed(e.to_string())
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, DetectorError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = resp.text().await.unwrap_or_default();
    if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
        Err(DetectorError::Timeout(format!("status {status}")))
    } else if status.is_server_error() {
        Err(DetectorError::ServerError {
            status: status.as_u16(),
            message,
        })
    } else {
        Err(DetectorError::ClientError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SpanDetector for HttpDetector {
    fn name(&self) -> &str {
        "http"
    }

    async fn detect(
        &self,
        slice: &str,
        labels: &[String],
        threshold: f32,
    ) -> Result<Vec<DetectedSpan>, DetectorError> {
        let url = format!("{}/v1/detect", self.base_url);

        tracing::debug!(
            slice_chars = slice.chars().count(),
            labels = labels.len(),
            "Calling detection service"
        );

        let resp = self
            .authorize(self.client.post(&url))
            .json(&DetectRequest {
                text: slice,
                labels,
                threshold,
            })
            .send()
            .await
            .map_err(map_send_error)?;

        let body: DetectResponse = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| DetectorError::InvalidResponse(e.to_string()))?;

        Ok(body.entities)
    }
}

/// Builds an [`HttpDetector`] and waits for the service to report healthy
pub struct HttpDetectorLoader {
    config: HttpDetectorConfig,
}

impl HttpDetectorLoader {
    /// Create a loader from configuration
    pub fn new(config: HttpDetectorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DetectorLoader for HttpDetectorLoader {
    async fn load(&self, progress: InitProgress) -> Result<Arc<dyn SpanDetector>, DetectorError> {
        progress.report(10);
        let detector = HttpDetector::new(&self.config)?;

        progress.report(50);
        if self.config.health_check {
            match detector.health_check().await {
                Ok(()) => {
                    tracing::info!(base_url = detector.base_url(), "Detection service health check passed");
                }
                Err(e) => {
                    tracing::error!(
                        base_url = detector.base_url(),
                        error = %e,
                        "Detection service health check failed"
                    );
                    return Err(e);
                }
            }
        }

        progress.report(100);
        Ok(Arc::new(detector))
    }
}
