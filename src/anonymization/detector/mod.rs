//! Span detection module
//!
//! Provides the trait-based interface to the detection capability and the
//! bundled implementations:
//! - [`regex::PatternDetector`]: regex pattern library, runs in-process
//! - [`http::HttpDetector`]: remote span-detection service
//!
//! A detector is a black box: given a text slice, the requested category
//! labels and a confidence threshold, it returns candidate spans in its own
//! order. The engine calls it once per slice and never reorders its output.

pub mod http;
pub mod patterns;
pub mod regex;

use crate::domain::DetectorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Confidence threshold passed to every detection call
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// A candidate PII span returned by a detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedSpan {
    /// Matched text, exactly as it appears in the slice
    #[serde(alias = "spanText")]
    pub text: String,

    /// Category label the span was classified as
    pub label: String,

    /// Confidence score (0.0 - 1.0)
    #[serde(default)]
    pub score: f32,
}

impl DetectedSpan {
    /// Create a new detected span
    pub fn new(text: impl Into<String>, label: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            score,
        }
    }
}

/// Trait for span-detection implementations
#[async_trait]
pub trait SpanDetector: Send + Sync {
    /// Short identifier used in logs (e.g. "patterns", "http")
    fn name(&self) -> &str;

    /// Detect PII spans of the requested labels in one text slice
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails; the engine aborts the whole
    /// document on the first error.
    async fn detect(
        &self,
        slice: &str,
        labels: &[String],
        threshold: f32,
    ) -> Result<Vec<DetectedSpan>, DetectorError>;
}

/// Progress reporter handed to a [`DetectorLoader`] during initialization
///
/// Progress is a percentage in `0..=100`; observers subscribe through the
/// engine.
#[derive(Debug, Clone)]
pub struct InitProgress {
    sender: Arc<watch::Sender<u8>>,
}

impl InitProgress {
    pub(crate) fn new(sender: Arc<watch::Sender<u8>>) -> Self {
        Self { sender }
    }

    /// Report progress, clamped to 100
    pub fn report(&self, percent: u8) {
        self.sender.send_replace(percent.min(100));
    }
}

/// Builds a ready-to-use detector
///
/// Loading may be slow (model download, service warm-up); the engine runs it
/// at most once at a time.
#[async_trait]
pub trait DetectorLoader: Send + Sync {
    /// Load the detector, reporting progress along the way
    async fn load(&self, progress: InitProgress) -> Result<Arc<dyn SpanDetector>, DetectorError>;
}

/// Loader that hands out an already constructed detector
pub struct ReadyLoader {
    detector: Arc<dyn SpanDetector>,
}

impl ReadyLoader {
    /// Wrap an existing detector
    pub fn new(detector: Arc<dyn SpanDetector>) -> Self {
        Self { detector }
    }
}

#[async_trait]
impl DetectorLoader for ReadyLoader {
    async fn load(&self, progress: InitProgress) -> Result<Arc<dyn SpanDetector>, DetectorError> {
        progress.report(100);
        Ok(self.detector.clone())
    }
}
