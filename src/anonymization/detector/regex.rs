//! Regex-based span detector

use super::{
    patterns::{PatternRegistry, SPAN_GROUP},
    DetectedSpan, DetectorLoader, InitProgress, SpanDetector,
};
use crate::domain::DetectorError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Regex-based span detector
///
/// Serves the requested labels from a [`PatternRegistry`]. Output is ordered
/// by position in the slice, ties broken by registry order.
pub struct PatternDetector {
    pattern_registry: Arc<PatternRegistry>,
}

impl PatternDetector {
    /// Create a new pattern detector with the built-in patterns
    pub fn new() -> Result<Self, DetectorError> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a new pattern detector with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
        }
    }

    /// Detect spans in a string, synchronously
    pub fn detect_in_str(&self, text: &str, labels: &[String], threshold: f32) -> Vec<DetectedSpan> {
        let mut found: Vec<(usize, usize, DetectedSpan)> = Vec::new();

        for (order, pattern) in self.pattern_registry.all_patterns().iter().enumerate() {
            if pattern.confidence < threshold || !pattern.serves(labels) {
                continue;
            }

            let label = pattern.reported_label(labels);
            for capture in pattern.regex.captures_iter(text) {
                let matched = capture.name(SPAN_GROUP).or_else(|| capture.get(0));
                if let Some(matched) = matched {
                    if matched.as_str().trim().is_empty() {
                        continue;
                    }
                    found.push((
                        matched.start(),
                        order,
                        DetectedSpan::new(matched.as_str(), label, pattern.confidence),
                    ));
                }
            }
        }

        found.sort_by_key(|(start, order, _)| (*start, *order));
        found.into_iter().map(|(_, _, span)| span).collect()
    }
}

#[async_trait]
impl SpanDetector for PatternDetector {
    fn name(&self) -> &str {
        "patterns"
    }

    async fn detect(
        &self,
        slice: &str,
        labels: &[String],
        threshold: f32,
    ) -> Result<Vec<DetectedSpan>, DetectorError> {
        Ok(self.detect_in_str(slice, labels, threshold))
    }
}

/// Loads a [`PatternDetector`] from the built-in or a custom pattern library
pub struct PatternDetectorLoader {
    pattern_library: Option<PathBuf>,
}

impl PatternDetectorLoader {
    /// Create a loader; `None` selects the built-in patterns
    pub fn new(pattern_library: Option<PathBuf>) -> Self {
        Self { pattern_library }
    }
}

#[async_trait]
impl DetectorLoader for PatternDetectorLoader {
    async fn load(&self, progress: InitProgress) -> Result<Arc<dyn SpanDetector>, DetectorError> {
        progress.report(10);

        let registry = match self.pattern_library {
            Some(ref path) => {
                tracing::debug!(path = %path.display(), "Loading pattern library");
                PatternRegistry::from_file(path)?
            }
            None => PatternRegistry::default_patterns()?,
        };

        tracing::info!(
            patterns = registry.all_patterns().len(),
            "Pattern detector loaded"
        );
        progress.report(100);

        Ok(Arc::new(PatternDetector::with_registry(registry)))
    }
}
