//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`] that drives one document
//! through the pipeline:
//!
//! 1. **Segmenter**: split the text into bounded slices
//! 2. **Detector**: call the span detector once per slice
//! 3. **Aggregator**: merge, deduplicate and number the entities
//! 4. **Substitution**: replace every occurrence with its placeholder
//!
//! # Lifecycle
//!
//! The detector is loaded lazily through a [`DetectorLoader`]. The engine
//! moves from `Uninitialized` through `Initializing` to `Ready`; concurrent
//! calls to [`initialize`](AnonymizationEngine::initialize) share one
//! in-flight attempt, and a failed attempt puts the engine back to
//! `Uninitialized` so it can be retried.
//!
//! # Examples
//!
//! ```no_run
//! use veil::anonymization::{AnonymizationEngine, config::{AuditConfig, DetectionConfig}};
//!
//! # async fn example() -> veil::domain::Result<()> {
//! let engine = AnonymizationEngine::from_config(&DetectionConfig::default(), &AuditConfig::default())?;
//! engine.initialize().await?;
//!
//! let labels = vec!["email".to_string()];
//! let document = engine
//!     .anonymize_document("memo", "Write to jane@example.com", &labels)
//!     .await?;
//! assert_eq!(document.redacted_text, "Write to [1_email]");
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    aggregator::EntityAggregator,
    audit::AuditLogger,
    config::{AuditConfig, DetectionConfig, DetectorBackend},
    detector::{
        http::HttpDetectorLoader, regex::PatternDetectorLoader, DetectorLoader, InitProgress,
        ReadyLoader, SpanDetector, DEFAULT_THRESHOLD,
    },
    models::{RedactedDocument, RedactionStats},
    segmenter::{split_into_slices, DEFAULT_MAX_SLICE_CHARS},
    substitution::Substitutor,
};
use crate::domain::{DetectorError, Entity, Result, VeilError};
use crate::{log_detection_start, log_redaction_complete};
use futures::future::{BoxFuture, FutureExt, Shared};
use futures::stream::{self, StreamExt};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::watch;

type InitAttempt = Shared<BoxFuture<'static, std::result::Result<Arc<dyn SpanDetector>, DetectorError>>>;

/// Observable engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No detector loaded and no load in progress
    Uninitialized,
    /// A load is in flight
    Initializing,
    /// Detector loaded; detection calls are accepted
    Ready,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Initializing => write!(f, "initializing"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

enum Lifecycle {
    Uninitialized,
    Initializing(InitAttempt),
    Ready(Arc<dyn SpanDetector>),
}

/// Tunables for the detection pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Maximum slice length in characters
    pub max_slice_chars: usize,

    /// Threshold passed to every detector call
    pub threshold: f32,

    /// Slices detected concurrently; 1 means strictly sequential
    pub concurrency: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_slice_chars: DEFAULT_MAX_SLICE_CHARS,
            threshold: DEFAULT_THRESHOLD,
            concurrency: 1,
        }
    }
}

impl From<&DetectionConfig> for EngineSettings {
    fn from(config: &DetectionConfig) -> Self {
        Self {
            max_slice_chars: config.max_slice_chars,
            threshold: config.threshold,
            concurrency: config.concurrency,
        }
    }
}

/// Main anonymization engine
///
/// # Thread Safety
///
/// The engine is `Send + Sync` and can be shared across tasks behind an
/// `Arc`. The lifecycle lock is never held across an await point.
pub struct AnonymizationEngine {
    loader: Arc<dyn DetectorLoader>,
    lifecycle: Mutex<Lifecycle>,
    progress: Arc<watch::Sender<u8>>,
    settings: EngineSettings,
    audit_logger: Option<AuditLogger>,
}

impl AnonymizationEngine {
    /// Create an uninitialized engine that loads its detector with `loader`
    pub fn new(loader: Arc<dyn DetectorLoader>, settings: EngineSettings) -> Self {
        let (progress, _) = watch::channel(0u8);
        Self {
            loader,
            lifecycle: Mutex::new(Lifecycle::Uninitialized),
            progress: Arc::new(progress),
            settings,
            audit_logger: None,
        }
    }

    /// Create an engine that is ready immediately
    pub fn with_detector(detector: Arc<dyn SpanDetector>, settings: EngineSettings) -> Self {
        let engine = Self::new(Arc::new(ReadyLoader::new(Arc::clone(&detector))), settings);
        *engine.lock_lifecycle() = Lifecycle::Ready(detector);
        engine.progress.send_replace(100);
        engine
    }

    /// Build an engine from configuration
    ///
    /// The detector is not loaded until [`initialize`](Self::initialize) is
    /// called.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the audit log
    /// cannot be prepared.
    pub fn from_config(detection: &DetectionConfig, audit: &AuditConfig) -> Result<Self> {
        detection
            .validate()
            .map_err(|e| VeilError::Configuration(format!("{e:#}")))?;

        let loader: Arc<dyn DetectorLoader> = match detection.backend {
            DetectorBackend::Patterns => {
                Arc::new(PatternDetectorLoader::new(detection.pattern_library.clone()))
            }
            DetectorBackend::Http => {
                let http = detection.http.clone().ok_or_else(|| {
                    VeilError::Configuration(
                        "detection.http configuration is required when backend = 'http'".to_string(),
                    )
                })?;
                Arc::new(HttpDetectorLoader::new(http))
            }
        };

        let mut engine = Self::new(loader, EngineSettings::from(detection));
        if audit.enabled {
            engine = engine.with_audit_logger(AuditLogger::new(
                audit.log_path.clone(),
                audit.json_format,
            )?);
        }

        tracing::debug!(
            backend = %detection.backend,
            max_slice_chars = detection.max_slice_chars,
            concurrency = detection.concurrency,
            audit = audit.enabled,
            "Anonymization engine configured"
        );

        Ok(engine)
    }

    /// Attach an audit logger
    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit_logger = Some(logger);
        self
    }

    /// Detection settings in use
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current lifecycle state
    pub fn state(&self) -> EngineState {
        match *self.lock_lifecycle() {
            Lifecycle::Uninitialized => EngineState::Uninitialized,
            Lifecycle::Initializing(_) => EngineState::Initializing,
            Lifecycle::Ready(_) => EngineState::Ready,
        }
    }

    /// Check if detection calls are accepted
    pub fn is_ready(&self) -> bool {
        self.state() == EngineState::Ready
    }

    /// Subscribe to initialization progress (0..=100)
    pub fn subscribe_progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    /// Join the in-flight load or start a new one; `None` when already ready
    fn begin_or_join(&self) -> Option<InitAttempt> {
        let mut lifecycle = self.lock_lifecycle();

        if let Lifecycle::Ready(_) = *lifecycle {
            return None;
        }
        if let Lifecycle::Initializing(ref attempt) = *lifecycle {
            return Some(attempt.clone());
        }

        self.progress.send_replace(0);
        let loader = Arc::clone(&self.loader);
        let progress = InitProgress::new(Arc::clone(&self.progress));
        let attempt = async move { loader.load(progress).await }.boxed().shared();

        tracing::info!("Initializing span detector");
        *lifecycle = Lifecycle::Initializing(attempt.clone());
        Some(attempt)
    }

    /// Load the detector
    ///
    /// Returns immediately when the engine is already ready. Concurrent
    /// callers await the same attempt and observe the same outcome.
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Initialization`] if the loader fails; the engine
    /// is then `Uninitialized` again.
    pub async fn initialize(&self) -> Result<()> {
        let Some(attempt) = self.begin_or_join() else {
            return Ok(());
        };

        let outcome = attempt.clone().await;

        let mut lifecycle = self.lock_lifecycle();
        let current = matches!(*lifecycle, Lifecycle::Initializing(ref a) if a.ptr_eq(&attempt));

        match outcome {
            Ok(detector) => {
                if current {
                    tracing::info!(detector = detector.name(), "Span detector ready");
                    *lifecycle = Lifecycle::Ready(detector);
                }
                Ok(())
            }
            Err(e) => {
                if current {
                    tracing::error!(error = %e, "Span detector initialization failed");
                    *lifecycle = Lifecycle::Uninitialized;
                }
                Err(VeilError::Initialization(e.to_string()))
            }
        }
    }

    fn ready_detector(&self) -> Result<Arc<dyn SpanDetector>> {
        match *self.lock_lifecycle() {
            Lifecycle::Ready(ref detector) => Ok(Arc::clone(detector)),
            _ => Err(VeilError::NotReady),
        }
    }

    /// Detect the deduplicated entities of a document
    ///
    /// # Errors
    ///
    /// - [`VeilError::NotReady`] if the detector is not loaded
    /// - [`VeilError::Detection`] on the first failing slice; no partial
    ///   result is returned
    pub async fn detect_entities(&self, text: &str, labels: &[String]) -> Result<Vec<Entity>> {
        let detector = self.ready_detector()?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let aggregator = self.run_detection(detector.as_ref(), text, labels).await?;
        Ok(aggregator.finish())
    }

    async fn run_detection(
        &self,
        detector: &dyn SpanDetector,
        text: &str,
        labels: &[String],
    ) -> Result<EntityAggregator> {
        let threshold = self.settings.threshold;
        let concurrency = self.settings.concurrency.max(1);

        log_detection_start!(
            detector.name(),
            text.chars().count(),
            labels.len(),
            concurrency
        );

        let mut results = stream::iter(split_into_slices(text, self.settings.max_slice_chars).enumerate())
            .map(|(index, slice)| async move {
                detector
                    .detect(slice, labels, threshold)
                    .await
                    .map_err(|source| VeilError::Detection {
                        slice: index,
                        source,
                    })
            })
            .buffered(concurrency);

        let mut aggregator = EntityAggregator::new();
        while let Some(spans) = results.next().await {
            let spans = spans?;
            tracing::trace!(
                slice = aggregator.slice_count(),
                spans = spans.len(),
                "Slice detected"
            );
            aggregator.push_slice(spans);
        }

        Ok(aggregator)
    }

    /// Replace every occurrence of `entities` in `text` with placeholders
    ///
    /// Does not need the detector.
    pub fn anonymize(&self, text: &str, entities: &[Entity]) -> Result<String> {
        crate::anonymization::substitution::anonymize(text, entities)
    }

    /// Detect and redact a document in one pass
    ///
    /// # Errors
    ///
    /// Any detection, substitution or audit failure aborts the run; no
    /// partially redacted text is returned.
    pub async fn anonymize_document(
        &self,
        document_id: &str,
        text: &str,
        labels: &[String],
    ) -> Result<RedactedDocument> {
        let start = Instant::now();
        let detector = self.ready_detector()?;

        let mut stats = RedactionStats {
            input_chars: text.chars().count(),
            ..Default::default()
        };

        let entities = if text.trim().is_empty() {
            Vec::new()
        } else {
            let aggregator = self.run_detection(detector.as_ref(), text, labels).await?;
            stats.slices = aggregator.slice_count();
            stats.provisional_entities = aggregator.provisional_count();
            aggregator.finish()
        };

        self.finish_document(document_id, text, entities, stats, start)
    }

    /// Redact a document with a caller-supplied entity manifest
    ///
    /// The manifest is used as given: ids are not renumbered.
    pub fn redact_with_entities(
        &self,
        document_id: &str,
        text: &str,
        entities: Vec<Entity>,
    ) -> Result<RedactedDocument> {
        let stats = RedactionStats {
            input_chars: text.chars().count(),
            provisional_entities: entities.len(),
            ..Default::default()
        };
        self.finish_document(document_id, text, entities, stats, Instant::now())
    }

    fn finish_document(
        &self,
        document_id: &str,
        text: &str,
        entities: Vec<Entity>,
        mut stats: RedactionStats,
        start: Instant,
    ) -> Result<RedactedDocument> {
        let outcome = Substitutor::new(&entities).apply(text)?;
        stats.record_substitution(&entities, &outcome);

        let elapsed = start.elapsed();
        log_redaction_complete!(
            document_id,
            stats.entities,
            stats.placeholders_emitted,
            elapsed
        );

        let document = RedactedDocument::new(
            document_id,
            outcome.text,
            entities,
            stats,
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        );

        if let Some(ref logger) = self.audit_logger {
            logger.log_redaction(&document)?;
        }

        Ok(document)
    }
}
