use crate::core::categorize::categorize;
use crate::core::duplicate::DuplicateGrouper;
use crate::core::image::{AnalysisResult, Category, ImageRecord};
use crate::services::orchestrator::{AnalysisOrchestrator, OrchestratorError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("a batch run is already in progress")]
    AlreadyRunning,

    #[error("no unprocessed images in the queue")]
    NothingToProcess,

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

/// Lifecycle of the processor. Cancellation returns to `Idle`; a finished
/// run parks at `Complete` until the next start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Idle,
    Processing,
    Complete,
}

/// Substage indicator for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStage {
    Upload,
    Analysis,
    Organization,
    Complete,
}

/// Aggregate counters for one run. `processed == successful + errors` and
/// `processed <= total` hold at every observation point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total: usize,
    pub processed: usize,
    pub successful: usize,
    pub errors: usize,
    pub category_counts: HashMap<Category, usize>,
    pub average_duration_ms: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ProcessingStats {
    fn reset(&mut self, total: usize) {
        *self = Self {
            total,
            started_at: Some(Utc::now()),
            ..Self::default()
        };
    }

    /// One atomic step per image relative to any observer polling stats.
    fn record_image(&mut self, category: Category, duration_ms: u64, ok: bool) {
        self.processed += 1;
        if ok {
            self.successful += 1;
        } else {
            self.errors += 1;
        }
        *self.category_counts.entry(category).or_insert(0) += 1;
        let n = self.processed as f64;
        self.average_duration_ms += (duration_ms as f64 - self.average_duration_ms) / n;
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self {
            total: 0,
            processed: 0,
            successful: 0,
            errors: 0,
            category_counts: HashMap::new(),
            average_duration_ms: 0.0,
            started_at: None,
            finished_at: None,
        }
    }
}

/// One progress event, emitted per state transition and per image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchProgress {
    pub status: BatchStatus,
    pub stage: BatchStage,
    pub processed: usize,
    pub total: usize,
    pub current: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Rename,
    Category,
    Tag,
    Merge,
    Delete,
}

/// A deferred command the host applies through [`BatchProcessor::apply_suggestion`].
/// Creating a suggestion has no side effect; applying one is idempotent on
/// intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SuggestionAction {
    ReassignCategory { ids: Vec<String>, category: Category },
    Rename { id: String, name: String },
    AddTags { ids: Vec<String>, tags: Vec<String> },
    Remove { ids: Vec<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub kind: SuggestionKind,
    pub confidence: f64,
    pub description: String,
    pub image_ids: Vec<String>,
    pub action: SuggestionAction,
}

/// Final stats and suggestions of a run, whether it completed or was
/// cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub status: BatchStatus,
    pub stats: ProcessingStats,
    pub suggestions: Vec<Suggestion>,
}

/// The stateful driver: iterates the image queue strictly one at a time,
/// invokes the orchestrator per image, tracks statistics, supports
/// cooperative cancellation at image boundaries, and runs duplicate grouping
/// once over the processed set at the end.
pub struct BatchProcessor {
    images: Vec<ImageRecord>,
    stats: ProcessingStats,
    status: BatchStatus,
    stage: BatchStage,
    suggestions: Vec<Suggestion>,
    cancel: Arc<AtomicBool>,
    progress_tx: Option<mpsc::UnboundedSender<BatchProgress>>,
}

impl BatchProcessor {
    pub fn new() -> Self {
        Self {
            images: Vec::new(),
            stats: ProcessingStats::default(),
            status: BatchStatus::Idle,
            stage: BatchStage::Upload,
            suggestions: Vec::new(),
            cancel: Arc::new(AtomicBool::new(false)),
            progress_tx: None,
        }
    }

    pub fn with_progress_sender(mut self, sender: mpsc::UnboundedSender<BatchProgress>) -> Self {
        self.progress_tx = Some(sender);
        self
    }

    /// Shared flag for requesting cancellation from outside the run. It is
    /// polled once per image boundary; an in-flight analysis is never
    /// interrupted.
    pub fn cancellation_token(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn add_image(&mut self, record: ImageRecord) {
        self.images.push(record);
    }

    pub fn add_images(&mut self, records: impl IntoIterator<Item = ImageRecord>) {
        self.images.extend(records);
    }

    /// Explicit removal hook; any display resources tied to the record are
    /// the caller's to release.
    pub fn remove_image(&mut self, id: &str) -> Option<ImageRecord> {
        let idx = self.images.iter().position(|r| r.id == id)?;
        Some(self.images.remove(idx))
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn image(&self, id: &str) -> Option<&ImageRecord> {
        self.images.iter().find(|r| r.id == id)
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    pub fn status(&self) -> BatchStatus {
        self.status
    }

    pub fn stage(&self) -> BatchStage {
        self.stage
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Process every unprocessed image in submission order, then group
    /// duplicates over the full processed set. Startable only from `Idle` or
    /// `Complete` with at least one unprocessed image queued.
    pub async fn run(
        &mut self,
        orchestrator: &AnalysisOrchestrator,
    ) -> Result<BatchSummary, BatchError> {
        if self.status == BatchStatus::Processing {
            return Err(BatchError::AlreadyRunning);
        }
        let pending: Vec<usize> = self
            .images
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.processed)
            .map(|(i, _)| i)
            .collect();
        if pending.is_empty() {
            return Err(BatchError::NothingToProcess);
        }
        if !orchestrator.is_initialized() {
            return Err(OrchestratorError::NotInitialized.into());
        }

        log::info!("starting batch run over {} images", pending.len());
        self.status = BatchStatus::Processing;
        self.stage = BatchStage::Analysis;
        self.stats.reset(self.images.len());
        self.suggestions.clear();
        self.send_progress("", "starting analysis");

        let mut cancelled = false;
        for idx in pending {
            // Cancellation is only honored here, at image boundaries.
            if self.cancel.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }

            let name = self.images[idx].name.clone();
            self.send_progress(&name, "analyzing");

            let analysis = orchestrator.analyze(&self.images[idx]).await?;
            let ok = analysis.error.is_none();
            if !ok {
                log::warn!(
                    "analysis of {} failed: {}",
                    name,
                    analysis.error.as_deref().unwrap_or("unknown")
                );
            }
            let category = categorize(&analysis, orchestrator.settings().nsfw_threshold);
            let tags = derive_tags(&analysis);
            let duration_ms = analysis.duration_ms;

            let new_name = suggest_name(&self.images[idx], category);

            // Single atomic update per image; the analysis is attached whole,
            // never partially merged.
            let record = &mut self.images[idx];
            record.name = new_name;
            record.tags = tags;
            record.category = Some(category);
            record.analysis = Some(analysis);
            record.processed = true;
            record.processed_at = Some(Utc::now());

            self.stats.record_image(category, duration_ms, ok);
            self.send_progress(&name, "analyzed");
        }

        if cancelled {
            log::info!(
                "batch cancelled after {} of {} images",
                self.stats.processed,
                self.stats.total
            );
            // Consume the request so a later run can proceed.
            self.cancel.store(false, Ordering::Relaxed);
            self.status = BatchStatus::Idle;
            self.stats.finished_at = Some(Utc::now());
            self.send_progress("", "cancelled");
            return Ok(self.summary());
        }

        if orchestrator.settings().run_duplicate_detection {
            self.stage = BatchStage::Organization;
            self.send_progress("", "grouping duplicates");
            self.collect_duplicate_suggestions();
        }

        self.stage = BatchStage::Complete;
        self.status = BatchStatus::Complete;
        self.stats.finished_at = Some(Utc::now());
        self.send_progress("", "complete");
        log::info!(
            "batch complete: {} processed, {} ok, {} errors, {} suggestions",
            self.stats.processed,
            self.stats.successful,
            self.stats.errors,
            self.suggestions.len()
        );
        Ok(self.summary())
    }

    /// One merge suggestion per duplicate group: keep the first member,
    /// refile the rest under `duplicates` when the host applies it.
    fn collect_duplicate_suggestions(&mut self) {
        let hashes: Vec<(String, String)> = self
            .images
            .iter()
            .filter(|r| r.processed)
            .filter_map(|r| {
                let hash = r.analysis.as_ref()?.perceptual_hash.clone()?;
                Some((r.id.clone(), hash))
            })
            .collect();

        for group in DuplicateGrouper::new().group(&hashes) {
            let keep = self
                .image(&group.image_ids[0])
                .map(|r| r.name.clone())
                .unwrap_or_default();
            self.suggestions.push(Suggestion {
                id: format!("sug_{}", Uuid::new_v4().simple()),
                kind: SuggestionKind::Merge,
                confidence: group.similarity,
                description: format!(
                    "{} images look like duplicates; keep {} and file the rest under duplicates",
                    group.image_ids.len(),
                    keep
                ),
                image_ids: group.image_ids.clone(),
                action: SuggestionAction::ReassignCategory {
                    ids: group.image_ids[1..].to_vec(),
                    category: Category::Duplicates,
                },
            });
        }
    }

    /// The reducer that executes a suggestion's command against the owned
    /// records. Reassignment through a merge suggestion is the only path
    /// that changes an already-assigned category.
    pub fn apply_suggestion(&mut self, suggestion: &Suggestion) {
        match &suggestion.action {
            SuggestionAction::ReassignCategory { ids, category } => {
                for record in self.images.iter_mut().filter(|r| ids.contains(&r.id)) {
                    record.category = Some(*category);
                }
            }
            SuggestionAction::Rename { id, name } => {
                if let Some(record) = self.images.iter_mut().find(|r| r.id == *id) {
                    record.name = name.clone();
                }
            }
            SuggestionAction::AddTags { ids, tags } => {
                for record in self.images.iter_mut().filter(|r| ids.contains(&r.id)) {
                    for tag in tags {
                        if !record.tags.contains(tag) {
                            record.tags.push(tag.clone());
                        }
                    }
                }
            }
            SuggestionAction::Remove { ids } => {
                self.images.retain(|r| !ids.contains(&r.id));
            }
        }
    }

    fn summary(&self) -> BatchSummary {
        BatchSummary {
            status: self.status,
            stats: self.stats.clone(),
            suggestions: self.suggestions.clone(),
        }
    }

    fn send_progress(&self, current: &str, message: &str) {
        if let Some(sender) = &self.progress_tx {
            let _ = sender.send(BatchProgress {
                status: self.status,
                stage: self.stage,
                processed: self.stats.processed,
                total: self.stats.total,
                current: current.to_string(),
                message: message.to_string(),
            });
        }
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic tag set: confident classification labels, plus markers for
/// face and text presence.
fn derive_tags(analysis: &AnalysisResult) -> Vec<String> {
    let mut tags = Vec::new();
    if let Some(classifications) = &analysis.classifications {
        for c in classifications.iter().filter(|c| c.score >= 0.3) {
            let tag = c.label.to_lowercase();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    if analysis.face_count() > 0 {
        tags.push("faces".to_string());
    }
    if analysis.text_len() > 0 {
        tags.push("text".to_string());
    }
    tags
}

/// Suggested filename: `{category}-{yyyymmdd}-{id fragment}.{ext}`, keeping
/// the original extension.
fn suggest_name(record: &ImageRecord, category: Category) -> String {
    let ext = Path::new(&record.original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jpg")
        .to_lowercase();
    let fragment: String = record
        .id
        .trim_start_matches("img_")
        .chars()
        .take(6)
        .collect();
    format!(
        "{}-{}-{}.{}",
        category.as_str(),
        record.created_at.format("%Y%m%d"),
        fragment,
        ext
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::image::ImageSource;
    use crate::services::capability::{
        CapabilityBackend, CapabilityInput, CapabilityKind, CapabilityOutput, CapabilityRegistry,
    };
    use crate::services::settings::AiSettings;
    use anyhow::Result;
    use async_trait::async_trait;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;
    use std::sync::atomic::AtomicUsize;

    fn png_bytes(seed: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(64, 64, |x, y| {
            let v = ((x * seed + y * 7) % 256) as u8;
            Rgb([v, v.wrapping_mul(3), v.wrapping_add(90)])
        });
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn record(name: &str, seed: u32) -> ImageRecord {
        let bytes = png_bytes(seed);
        let size = bytes.len() as u64;
        ImageRecord::new(name, ImageSource::Bytes(bytes), size)
    }

    /// High-contrast checkerboard, nothing like the gradient records.
    fn checker_record(name: &str) -> ImageRecord {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(64, 64, |x, y| {
            if (x / 2 + y / 2) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        let bytes = buf.into_inner();
        let size = bytes.len() as u64;
        ImageRecord::new(name, ImageSource::Bytes(bytes), size)
    }

    async fn degraded_orchestrator() -> AnalysisOrchestrator {
        let mut orchestrator =
            AnalysisOrchestrator::new(AiSettings::default(), CapabilityRegistry::new());
        orchestrator.initialize().await;
        orchestrator
    }

    /// Caption backend that flips a cancellation flag after its n-th call,
    /// standing in for a host cancelling mid-run.
    struct CancellingCaptioner {
        calls: AtomicUsize,
        cancel_after: usize,
        flag: Arc<AtomicBool>,
    }

    #[async_trait]
    impl CapabilityBackend for CancellingCaptioner {
        fn kind(&self) -> CapabilityKind {
            CapabilityKind::Caption
        }

        async fn load(&self) -> Result<()> {
            Ok(())
        }

        async fn run(&self, _input: CapabilityInput<'_>) -> Result<CapabilityOutput> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.cancel_after {
                self.flag.store(true, Ordering::Relaxed);
            }
            Ok(CapabilityOutput::Caption(format!("caption {}", call)))
        }
    }

    #[tokio::test]
    async fn all_providers_down_still_processes_every_image() {
        // Scenario: a fully degraded session. Fallbacks are not errors.
        let orchestrator = degraded_orchestrator().await;
        let mut batch = BatchProcessor::new();
        batch.add_images([record("a.png", 3), record("b.png", 5), record("c.png", 11)]);

        let summary = batch.run(&orchestrator).await.unwrap();
        assert_eq!(summary.status, BatchStatus::Complete);
        assert_eq!(summary.stats.processed, 3);
        assert_eq!(summary.stats.successful, 3);
        assert_eq!(summary.stats.errors, 0);
        for record in batch.images() {
            assert!(record.processed);
            assert!(record.category.is_some());
            assert!(record.analysis.is_some());
            assert!(record.processed_at.is_some());
        }
    }

    #[tokio::test]
    async fn stats_invariants_hold_after_a_run_with_failures() {
        let orchestrator = degraded_orchestrator().await;
        let mut batch = BatchProcessor::new();
        batch.add_image(record("good.png", 3));
        batch.add_image(ImageRecord::new(
            "broken.png",
            ImageSource::Bytes(vec![9, 9, 9]),
            3,
        ));

        let summary = batch.run(&orchestrator).await.unwrap();
        assert_eq!(summary.stats.processed, 2);
        assert_eq!(summary.stats.successful, 1);
        assert_eq!(summary.stats.errors, 1);
        assert_eq!(
            summary.stats.processed,
            summary.stats.successful + summary.stats.errors
        );
        assert!(summary.stats.processed <= summary.stats.total);

        // The broken image is still marked processed, with a stub analysis.
        let broken = batch
            .images()
            .iter()
            .find(|r| r.original_name == "broken.png")
            .unwrap();
        assert!(broken.processed);
        assert!(broken.analysis.as_ref().unwrap().error.is_some());
        assert_eq!(broken.category, Some(Category::General));
    }

    #[tokio::test]
    async fn identical_images_produce_a_merge_suggestion() {
        let orchestrator = degraded_orchestrator().await;
        let mut batch = BatchProcessor::new();
        batch.add_images([
            record("one.png", 3),
            record("two.png", 3),
            checker_record("other.png"),
        ]);

        let summary = batch.run(&orchestrator).await.unwrap();
        assert_eq!(summary.suggestions.len(), 1);
        let suggestion = &summary.suggestions[0];
        assert_eq!(suggestion.kind, SuggestionKind::Merge);
        assert_eq!(suggestion.confidence, 0.9);
        assert_eq!(suggestion.image_ids.len(), 2);

        // Emitting the suggestion had no side effect on categories.
        assert!(batch
            .images()
            .iter()
            .all(|r| r.category != Some(Category::Duplicates)));

        // Applying it refiles everything but the first member.
        let suggestion = summary.suggestions[0].clone();
        batch.apply_suggestion(&suggestion);
        let kept = batch.image(&suggestion.image_ids[0]).unwrap();
        assert_ne!(kept.category, Some(Category::Duplicates));
        let moved = batch.image(&suggestion.image_ids[1]).unwrap();
        assert_eq!(moved.category, Some(Category::Duplicates));

        // Idempotent on intent.
        batch.apply_suggestion(&suggestion);
        let moved = batch.image(&suggestion.image_ids[1]).unwrap();
        assert_eq!(moved.category, Some(Category::Duplicates));
    }

    #[tokio::test]
    async fn cancellation_stops_at_the_next_image_boundary() {
        // Scenario: cancellation lands while the 2nd image is in flight;
        // images 3..5 must never be touched and status returns to idle.
        let mut batch = BatchProcessor::new();
        for i in 0..5 {
            batch.add_image(record(&format!("photo_{}.png", i), 3 + i));
        }

        let mut registry = CapabilityRegistry::new();
        registry.register(Arc::new(CancellingCaptioner {
            calls: AtomicUsize::new(0),
            cancel_after: 2,
            flag: batch.cancellation_token(),
        }));
        let mut orchestrator = AnalysisOrchestrator::new(AiSettings::default(), registry);
        orchestrator.initialize().await;

        let summary = batch.run(&orchestrator).await.unwrap();
        assert_eq!(summary.status, BatchStatus::Idle);
        assert_eq!(summary.stats.processed, 2);
        assert_eq!(batch.status(), BatchStatus::Idle);
        assert_eq!(batch.images().iter().filter(|r| r.processed).count(), 2);
        // Cancellation is not an error, and no duplicate pass ran.
        assert_eq!(summary.stats.errors, 0);
        assert!(summary.suggestions.is_empty());

        // The request was consumed; a fresh run picks up the remainder.
        let orchestrator = degraded_orchestrator().await;
        let summary = batch.run(&orchestrator).await.unwrap();
        assert_eq!(summary.status, BatchStatus::Complete);
        assert_eq!(batch.images().iter().filter(|r| r.processed).count(), 5);
    }

    #[tokio::test]
    async fn already_processed_images_are_not_reanalyzed() {
        let orchestrator = degraded_orchestrator().await;
        let mut batch = BatchProcessor::new();
        batch.add_image(record("first.png", 3));
        batch.run(&orchestrator).await.unwrap();

        let first_processed_at = batch.images()[0].processed_at;
        batch.add_image(record("second.png", 5));
        batch.run(&orchestrator).await.unwrap();

        assert_eq!(batch.images()[0].processed_at, first_processed_at);
        assert_eq!(batch.stats().processed, 1); // per-run stats reset
        assert_eq!(batch.stats().total, 2);
    }

    #[tokio::test]
    async fn empty_queue_refuses_to_start() {
        let orchestrator = degraded_orchestrator().await;
        let mut batch = BatchProcessor::new();
        assert!(matches!(
            batch.run(&orchestrator).await,
            Err(BatchError::NothingToProcess)
        ));

        batch.add_image(record("a.png", 3));
        batch.run(&orchestrator).await.unwrap();
        // Everything processed: a re-run has nothing to do.
        assert!(matches!(
            batch.run(&orchestrator).await,
            Err(BatchError::NothingToProcess)
        ));
    }

    #[tokio::test]
    async fn uninitialized_orchestrator_is_rejected_before_state_changes() {
        let orchestrator =
            AnalysisOrchestrator::new(AiSettings::default(), CapabilityRegistry::new());
        let mut batch = BatchProcessor::new();
        batch.add_image(record("a.png", 3));

        assert!(matches!(
            batch.run(&orchestrator).await,
            Err(BatchError::Orchestrator(OrchestratorError::NotInitialized))
        ));
        assert_eq!(batch.status(), BatchStatus::Idle);
        assert!(!batch.images()[0].processed);
    }

    #[tokio::test]
    async fn progress_events_cover_the_full_lifecycle() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let orchestrator = degraded_orchestrator().await;
        let mut batch = BatchProcessor::new().with_progress_sender(tx);
        batch.add_images([record("a.png", 3), record("b.png", 5)]);
        batch.run(&orchestrator).await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert!(!events.is_empty());
        assert!(events.iter().any(|e| e.stage == BatchStage::Analysis));
        assert!(events.iter().any(|e| e.stage == BatchStage::Organization));
        let last = events.last().unwrap();
        assert_eq!(last.stage, BatchStage::Complete);
        assert_eq!(last.status, BatchStatus::Complete);
        assert_eq!(last.processed, 2);
    }

    #[tokio::test]
    async fn processed_images_get_suggested_names_and_tags() {
        let orchestrator = degraded_orchestrator().await;
        let mut batch = BatchProcessor::new();
        batch.add_image(record("mountain_hike.png", 3));
        batch.run(&orchestrator).await.unwrap();

        let record = &batch.images()[0];
        assert_eq!(record.original_name, "mountain_hike.png");
        assert_eq!(record.category, Some(Category::Nature));
        assert!(record.name.starts_with("nature-"));
        assert!(record.name.ends_with(".png"));
        assert!(record.tags.contains(&"nature landscape".to_string()));
    }

    #[tokio::test]
    async fn remove_image_takes_the_record_out_of_the_queue() {
        let mut batch = BatchProcessor::new();
        batch.add_image(record("a.png", 3));
        let id = batch.images()[0].id.clone();

        let removed = batch.remove_image(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(batch.images().is_empty());
        assert!(batch.remove_image(&id).is_none());
    }
}
