//! Batch image analysis and organization pipeline.
//!
//! The library ingests a queue of images and produces a structured content
//! analysis per image (classification, faces, text, safety, perceptual
//! fingerprint, quality, color palette), then derives a category, a suggested
//! filename, and duplicate groupings. ML-backed stages run against pluggable
//! [`services::capability::CapabilityBackend`] implementations and degrade to
//! deterministic fallbacks when a backend is unavailable; the numeric stages
//! (quality, hashing, palette) are built in.
//!
//! Processing is strictly sequential and cooperatively cancellable: the
//! [`services::batch::BatchProcessor`] drives one image at a time through the
//! [`services::orchestrator::AnalysisOrchestrator`] and polls its cancellation
//! token at image boundaries only.

pub mod core;
pub mod services;

pub use crate::core::categorize::categorize;
pub use crate::core::duplicate::{DuplicateGroup, DuplicateGrouper};
pub use crate::core::image::{
    AnalysisResult, BoundingBox, Category, Classification, DetectedObject, FaceInfo, ImageRecord,
    ImageSource, NsfwPrediction,
};
pub use crate::core::palette::PaletteExtractor;
pub use crate::core::phash::{hamming_similarity, PerceptualHasher};
pub use crate::core::quality::{QualityAnalyzer, QualityMetrics};
pub use crate::services::batch::{
    BatchError, BatchProcessor, BatchProgress, BatchStage, BatchStatus, BatchSummary,
    ProcessingStats, Suggestion, SuggestionAction, SuggestionKind,
};
pub use crate::services::capability::{
    CapabilityBackend, CapabilityInput, CapabilityKind, CapabilityOutput, CapabilityRegistry,
    CapabilityState,
};
pub use crate::services::ingest::IngestError;
pub use crate::services::orchestrator::{AnalysisOrchestrator, OrchestratorError};
pub use crate::services::report::{reports_json, AnalysisSummary, ImageReport};
pub use crate::services::settings::{AiSettings, SettingsError};
