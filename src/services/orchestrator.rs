use crate::core::image::{AnalysisResult, ImageRecord, ImageSource};
use crate::core::palette::PaletteExtractor;
use crate::core::phash::PerceptualHasher;
use crate::core::quality::QualityAnalyzer;
use crate::services::capability::{
    CapabilityInput, CapabilityKind, CapabilityOutput, CapabilityRegistry,
};
use crate::services::fallback;
use crate::services::settings::AiSettings;
use image::DynamicImage;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Precondition violation: `initialize` was never called. Distinct from
    /// any per-stage runtime failure, which never surfaces as an error.
    #[error("orchestrator has not been initialized")]
    NotInitialized,
}

/// Runs every enabled analysis stage for one image, merging capability
/// backend outputs with the built-in quality/hash/palette stages. Each
/// stage fails in isolation: a backend error degrades that stage to its
/// fallback (or omits the field) without touching its siblings, and an
/// image-level failure yields a stub result instead of propagating.
pub struct AnalysisOrchestrator {
    registry: CapabilityRegistry,
    settings: AiSettings,
    quality: QualityAnalyzer,
    hasher: PerceptualHasher,
    palette: PaletteExtractor,
    initialized: bool,
}

impl AnalysisOrchestrator {
    pub fn new(settings: AiSettings, registry: CapabilityRegistry) -> Self {
        Self {
            registry,
            settings,
            quality: QualityAnalyzer::new(),
            hasher: PerceptualHasher::new(),
            palette: PaletteExtractor::new(),
            initialized: false,
        }
    }

    /// Attempt to load every registered backend once. Load failures degrade
    /// the affected capability to its fallback for the whole session.
    pub async fn initialize(&mut self) {
        self.registry.load_all().await;
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Analyze one image. The only error is the initialization precondition;
    /// everything that goes wrong during analysis is absorbed into the
    /// returned result.
    pub async fn analyze(&self, record: &ImageRecord) -> Result<AnalysisResult, OrchestratorError> {
        if !self.initialized {
            return Err(OrchestratorError::NotInitialized);
        }

        let started = Instant::now();
        let pixels = match decode(&record.source) {
            Ok(img) => img,
            Err(e) => {
                log::warn!("failed to decode {}: {}", record.name, e);
                let mut stub = AnalysisResult::stub(&record.id, e.to_string());
                stub.duration_ms = started.elapsed().as_millis() as u64;
                return Ok(stub);
            }
        };

        let mut result = AnalysisResult::new(
            &record.id,
            pixels.width(),
            pixels.height(),
            record.size_bytes,
        );

        if self.settings.run_classifier {
            result.classifications =
                Some(match self.call(CapabilityKind::Classify, record, &pixels).await {
                    Some(CapabilityOutput::Classifications(c)) => c,
                    _ => fallback::classify_from_name(&record.name),
                });
        }

        if self.settings.run_captioner {
            result.caption = Some(match self.call(CapabilityKind::Caption, record, &pixels).await {
                Some(CapabilityOutput::Caption(c)) => c,
                _ => fallback::caption_from_name(&record.name),
            });
        }

        // No deterministic stand-in exists for object detection or OCR;
        // those fields stay empty when the backend is unavailable.
        if self.settings.run_object_detection {
            if let Some(CapabilityOutput::Objects(objects)) =
                self.call(CapabilityKind::DetectObjects, record, &pixels).await
            {
                result.objects = Some(objects);
            }
        }

        if self.settings.run_nsfw {
            result.nsfw_predictions =
                Some(match self.call(CapabilityKind::DetectNsfw, record, &pixels).await {
                    Some(CapabilityOutput::Nsfw(p)) => p,
                    _ => fallback::neutral_nsfw(),
                });
        }

        if self.settings.run_face_detection {
            result.faces =
                Some(match self.call(CapabilityKind::DetectFaces, record, &pixels).await {
                    Some(CapabilityOutput::Faces(f)) => f,
                    _ => fallback::faces_from_name(&record.name, pixels.width(), pixels.height()),
                });
        }

        if self.settings.run_ocr {
            if let Some(CapabilityOutput::Text(text)) =
                self.call(CapabilityKind::RecognizeText, record, &pixels).await
            {
                result.extracted_text = Some(text);
            }
        }

        // Built-in numeric stages; no error path.
        if self.settings.run_duplicate_detection {
            result.perceptual_hash = Some(self.hasher.hash(&pixels));
        }
        if self.settings.run_quality_analysis {
            result.quality = Some(self.quality.analyze(&pixels));
        }
        if self.settings.run_color_palette {
            result.palette = Some(self.palette.extract(&pixels));
        }

        result.duration_ms = started.elapsed().as_millis() as u64;
        Ok(result)
    }

    /// Run one capability if it is available; `None` means the caller should
    /// fall back. Backend errors are caught here so sibling stages still run.
    async fn call(
        &self,
        kind: CapabilityKind,
        record: &ImageRecord,
        pixels: &DynamicImage,
    ) -> Option<CapabilityOutput> {
        if !self.registry.is_available(kind) {
            log::debug!("{} unavailable for {}, degrading", kind, record.id);
            return None;
        }
        let input = CapabilityInput {
            image_id: &record.id,
            file_name: &record.name,
            pixels,
        };
        match self.registry.run(kind, input).await {
            Ok(output) => Some(output),
            Err(e) => {
                log::warn!("{} failed for {}: {}", kind, record.id, e);
                None
            }
        }
    }
}

fn decode(source: &ImageSource) -> Result<DynamicImage, image::ImageError> {
    match source {
        ImageSource::Path(path) => image::open(path),
        ImageSource::Bytes(bytes) => image::load_from_memory(bytes),
    }
}
