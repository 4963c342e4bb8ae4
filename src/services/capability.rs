use crate::core::image::{Classification, DetectedObject, FaceInfo, NsfwPrediction};
use anyhow::{bail, Result};
use async_trait::async_trait;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The six pluggable analysis capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityKind {
    Classify,
    Caption,
    DetectObjects,
    DetectNsfw,
    DetectFaces,
    RecognizeText,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 6] = [
        CapabilityKind::Classify,
        CapabilityKind::Caption,
        CapabilityKind::DetectObjects,
        CapabilityKind::DetectNsfw,
        CapabilityKind::DetectFaces,
        CapabilityKind::RecognizeText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Classify => "classify",
            CapabilityKind::Caption => "caption",
            CapabilityKind::DetectObjects => "detect-objects",
            CapabilityKind::DetectNsfw => "detect-nsfw",
            CapabilityKind::DetectFaces => "detect-faces",
            CapabilityKind::RecognizeText => "recognize-text",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One image handed to a backend for analysis.
pub struct CapabilityInput<'a> {
    pub image_id: &'a str,
    pub file_name: &'a str,
    pub pixels: &'a DynamicImage,
}

/// Typed output at the provider boundary; the core never depends on
/// undocumented shapes coming out of a backend.
#[derive(Debug, Clone)]
pub enum CapabilityOutput {
    Classifications(Vec<Classification>),
    Caption(String),
    Objects(Vec<DetectedObject>),
    Nsfw(Vec<NsfwPrediction>),
    Faces(Vec<FaceInfo>),
    Text(String),
}

/// An external, independently loadable analysis backend. `load` is called at
/// most once per session; a failed load permanently degrades the capability
/// to its fallback for the session.
#[async_trait]
pub trait CapabilityBackend: Send + Sync {
    fn kind(&self) -> CapabilityKind;

    async fn load(&self) -> Result<()>;

    async fn run(&self, input: CapabilityInput<'_>) -> Result<CapabilityOutput>;
}

/// Load state of one registered capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityState {
    NotLoaded,
    Loaded,
    Failed(String),
}

struct Slot {
    backend: Arc<dyn CapabilityBackend>,
    state: CapabilityState,
}

/// Holds the registered backends and their load states. Loaded once, read
/// many times; never mutated concurrently with a load.
#[derive(Default)]
pub struct CapabilityRegistry {
    slots: HashMap<CapabilityKind, Slot>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend for its capability kind, replacing any previous
    /// registration.
    pub fn register(&mut self, backend: Arc<dyn CapabilityBackend>) {
        let kind = backend.kind();
        self.slots.insert(
            kind,
            Slot {
                backend,
                state: CapabilityState::NotLoaded,
            },
        );
    }

    /// Attempt to load every backend that has not been tried yet. Failures
    /// are recorded, logged and never retried.
    pub async fn load_all(&mut self) {
        for (kind, slot) in self.slots.iter_mut() {
            if slot.state != CapabilityState::NotLoaded {
                continue;
            }
            match slot.backend.load().await {
                Ok(()) => {
                    log::info!("capability {} loaded", kind);
                    slot.state = CapabilityState::Loaded;
                }
                Err(e) => {
                    log::warn!("capability {} failed to load: {}", kind, e);
                    slot.state = CapabilityState::Failed(e.to_string());
                }
            }
        }
    }

    pub fn state(&self, kind: CapabilityKind) -> CapabilityState {
        self.slots
            .get(&kind)
            .map(|s| s.state.clone())
            .unwrap_or(CapabilityState::NotLoaded)
    }

    /// A capability is available only when its backend loaded successfully.
    pub fn is_available(&self, kind: CapabilityKind) -> bool {
        matches!(self.state(kind), CapabilityState::Loaded)
    }

    pub async fn run(
        &self,
        kind: CapabilityKind,
        input: CapabilityInput<'_>,
    ) -> Result<CapabilityOutput> {
        match self.slots.get(&kind) {
            Some(slot) if slot.state == CapabilityState::Loaded => slot.backend.run(input).await,
            _ => bail!("capability {} is not available", kind),
        }
    }
}
