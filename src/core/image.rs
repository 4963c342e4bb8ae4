use crate::core::quality::QualityMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Where an image's bytes come from. Decoding happens lazily per processing
/// pass; the decoded buffer is dropped as soon as the image's analysis
/// completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// One image in the processing queue. Owned exclusively by the batch
/// processor; analysis is attached in a single update per image, never
/// partially merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub source: ImageSource,
    /// Display name, updated by the rename step after processing.
    pub name: String,
    /// Name at ingestion time, never mutated afterwards.
    pub original_name: String,
    pub size_bytes: u64,
    pub processed: bool,
    pub category: Option<Category>,
    pub tags: Vec<String>,
    pub analysis: Option<AnalysisResult>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl ImageRecord {
    pub fn new(name: impl Into<String>, source: ImageSource, size_bytes: u64) -> Self {
        let name = name.into();
        Self {
            id: format!("img_{}", Uuid::new_v4().simple()),
            source,
            original_name: name.clone(),
            name,
            size_bytes,
            processed: false,
            category: None,
            tags: Vec::new(),
            analysis: None,
            created_at: Utc::now(),
            processed_at: None,
        }
    }
}

/// Axis-aligned box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub label: String,
    pub score: f32,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NsfwPrediction {
    pub class_name: String,
    pub probability: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceInfo {
    pub age: Option<f32>,
    pub gender: Option<String>,
    pub expression: Option<String>,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Full analysis output for one image. Optional fields stay `None` when the
/// corresponding stage is disabled or produced nothing; the presence of
/// `error` does not prevent earlier successful stages from having populated
/// their fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: String,
    pub image_id: String,
    pub width: u32,
    pub height: u32,
    pub size_mb: f64,
    pub classifications: Option<Vec<Classification>>,
    pub caption: Option<String>,
    pub objects: Option<Vec<DetectedObject>>,
    pub nsfw_predictions: Option<Vec<NsfwPrediction>>,
    pub faces: Option<Vec<FaceInfo>>,
    pub extracted_text: Option<String>,
    pub perceptual_hash: Option<String>,
    pub quality: Option<QualityMetrics>,
    pub palette: Option<Vec<String>>,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn new(image_id: &str, width: u32, height: u32, size_bytes: u64) -> Self {
        Self {
            id: format!("ana_{}", Uuid::new_v4().simple()),
            image_id: image_id.to_string(),
            width,
            height,
            size_mb: size_bytes as f64 / (1024.0 * 1024.0),
            classifications: None,
            caption: None,
            objects: None,
            nsfw_predictions: None,
            faces: None,
            extracted_text: None,
            perceptual_hash: None,
            quality: None,
            palette: None,
            duration_ms: 0,
            error: None,
            created_at: Utc::now(),
        }
    }

    /// Stub result for an image-level failure: zero dimensions and an error
    /// string, so the batch loop can keep going.
    pub fn stub(image_id: &str, error: impl Into<String>) -> Self {
        let mut result = Self::new(image_id, 0, 0, 0);
        result.error = Some(error.into());
        result
    }

    pub fn face_count(&self) -> usize {
        self.faces.as_ref().map_or(0, |f| f.len())
    }

    pub fn text_len(&self) -> usize {
        self.extracted_text.as_ref().map_or(0, |t| t.chars().count())
    }

    pub fn top_classification(&self) -> Option<&Classification> {
        self.classifications.as_ref().and_then(|c| c.first())
    }
}

/// Closed set of categories an image can be filed under. Once assigned, a
/// category is only ever reassigned (to `Duplicates`) through the merge
/// suggestion reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Selfies,
    Documents,
    Screenshots,
    Nature,
    Food,
    Art,
    Nsfw,
    Duplicates,
    General,
    Memes,
    Receipts,
    QrCodes,
    Pets,
    Vehicles,
    Architecture,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Selfies => "selfies",
            Category::Documents => "documents",
            Category::Screenshots => "screenshots",
            Category::Nature => "nature",
            Category::Food => "food",
            Category::Art => "art",
            Category::Nsfw => "nsfw",
            Category::Duplicates => "duplicates",
            Category::General => "general",
            Category::Memes => "memes",
            Category::Receipts => "receipts",
            Category::QrCodes => "qr-codes",
            Category::Pets => "pets",
            Category::Vehicles => "vehicles",
            Category::Architecture => "architecture",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
