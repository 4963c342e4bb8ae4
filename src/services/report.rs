use crate::core::categorize::is_unsafe;
use crate::core::image::{Category, ImageRecord};
use serde::{Deserialize, Serialize};

/// Default safety threshold used when rendering reports outside a configured
/// run.
const REPORT_NSFW_THRESHOLD: f32 = 0.7;

/// The analysis subset exposed to external exporters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub description: Option<String>,
    pub confidence: Option<f32>,
    pub is_safe: bool,
    pub face_count: usize,
    pub text_length: usize,
    pub quality_score: Option<f64>,
    pub palette: Vec<String>,
}

/// One exportable record per image. The library exposes the fields; the host
/// owns any file format built on top of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageReport {
    pub name: String,
    pub original_name: String,
    pub size_bytes: u64,
    pub category: Option<Category>,
    pub tags: Vec<String>,
    pub summary: Option<AnalysisSummary>,
}

impl ImageReport {
    pub fn from_record(record: &ImageRecord) -> Self {
        let summary = record.analysis.as_ref().map(|analysis| AnalysisSummary {
            description: analysis.caption.clone(),
            confidence: analysis.top_classification().map(|c| c.score),
            is_safe: analysis
                .nsfw_predictions
                .as_ref()
                .map_or(true, |p| !is_unsafe(p, REPORT_NSFW_THRESHOLD)),
            face_count: analysis.face_count(),
            text_length: analysis.text_len(),
            quality_score: analysis.quality.map(|q| q.score),
            palette: analysis.palette.clone().unwrap_or_default(),
        });

        Self {
            name: record.name.clone(),
            original_name: record.original_name.clone(),
            size_bytes: record.size_bytes,
            category: record.category,
            tags: record.tags.clone(),
            summary,
        }
    }
}

/// Render every record as a JSON array of reports.
pub fn reports_json(records: &[ImageRecord]) -> serde_json::Result<String> {
    let reports: Vec<ImageReport> = records.iter().map(ImageReport::from_record).collect();
    serde_json::to_string_pretty(&reports)
}
