use crate::core::image::{AnalysisResult, Category, NsfwPrediction};

/// OCR text longer than this (in characters) files the image as a document.
const DOCUMENT_TEXT_LEN: usize = 50;

/// NSFW class names that count as unsafe. Neutral/drawing style predictions
/// never trip the safety rule, whatever their probability.
const UNSAFE_CLASSES: &[&str] = &["porn", "hentai", "sexy", "explicit", "nsfw"];

/// Case-insensitive substrings of the top classification label, checked in
/// order.
const KEYWORD_GROUPS: &[(&[&str], Category)] = &[
    (&["screen", "computer"], Category::Screenshots),
    (&["nature", "landscape", "mountain", "beach"], Category::Nature),
    (&["food", "meal", "dish"], Category::Food),
    (&["art", "painting"], Category::Art),
    (&["pet", "animal"], Category::Pets),
    (&["car", "vehicle"], Category::Vehicles),
    (&["building", "architecture"], Category::Architecture),
];

/// Maps an analysis result to exactly one category through an ordered rule
/// chain; the first matching rule wins. Face presence deliberately outranks
/// every other signal, including an explicit NSFW score.
pub fn categorize(analysis: &AnalysisResult, nsfw_threshold: f32) -> Category {
    if analysis.face_count() > 0 {
        return Category::Selfies;
    }

    if analysis.text_len() > DOCUMENT_TEXT_LEN {
        return Category::Documents;
    }

    if let Some(top) = analysis.top_classification() {
        let label = top.label.to_lowercase();
        for (keywords, category) in KEYWORD_GROUPS {
            if keywords.iter().any(|kw| label.contains(kw)) {
                return *category;
            }
        }
    }

    if let Some(predictions) = &analysis.nsfw_predictions {
        if is_unsafe(predictions, nsfw_threshold) {
            return Category::Nsfw;
        }
    }

    Category::General
}

/// True when any unsafe-class prediction exceeds the threshold.
pub fn is_unsafe(predictions: &[NsfwPrediction], threshold: f32) -> bool {
    predictions.iter().any(|p| {
        p.probability > threshold && UNSAFE_CLASSES.contains(&p.class_name.to_lowercase().as_str())
    })
}
