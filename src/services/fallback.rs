//! Deterministic, non-ML substitutes used when a capability backend is
//! unavailable. Everything here is a pure function of the file name, so a
//! fully degraded session still produces stable, repeatable analyses.

use crate::core::image::{BoundingBox, Classification, FaceInfo, NsfwPrediction};

/// Filename substrings mapped to a stand-in classification label. Checked in
/// order; first hit wins.
const LABEL_KEYWORDS: &[(&str, &str)] = &[
    ("screenshot", "computer screen"),
    ("screen", "computer screen"),
    ("landscape", "nature landscape"),
    ("nature", "nature landscape"),
    ("mountain", "nature landscape"),
    ("beach", "nature landscape"),
    ("food", "food dish"),
    ("meal", "food dish"),
    ("recipe", "food dish"),
    ("painting", "art painting"),
    ("art", "art painting"),
    ("dog", "pet animal"),
    ("cat", "pet animal"),
    ("pet", "pet animal"),
    ("car", "car vehicle"),
    ("vehicle", "car vehicle"),
    ("building", "building architecture"),
    ("house", "building architecture"),
];

const FACE_KEYWORDS: &[&str] = &["selfie", "portrait", "face", "me_"];

/// Confidence attached to keyword-derived guesses; low enough to read as a
/// heuristic in any report.
const FALLBACK_SCORE: f32 = 0.4;

pub fn classify_from_name(file_name: &str) -> Vec<Classification> {
    let lower = file_name.to_lowercase();
    for (keyword, label) in LABEL_KEYWORDS {
        if lower.contains(keyword) {
            return vec![Classification {
                label: (*label).to_string(),
                score: FALLBACK_SCORE,
            }];
        }
    }
    vec![Classification {
        label: "photo".to_string(),
        score: 0.2,
    }]
}

pub fn caption_from_name(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    let cleaned: String = stem
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "an image".to_string()
    } else {
        format!("an image named {}", cleaned)
    }
}

/// Presence-only face guess: a filename that looks like a selfie yields one
/// synthetic full-frame face, anything else none.
pub fn faces_from_name(file_name: &str, width: u32, height: u32) -> Vec<FaceInfo> {
    let lower = file_name.to_lowercase();
    if FACE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        vec![FaceInfo {
            age: None,
            gender: None,
            expression: None,
            confidence: FALLBACK_SCORE,
            bbox: BoundingBox {
                x: 0.0,
                y: 0.0,
                width: width as f32,
                height: height as f32,
            },
        }]
    } else {
        Vec::new()
    }
}

/// Without a detector there is nothing to go on; assume safe.
pub fn neutral_nsfw() -> Vec<NsfwPrediction> {
    vec![NsfwPrediction {
        class_name: "neutral".to_string(),
        probability: 1.0,
    }]
}
