use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-run configuration: which analysis stages are enabled, plus the NSFW
/// probability threshold. The perceptual hash is computed whenever duplicate
/// detection is on, since grouping is its only consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiSettings {
    pub run_classifier: bool,
    pub run_captioner: bool,
    pub run_object_detection: bool,
    pub run_nsfw: bool,
    pub nsfw_threshold: f32,
    pub run_face_detection: bool,
    pub run_ocr: bool,
    pub run_duplicate_detection: bool,
    pub run_quality_analysis: bool,
    pub run_color_palette: bool,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            run_classifier: true,
            run_captioner: true,
            run_object_detection: true,
            run_nsfw: true,
            nsfw_threshold: 0.7,
            run_face_detection: true,
            run_ocr: true,
            run_duplicate_detection: true,
            run_quality_analysis: true,
            run_color_palette: true,
        }
    }
}

impl AiSettings {
    /// Load settings from a JSON file; unknown stages keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Everything off; useful as a baseline for hosts that opt stages in.
    pub fn disabled() -> Self {
        Self {
            run_classifier: false,
            run_captioner: false,
            run_object_detection: false,
            run_nsfw: false,
            nsfw_threshold: 0.7,
            run_face_detection: false,
            run_ocr: false,
            run_duplicate_detection: false,
            run_quality_analysis: false,
            run_color_palette: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_enable_everything_at_the_standard_threshold() {
        let settings = AiSettings::default();
        assert!(settings.run_classifier);
        assert!(settings.run_duplicate_detection);
        assert!((settings.nsfw_threshold - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = serde_json::to_string(&AiSettings::default()).unwrap();
        assert!(json.contains("\"runClassifier\""));
        assert!(json.contains("\"nsfwThreshold\""));
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{"runOcr": false, "nsfwThreshold": 0.5}"#).unwrap();

        let settings = AiSettings::from_json_file(&path).unwrap();
        assert!(!settings.run_ocr);
        assert!((settings.nsfw_threshold - 0.5).abs() < f32::EPSILON);
        assert!(settings.run_classifier);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            AiSettings::from_json_file(&path),
            Err(SettingsError::Parse(_))
        ));
    }
}
