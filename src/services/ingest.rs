//! Host-boundary helpers for building [`ImageRecord`]s from disk or from
//! in-memory uploads. Record creation happens here, outside the batch
//! processor, which only ever consumes already-built records.

use crate::core::image::{ImageRecord, ImageSource};
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const SUPPORTED_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif"];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recursively collect every supported image under `dir` into fresh,
/// unprocessed records, sorted by path for a stable queue order.
pub fn collect(dir: &Path) -> Result<Vec<ImageRecord>, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::InvalidPath {
            path: dir.to_string_lossy().to_string(),
        });
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && is_supported(path) {
            paths.push(path.to_path_buf());
        }
    }
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        let metadata = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                log::warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        records.push(ImageRecord::new(
            name,
            ImageSource::Path(path),
            metadata.len(),
        ));
    }

    log::info!("ingested {} images from {}", records.len(), dir.display());
    Ok(records)
}

/// Build a record from an in-memory upload.
pub fn record_from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> ImageRecord {
    let size = bytes.len() as u64;
    ImageRecord::new(name, ImageSource::Bytes(bytes), size)
}
