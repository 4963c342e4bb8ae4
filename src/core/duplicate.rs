use crate::core::phash::hamming_similarity;
use serde::{Deserialize, Serialize};

/// Two hashes must match in more than this fraction of bit positions to be
/// grouped together.
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

/// Fixed similarity score attached to every emitted group.
pub const GROUP_SCORE: f64 = 0.9;

/// A set of at least two images considered near-duplicates of each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub image_ids: Vec<String>,
    pub similarity: f64,
}

/// Groups images whose perceptual hashes are sufficiently similar.
///
/// This is a single greedy pass, not transitive-closure clustering: each
/// not-yet-grouped image seeds a group and absorbs every later ungrouped
/// image directly similar to the seed. Two images that are each similar to a
/// common third, but not to each other, can land in different groups
/// depending on submission order. That order dependence is the documented
/// policy.
pub struct DuplicateGrouper {
    threshold: f64,
}

impl DuplicateGrouper {
    pub fn new() -> Self {
        Self {
            threshold: SIMILARITY_THRESHOLD,
        }
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Takes `(image id, perceptual hash)` pairs in submission order and
    /// returns the emitted groups. Groups with a single member are dropped.
    pub fn group(&self, hashes: &[(String, String)]) -> Vec<DuplicateGroup> {
        let mut grouped = vec![false; hashes.len()];
        let mut groups = Vec::new();

        for i in 0..hashes.len() {
            if grouped[i] {
                continue;
            }
            let mut members = vec![hashes[i].0.clone()];
            for j in i + 1..hashes.len() {
                if grouped[j] {
                    continue;
                }
                if hamming_similarity(&hashes[i].1, &hashes[j].1) > self.threshold {
                    members.push(hashes[j].0.clone());
                    grouped[j] = true;
                }
            }
            if members.len() > 1 {
                grouped[i] = true;
                groups.push(DuplicateGroup {
                    image_ids: members,
                    similarity: GROUP_SCORE,
                });
            }
        }

        groups
    }
}

impl Default for DuplicateGrouper {
    fn default() -> Self {
        Self::new()
    }
}
