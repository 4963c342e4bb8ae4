use image::imageops::FilterType;
use image::DynamicImage;

/// Side length of the downsampled grid the hash is computed over.
pub const HASH_DIM: u32 = 32;

/// Number of bits in a hash string.
pub const HASH_BITS: usize = (HASH_DIM * HASH_DIM) as usize;

/// Produces a fixed-length binary fingerprint from a downsampled image:
/// each of the 32x32 luminance samples becomes '1' if it exceeds the mean
/// luminance, else '0', in row-major order. Identical pixels always yield
/// the identical hash string.
pub struct PerceptualHasher;

impl PerceptualHasher {
    pub fn new() -> Self {
        Self
    }

    pub fn hash(&self, image: &DynamicImage) -> String {
        if image.width() == 0 || image.height() == 0 {
            return "0".repeat(HASH_BITS);
        }
        let small = image
            .resize_exact(HASH_DIM, HASH_DIM, FilterType::Triangle)
            .to_rgb8();

        let luma: Vec<f64> = small
            .pixels()
            .map(|p| (p[0] as f64 + p[1] as f64 + p[2] as f64) / 3.0)
            .collect();
        let mean = luma.iter().sum::<f64>() / luma.len() as f64;

        luma.iter()
            .map(|&v| if v > mean { '1' } else { '0' })
            .collect()
    }
}

impl Default for PerceptualHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Fraction of positions with matching bits between two equal-length hash
/// strings. Hashes of differing (or zero) length compare as 0.0 rather than
/// erroring out.
pub fn hamming_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let matching = a.bytes().zip(b.bytes()).filter(|(x, y)| x == y).count();
    matching as f64 / a.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb};

    fn checkerboard(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Rgb([230, 230, 230])
            } else {
                Rgb([20, 20, 20])
            }
        }))
    }

    #[test]
    fn hash_is_fixed_length_binary() {
        let hash = PerceptualHasher::new().hash(&checkerboard(128, 128));
        assert_eq!(hash.len(), HASH_BITS);
        assert!(hash.bytes().all(|b| b == b'0' || b == b'1'));
    }

    #[test]
    fn identical_pixels_yield_identical_hashes() {
        let hasher = PerceptualHasher::new();
        let a = checkerboard(200, 160);
        let b = checkerboard(200, 160);
        assert_eq!(hasher.hash(&a), hasher.hash(&b));
    }

    #[test]
    fn repeated_invocations_are_deterministic() {
        let hasher = PerceptualHasher::new();
        let img = checkerboard(97, 53);
        assert_eq!(hasher.hash(&img), hasher.hash(&img));
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = "1010110010";
        let b = "1010010011";
        assert_eq!(hamming_similarity(a, b), hamming_similarity(b, a));
    }

    #[test]
    fn identical_hashes_have_full_similarity() {
        let h = "1".repeat(HASH_BITS);
        assert_eq!(hamming_similarity(&h, &h), 1.0);
    }

    #[test]
    fn mismatched_lengths_compare_as_zero() {
        assert_eq!(hamming_similarity("1010", "10"), 0.0);
        assert_eq!(hamming_similarity("", ""), 0.0);
    }

    #[test]
    fn similarity_counts_matching_positions() {
        assert_eq!(hamming_similarity("1100", "1000"), 0.75);
        assert_eq!(hamming_similarity("1111", "0000"), 0.0);
    }
}
