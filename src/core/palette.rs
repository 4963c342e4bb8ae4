use image::imageops::FilterType;
use image::DynamicImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Working resolution pixels are sampled at before clustering.
pub const PALETTE_DIM: u32 = 150;

/// Default number of colors in an extracted palette.
pub const PALETTE_K: usize = 5;

/// Fixed k-means iteration count. There is no convergence check; the cost
/// is bounded by design, not the clustering optimality.
pub const KMEANS_ITERATIONS: usize = 20;

/// Pixels with alpha below this are excluded from sampling.
const ALPHA_CUTOFF: u8 = 128;

/// Fixed RNG seed so centroid initialization, and therefore the whole
/// extraction, is deterministic for identical input.
const KMEANS_SEED: u64 = 0x70686f_746f;

/// Clusters sampled pixel colors into `k` representative colors via k-means
/// in RGB space, returning them as `#rrggbb` strings.
pub struct PaletteExtractor {
    k: usize,
}

impl PaletteExtractor {
    pub fn new() -> Self {
        Self { k: PALETTE_K }
    }

    pub fn with_k(k: usize) -> Self {
        Self { k }
    }

    pub fn extract(&self, image: &DynamicImage) -> Vec<String> {
        if self.k == 0 || image.width() == 0 || image.height() == 0 {
            return Vec::new();
        }

        let rgba = image
            .resize_exact(PALETTE_DIM, PALETTE_DIM, FilterType::Triangle)
            .to_rgba8();

        let mut pixels: Vec<[f64; 3]> = rgba
            .pixels()
            .filter(|p| p[3] >= ALPHA_CUTOFF)
            .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64])
            .collect();

        // Fully transparent input: sample everything rather than nothing.
        if pixels.is_empty() {
            pixels = rgba
                .pixels()
                .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64])
                .collect();
        }

        let mut rng = StdRng::seed_from_u64(KMEANS_SEED);
        let mut centroids: Vec<[f64; 3]> = (0..self.k)
            .map(|_| pixels[rng.gen_range(0..pixels.len())])
            .collect();

        for _ in 0..KMEANS_ITERATIONS {
            let mut sums = vec![[0.0f64; 3]; self.k];
            let mut counts = vec![0usize; self.k];

            for px in &pixels {
                // Strict < keeps the lowest centroid index on distance ties.
                let mut best = 0;
                let mut best_dist = f64::INFINITY;
                for (ci, c) in centroids.iter().enumerate() {
                    let d = dist_sq(px, c);
                    if d < best_dist {
                        best_dist = d;
                        best = ci;
                    }
                }
                for ch in 0..3 {
                    sums[best][ch] += px[ch];
                }
                counts[best] += 1;
            }

            for ci in 0..self.k {
                // A centroid with no assignments stays where it is.
                if counts[ci] > 0 {
                    for ch in 0..3 {
                        centroids[ci][ch] = sums[ci][ch] / counts[ci] as f64;
                    }
                }
            }
        }

        centroids.iter().map(|c| to_hex(c)).collect()
    }
}

impl Default for PaletteExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn dist_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

fn to_hex(c: &[f64; 3]) -> String {
    let r = c[0].round().clamp(0.0, 255.0) as u8;
    let g = c[1].round().clamp(0.0, 255.0) as u8;
    let b = c[2].round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
