use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Images are sampled at no more than this dimension before metrics are
/// computed; larger inputs are resized down first.
pub const QUALITY_MAX_DIM: u32 = 400;

/// Brightness, contrast, sharpness and a composite score, all in [0, 1] and
/// rounded to 3 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub sharpness: f64,
    pub contrast: f64,
    pub brightness: f64,
    pub score: f64,
}

/// Computes brightness/contrast/sharpness from raw pixel samples. There is no
/// error path; degenerate inputs (1x1, uniform color) yield zero contrast and
/// sharpness rather than dividing by zero.
pub struct QualityAnalyzer;

impl QualityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, image: &DynamicImage) -> QualityMetrics {
        let sampled = if image.width() > QUALITY_MAX_DIM || image.height() > QUALITY_MAX_DIM {
            image.resize(QUALITY_MAX_DIM, QUALITY_MAX_DIM, FilterType::Triangle)
        } else {
            image.clone()
        };
        let rgb = sampled.to_rgb8();
        let (width, height) = rgb.dimensions();

        // Luminance as the plain mean of the three channels.
        let luma: Vec<f64> = rgb
            .pixels()
            .map(|p| (p[0] as f64 + p[1] as f64 + p[2] as f64) / 3.0)
            .collect();

        if luma.is_empty() {
            return QualityMetrics {
                sharpness: 0.0,
                contrast: 0.0,
                brightness: 0.0,
                score: 0.0,
            };
        }

        let n = luma.len() as f64;
        let mean = luma.iter().sum::<f64>() / n;
        let variance = luma.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;

        let brightness = mean / 255.0;
        let contrast = variance.sqrt() / 255.0;
        let sharpness = Self::sobel_edge_density(&luma, width, height);

        // Composite: closeness to mid-gray, doubled contrast capped at 1,
        // and edge density, averaged.
        let brightness_score = 1.0 - (mean - 128.0).abs() / 128.0;
        let contrast_score = (contrast * 2.0).min(1.0);
        let score = (brightness_score + contrast_score + sharpness) / 3.0;

        QualityMetrics {
            sharpness: round3(sharpness),
            contrast: round3(contrast),
            brightness: round3(brightness),
            score: round3(score),
        }
    }

    /// 3x3 Sobel gradient magnitude accumulated over interior pixels,
    /// normalized by `width * height * 255` and clamped to [0, 1].
    fn sobel_edge_density(luma: &[f64], width: u32, height: u32) -> f64 {
        if width < 3 || height < 3 {
            return 0.0;
        }
        let w = width as usize;
        let h = height as usize;
        let at = |x: usize, y: usize| luma[y * w + x];

        let mut total = 0.0;
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let gx = -at(x - 1, y - 1) + at(x + 1, y - 1) - 2.0 * at(x - 1, y)
                    + 2.0 * at(x + 1, y)
                    - at(x - 1, y + 1)
                    + at(x + 1, y + 1);
                let gy = -at(x - 1, y - 1) - 2.0 * at(x, y - 1) - at(x + 1, y - 1)
                    + at(x - 1, y + 1)
                    + 2.0 * at(x, y + 1)
                    + at(x + 1, y + 1);
                total += (gx * gx + gy * gy).sqrt();
            }
        }

        (total / (w as f64 * h as f64 * 255.0)).clamp(0.0, 1.0)
    }
}

impl Default for QualityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
