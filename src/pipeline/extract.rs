use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, RgbaImage};
use kmeans_colors::get_kmeans_hamerly;
use palette::{IntoColor, Lab, Srgb};
use tracing::debug;

use super::sort::sort_perceptually_by;
use crate::color::Color;
use crate::model::MAXIMUM_PALETTE_COLORS;

/// A color extracted from the image with its cluster weight.
#[derive(Debug, Clone)]
pub struct ExtractedColor {
    pub color: Color,
    pub weight: f32,
}

/// Colours extracted when the user has no saved preference.
pub const DEFAULT_EXTRACT_COUNT: usize = 8;

const MAX_ITER: usize = 20;
const CONVERGE: f32 = 5.0;
const DEDUP_THRESHOLD: f32 = 25.0; // ΔE² < 25 means ΔE < 5
const MIN_ALPHA: u8 = 125;
const SEED: u64 = 42;

/// Clamp a requested colour count to what a palette can hold.
pub fn clamp_count(count: usize) -> usize {
    count.clamp(1, MAXIMUM_PALETTE_COLORS)
}

/// Decode an image file.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).with_context(|| {
        if !path.exists() {
            format!("file not found: {}", path.display())
        } else {
            format!(
                "unsupported or corrupt image: {}. Supported formats: PNG, JPEG, WebP, BMP, TIFF, GIF",
                path.display()
            )
        }
    })
}

/// Decode an image already held in memory.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).context("unsupported or corrupt image data")
}

/// Convert every visible pixel to CIELAB. Mostly transparent pixels are skipped.
pub fn prepare_pixels(img: &DynamicImage) -> Vec<Lab> {
    let rgba: RgbaImage = img.to_rgba8();
    rgba.pixels()
        .filter(|p| p[3] >= MIN_ALPHA)
        .map(|p| {
            let srgb: Srgb<f32> = Srgb::new(p[0], p[1], p[2]).into_format();
            srgb.into_color()
        })
        .collect()
}

/// Run K-means on LAB pixels to extract up to `k` dominant colors.
///
/// Returns deduplicated colors sorted by weight (descending).
/// Uses Hamerly's algorithm with K-means++ initialization.
pub fn extract_colors(pixels: &[Lab], k: usize) -> Vec<ExtractedColor> {
    let k = distinct_at_most(pixels, k);
    if k == 0 {
        return Vec::new();
    }
    let result = get_kmeans_hamerly(k, MAX_ITER, CONVERGE, false, pixels, SEED);

    let total = pixels.len() as f32;

    // Count pixels per centroid to compute weights
    let mut counts = vec![0u32; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    let mut colors: Vec<ExtractedColor> = result
        .centroids
        .iter()
        .enumerate()
        .filter(|(i, _)| counts[*i] > 0)
        .map(|(i, lab)| ExtractedColor {
            color: Color::from_lab(*lab),
            weight: counts[i] as f32 / total,
        })
        .collect();

    deduplicate(&mut colors);

    colors.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    colors
}

/// Number of distinct pixels, counting no further than `limit`.
///
/// K-means++ seeding needs at least `k` distinct points.
fn distinct_at_most(pixels: &[Lab], limit: usize) -> usize {
    let mut seen = HashSet::new();
    for p in pixels {
        if seen.len() >= limit {
            break;
        }
        seen.insert([p.l.to_bits(), p.a.to_bits(), p.b.to_bits()]);
    }
    seen.len()
}

/// Merge colors that are too similar (ΔE < 5 in LAB space).
/// Keeps the first color and accumulates the weight.
fn deduplicate(colors: &mut Vec<ExtractedColor>) {
    let mut i = 0;
    while i < colors.len() {
        let mut j = i + 1;
        while j < colors.len() {
            let lab_i = colors[i].color.to_lab();
            let lab_j = colors[j].color.to_lab();
            let delta_e_sq = (lab_i.l - lab_j.l).powi(2)
                + (lab_i.a - lab_j.a).powi(2)
                + (lab_i.b - lab_j.b).powi(2);
            if delta_e_sq < DEDUP_THRESHOLD {
                colors[i].weight += colors[j].weight;
                colors.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

/// Extract up to `count` colours from a decoded image, in perceptual order, as
/// uppercase `#RRGGBB` strings ready for a palette.
///
/// Fewer than `count` come back when the image has fewer distinct colours, and none
/// at all when every pixel is transparent. Feeding an empty list to
/// [`Action::ReplaceColors`](crate::model::Action::ReplaceColors) leaves the palette
/// with the single white default.
pub fn extract_palette_colors(img: &DynamicImage, count: usize) -> Vec<String> {
    let count = clamp_count(count);
    let pixels = prepare_pixels(img);
    let mut colors = extract_colors(&pixels, count);
    sort_perceptually_by(&mut colors, |c| c.color);
    debug!(
        requested = count,
        extracted = colors.len(),
        pixels = pixels.len(),
        "extracted palette colours"
    );
    colors.into_iter().map(|c| c.color.to_hex()).collect()
}
