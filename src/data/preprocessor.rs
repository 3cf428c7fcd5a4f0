// ============================================================
// Layer 4 - Image Preprocessor
// ============================================================
// Turns a decoded image into the flat float buffer the CNN
// expects. Training and prediction both go through here so the
// model always sees pixels prepared the same way.
//
// Steps (applied in order):
//   1. Resize to image_size x image_size, nearest-neighbour
//   2. Drop alpha / expand grey to RGB
//   3. Rescale each channel from [0, 255] to [0, 1]
//   4. Lay out channel-major: all R, then all G, then all B
//
// Output length is always 3 * image_size * image_size.

use anyhow::{Context, Result};
use image::{imageops::FilterType, DynamicImage};
use std::path::Path;

/// Number of colour channels fed to the network.
pub const CHANNELS: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct ImagePreprocessor {
    image_size: usize,
}

impl ImagePreprocessor {
    pub fn new(image_size: usize) -> Self {
        Self { image_size }
    }

    pub fn image_size(&self) -> usize {
        self.image_size
    }

    /// Length of the buffer produced by `to_pixels`.
    pub fn pixel_count(&self) -> usize {
        CHANNELS * self.image_size * self.image_size
    }

    /// Decode an image file and prepare it.
    pub fn load(&self, path: &Path) -> Result<Vec<f32>> {
        let img = image::open(path)
            .with_context(|| format!("Cannot decode image '{}'", path.display()))?;
        Ok(self.to_pixels(&img))
    }

    pub fn to_pixels(&self, img: &DynamicImage) -> Vec<f32> {
        let side = self.image_size as u32;
        let rgb  = img.resize_exact(side, side, FilterType::Nearest).to_rgb8();

        let plane = self.image_size * self.image_size;
        let mut pixels = vec![0.0f32; self.pixel_count()];
        for (i, px) in rgb.pixels().enumerate() {
            for c in 0..CHANNELS {
                pixels[c * plane + i] = px[c] as f32 / 255.0;
            }
        }
        pixels
    }
}
