use burn::data::dataset::Dataset;

use crate::data::preprocessor::ImagePreprocessor;
use crate::domain::sample::LabeledImage;

/// One decoded, normalised training image.
/// `pixels` is channel-major [3, S, S] flattened.
#[derive(Debug, Clone)]
pub struct ImageSample {
    pub pixels: Vec<f32>,
    pub label:  usize,
}

pub struct ImageDataset {
    samples: Vec<ImageSample>,
}

impl ImageDataset {
    pub fn new(samples: Vec<ImageSample>) -> Self { Self { samples } }
}

impl Dataset<ImageSample> for ImageDataset {
    fn get(&self, index: usize) -> Option<ImageSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

/// Decode every image. Files that fail to decode are logged and
/// skipped so one corrupt download does not abort a training run.
pub fn decode_samples(
    images:       &[LabeledImage],
    preprocessor: &ImagePreprocessor,
) -> Vec<ImageSample> {
    let mut samples = Vec::with_capacity(images.len());
    for image in images {
        match preprocessor.load(&image.path) {
            Ok(pixels) => samples.push(ImageSample { pixels, label: image.class_index }),
            Err(e)     => tracing::warn!("Skipping '{}': {:#}", image.path.display(), e),
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_decode_skips_broken_files() {
        let tmp  = tempfile::tempdir().unwrap();
        let good = tmp.path().join("good.png");
        let bad  = tmp.path().join("bad.png");
        RgbImage::from_pixel(6, 6, Rgb([10, 20, 30])).save(&good).unwrap();
        std::fs::write(&bad, b"nope").unwrap();

        let images  = vec![LabeledImage::new(&good, 1), LabeledImage::new(&bad, 0)];
        let samples = decode_samples(&images, &ImagePreprocessor::new(4));
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].label, 1);
        assert_eq!(samples[0].pixels.len(), 48);

        let dataset = ImageDataset::new(samples);
        assert_eq!(dataset.len(), 1);
        assert!(dataset.get(1).is_none());
    }
}
