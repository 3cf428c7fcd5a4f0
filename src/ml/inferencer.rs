// ============================================================
// Layer 5 - Inferencer
// ============================================================
// Rebuilds the trained CNN from the model directory and
// classifies single images.
//
// Loading order:
//   1. model_manifest.json → architecture (image size, widths)
//   2. class_labels.json   → output unit names
//   3. model.mpk           → weights
//
// The label count must equal the manifest's class count or the
// probabilities could not be named; that mismatch is rejected
// here rather than surfacing as a wrong answer later.

use anyhow::{bail, Result};
use burn::prelude::*;
use image::DynamicImage;

use crate::data::preprocessor::{ImagePreprocessor, CHANNELS};
use crate::domain::{labels::ClassLabels, prediction::Prediction, traits::Classifier};
use crate::infra::checkpoint::{CheckpointManager, ModelManifest};
use crate::ml::model::PlantCnn;

pub struct Inferencer<B: Backend> {
    model:        PlantCnn<B>,
    labels:       ClassLabels,
    manifest:     ModelManifest,
    preprocessor: ImagePreprocessor,
    device:       B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, device: B::Device) -> Result<Self> {
        let manifest = ckpt_manager.load_manifest()?;
        let labels   = ckpt_manager.load_labels()?;

        if labels.len() != manifest.num_classes {
            bail!(
                "Stored model has {} outputs but {} class labels; delete the model and train again",
                manifest.num_classes,
                labels.len()
            );
        }

        let model: PlantCnn<B> = manifest.model_config().init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!(
            "Pre-trained model loaded ({} classes, trained with {} images)",
            labels.len(),
            manifest.num_images
        );

        Ok(Self::from_parts(model, labels, manifest, device))
    }

    pub fn from_parts(
        model:    PlantCnn<B>,
        labels:   ClassLabels,
        manifest: ModelManifest,
        device:   B::Device,
    ) -> Self {
        let preprocessor = ImagePreprocessor::new(manifest.image_size);
        Self { model, labels, manifest, preprocessor, device }
    }

    /// Softmax distribution over the stored labels.
    pub fn probabilities(&self, image: &DynamicImage) -> Vec<f32> {
        let side   = self.preprocessor.image_size();
        let pixels = self.preprocessor.to_pixels(image);
        let input  = Tensor::<B, 1>::from_floats(pixels.as_slice(), &self.device)
            .reshape([1, CHANNELS, side, side]);

        // [1, num_classes] → num_classes values
        self.model.probabilities(input).into_data().iter::<f32>().collect()
    }
}

impl<B: Backend> Classifier for Inferencer<B> {
    fn classify(&self, image: &DynamicImage, invasive_label: &str) -> Result<Prediction> {
        let probs = self.probabilities(image);
        let prediction = Prediction::from_probabilities(
            &self.labels,
            &probs,
            self.manifest.num_images,
            invasive_label,
        )?;
        tracing::debug!("Predicted '{}' ({:.2}%)", prediction.label, prediction.confidence);
        Ok(prediction)
    }

    fn labels(&self) -> &ClassLabels {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::DEFAULT_INVASIVE_LABEL;
    use crate::ml::model::PlantCnnConfig;
    use burn::backend::NdArray;
    use image::{Rgb, RgbImage};

    fn manifest(num_classes: usize) -> ModelManifest {
        ModelManifest {
            image_size:    12,
            hidden_size:   4,
            num_classes,
            num_images:    6,
            epochs:        1,
            batch_size:    2,
            learning_rate: 1e-3,
        }
    }

    fn labels() -> ClassLabels {
        ClassLabels::new(vec!["Invasive Species".into(), "Native".into()]).unwrap()
    }

    #[test]
    fn test_classify_returns_distribution_over_stored_labels() {
        let device = Default::default();
        let m      = manifest(2);
        let model: PlantCnn<NdArray> = m.model_config().init(&device);
        let inferencer = Inferencer::from_parts(model, labels(), m, device);

        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(30, 20, Rgb([0, 128, 0])));
        let p = inferencer.classify(&image, DEFAULT_INVASIVE_LABEL).unwrap();

        let total: f32 = p.probabilities.iter().map(|c| c.probability).sum();
        assert!((total - 100.0).abs() < 1e-2);
        assert!(labels().iter().any(|l| l == p.label));
        assert_eq!(p.trained_with, 6);
        assert_eq!(p.invasive, p.label == "Invasive Species");
    }

    #[test]
    fn test_round_trip_through_checkpoint() {
        let tmp    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(tmp.path());
        let device = Default::default();
        let m      = manifest(2);

        let model: PlantCnn<NdArray> = PlantCnnConfig::new(2)
            .with_image_size(12)
            .with_hidden_size(4)
            .init(&device);
        ckpt.save_model(&model).unwrap();
        ckpt.save_labels(&labels()).unwrap();
        ckpt.save_manifest(&m).unwrap();

        let loaded = Inferencer::<NdArray>::from_checkpoint(&ckpt, device).unwrap();
        assert_eq!(loaded.labels(), &labels());
        let image = DynamicImage::ImageRgb8(RgbImage::new(12, 12));
        let p = loaded.classify(&image, DEFAULT_INVASIVE_LABEL).unwrap();
        assert_eq!(p.trained_with, 6);
    }

    #[test]
    fn test_label_count_mismatch_is_rejected() {
        let tmp  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(tmp.path());
        ckpt.save_labels(&labels()).unwrap();
        ckpt.save_manifest(&manifest(3)).unwrap();

        let err = Inferencer::<NdArray>::from_checkpoint(&ckpt, Default::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("class labels"));
    }
}
