// ============================================================
// Layer 2 - PredictUseCase
// ============================================================
// Loads the stored model once, then classifies images:
//
//   1. Check a trained model exists      (Layer 6 - infra)
//   2. Rebuild it on the chosen device   (Layer 5 - ml)
//   3. Open the image, apply any edits   (Layer 4 - data)
//   4. Classify the in-memory image      (Layer 5 - ml)
//
// Edits are applied in memory, so "rotate then predict" never
// writes a temporary file.

use anyhow::{bail, Result};
use std::path::Path;

use crate::data::editor;
use crate::domain::{edit::EditOp, prediction::Prediction, traits::Classifier};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::device::{load_classifier, ComputeDevice};

pub struct PredictUseCase {
    classifier:     Box<dyn Classifier>,
    invasive_label: String,
}

impl PredictUseCase {
    pub fn new(
        model_dir:      impl AsRef<Path>,
        device:         ComputeDevice,
        invasive_label: impl Into<String>,
    ) -> Result<Self> {
        let ckpt = CheckpointManager::new(model_dir.as_ref());
        if !ckpt.exists() {
            bail!(
                "No trained model found in '{}'. Run 'train' first.",
                ckpt.dir().display()
            );
        }
        let classifier = load_classifier(device, &ckpt)?;
        Ok(Self::with_classifier(classifier, invasive_label))
    }

    pub fn with_classifier(classifier: Box<dyn Classifier>, invasive_label: impl Into<String>) -> Self {
        Self { classifier, invasive_label: invasive_label.into() }
    }

    pub fn predict(&self, image_path: &Path, edits: &[EditOp]) -> Result<Prediction> {
        tracing::info!("Uploaded image: {}", image_path.display());
        let image = editor::open(image_path)?;
        let image = editor::apply_all(image, edits);
        self.classifier.classify(&image, &self.invasive_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{
        fixtures::{tiny_config, write_training_folder},
        train_use_case::TrainUseCase,
    };
    use crate::domain::prediction::DEFAULT_INVASIVE_LABEL;

    #[test]
    fn test_missing_model_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let err = PredictUseCase::new(tmp.path().join("model"), ComputeDevice::Cpu, DEFAULT_INVASIVE_LABEL)
            .err()
            .unwrap();
        assert!(err.to_string().contains("Run 'train' first"));
    }

    #[test]
    fn test_train_then_predict_uses_stored_labels() {
        let tmp   = tempfile::tempdir().unwrap();
        let data  = tmp.path().join("training");
        let model = tmp.path().join("model");
        write_training_folder(&data, 3);
        TrainUseCase::new(tiny_config(&data, &model)).execute().unwrap();

        let use_case = PredictUseCase::new(&model, ComputeDevice::Cpu, DEFAULT_INVASIVE_LABEL).unwrap();
        let image = data.join("Native/0.png");

        let p = use_case.predict(&image, &[]).unwrap();
        assert!(p.label == "Invasive Species" || p.label == "Native");
        assert_eq!(p.trained_with, 6);
        assert_eq!(p.probabilities.len(), 2);
        assert_eq!(p.invasive, p.label == "Invasive Species");

        let edited = use_case.predict(&image, &[EditOp::RotateLeft, EditOp::Mirror]).unwrap();
        assert_eq!(edited.probabilities.len(), 2);
    }

    #[test]
    fn test_unreadable_image_is_an_error() {
        let tmp   = tempfile::tempdir().unwrap();
        let data  = tmp.path().join("training");
        let model = tmp.path().join("model");
        write_training_folder(&data, 2);
        TrainUseCase::new(tiny_config(&data, &model)).execute().unwrap();

        let use_case = PredictUseCase::new(&model, ComputeDevice::Cpu, DEFAULT_INVASIVE_LABEL).unwrap();
        assert!(use_case.predict(&tmp.path().join("missing.jpg"), &[]).is_err());
    }
}
