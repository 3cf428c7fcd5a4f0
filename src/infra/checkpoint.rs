// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Owns the model directory and everything in it:
//
//   model/
//     model.mpk             ← CNN weights (Burn CompactRecorder)
//     class_labels.json     ← ["Invasive Species", "Native", ...]
//     model_manifest.json   ← architecture + training summary
//     metrics.csv           ← written by MetricsLogger
//
// Why save the manifest separately?
//   The weights file does not describe the architecture. To
//   load it we first rebuild a PlantCnn with the same image
//   size, dense width and class count, then pour the weights in.
//
// Burn's CompactRecorder:
//   - Serialises model parameters to MessagePack
//   - Stores floats at half precision
//   - Type-safe: loading fails if the architecture differs
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::labels::ClassLabels;
use crate::ml::model::{PlantCnn, PlantCnnConfig};

const MODEL_STEM:    &str = "model";
const MODEL_FILE:    &str = "model.mpk";
const LABELS_FILE:   &str = "class_labels.json";
const MANIFEST_FILE: &str = "model_manifest.json";
pub const METRICS_FILE: &str = "metrics.csv";

/// What the inferencer needs to rebuild the model, plus a short
/// summary of how it was trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub image_size:    usize,
    pub hidden_size:   usize,
    pub num_classes:   usize,
    /// Images that actually went into training (after decoding
    /// failures and the validation hold-out)
    pub num_images:    usize,
    pub epochs:        usize,
    pub batch_size:    usize,
    pub learning_rate: f64,
}

impl ModelManifest {
    pub fn model_config(&self) -> PlantCnnConfig {
        PlantCnnConfig::new(self.num_classes)
            .with_image_size(self.image_size)
            .with_hidden_size(self.hidden_size)
    }
}

/// Manages saving, loading and deleting the model artifacts.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Nothing is created until the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.dir.join(LABELS_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    /// A model is usable when both the weights and the labels exist.
    pub fn exists(&self) -> bool {
        self.model_path().is_file() && self.labels_path().is_file()
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create model directory '{}'", self.dir.display()))
    }

    /// Write the weights, replacing any previous file.
    pub fn save_model<B: Backend>(&self, model: &PlantCnn<B>) -> Result<()> {
        self.ensure_dir()?;
        // The recorder appends the .mpk extension itself.
        let path = self.dir.join(MODEL_STEM);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save model to '{}'", path.display()))?;

        tracing::debug!("Saved weights to '{}'", self.model_path().display());
        Ok(())
    }

    /// Load stored weights into a freshly built model of the same
    /// architecture.
    pub fn load_model<B: Backend>(
        &self,
        model:  PlantCnn<B>,
        device: &B::Device,
    ) -> Result<PlantCnn<B>> {
        let path = self.dir.join(MODEL_STEM);

        let record = CompactRecorder::new()
            .load(path, device)
            .with_context(|| {
                format!(
                    "Cannot load model weights from '{}'. Have you trained a model first?",
                    self.model_path().display()
                )
            })?;

        Ok(model.load_record(record))
    }

    pub fn save_labels(&self, labels: &ClassLabels) -> Result<()> {
        self.write_json(&self.labels_path(), labels)
    }

    pub fn load_labels(&self) -> Result<ClassLabels> {
        self.read_json(&self.labels_path())
    }

    pub fn save_manifest(&self, manifest: &ModelManifest) -> Result<()> {
        self.write_json(&self.manifest_path(), manifest)
    }

    pub fn load_manifest(&self) -> Result<ModelManifest> {
        self.read_json(&self.manifest_path())
    }

    /// Remove every artifact that exists. Returns the removed paths.
    /// Deleting an absent model is not an error.
    pub fn delete(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for name in [MODEL_FILE, LABELS_FILE, MANIFEST_FILE, METRICS_FILE] {
            let path = self.dir.join(name);
            if path.is_file() {
                fs::remove_file(&path)
                    .with_context(|| format!("Cannot delete '{}'", path.display()))?;
                tracing::debug!("Deleted '{}'", path.display());
                removed.push(path);
            }
        }

        // Leave the directory alone if the user keeps other files in it.
        if self.dir.is_dir() && fs::read_dir(&self.dir)?.next().is_none() {
            fs::remove_dir(&self.dir)
                .with_context(|| format!("Cannot remove '{}'", self.dir.display()))?;
        }
        Ok(removed)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Wrote '{}'", path.display());
        Ok(())
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<T> {
        let json = fs::read_to_string(path).with_context(|| {
            format!(
                "Cannot read '{}'. Make sure you have run 'train' before 'predict'.",
                path.display()
            )
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("'{}' is not valid", path.display()))
    }
}
