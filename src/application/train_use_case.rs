// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Scan the training folder     (Layer 4 - data)
//   Step 2: Decode + normalise images    (Layer 4 - data)
//   Step 3: Split train/validation       (Layer 4 - data)
//   Step 4: Build Burn datasets          (Layer 4 - data)
//   Step 5: Replace any previous model,
//           write labels + manifest      (Layer 6 - infra)
//   Step 6: Run training loop            (Layer 5 - ml)
//
// Labels and manifest go down before the first epoch, so weights
// saved at the end of any finished epoch are loadable even if
// the run is interrupted later.
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::{decode_samples, ImageDataset},
    loader::TrainingFolder,
    preprocessor::ImagePreprocessor,
    splitter::split_train_val,
};
use crate::domain::{labels::ClassLabels, traits::ImageSource};
use crate::infra::{
    checkpoint::{CheckpointManager, ModelManifest},
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::{
    device::{run_training, ComputeDevice},
    model::{PlantCnnConfig, MIN_IMAGE_SIZE},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. The defaults are the
// classic small-CNN recipe: 150x150 RGB input, batch 32, five
// epochs of Adam at 1e-3, no validation hold-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:     String,
    pub model_dir:    String,
    pub image_size:   usize,
    pub hidden_size:  usize,
    pub batch_size:   usize,
    pub epochs:       usize,
    pub lr:           f64,
    /// Fraction of images held out for validation, in [0, 1)
    pub val_fraction: f64,
    pub seed:         u64,
    #[serde(skip)]
    pub device:       ComputeDevice,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:     "training".to_string(),
            model_dir:    "model".to_string(),
            image_size:   150,
            hidden_size:  128,
            batch_size:   32,
            epochs:       5,
            lr:           1e-3,
            val_fraction: 0.0,
            seed:         42,
            device:       ComputeDevice::default(),
        }
    }
}

impl TrainConfig {
    pub fn model_config(&self, num_classes: usize) -> PlantCnnConfig {
        PlantCnnConfig::new(num_classes)
            .with_image_size(self.image_size)
            .with_hidden_size(self.hidden_size)
    }

    fn validate(&self) -> Result<()> {
        if self.image_size < MIN_IMAGE_SIZE {
            bail!("--image-size must be at least {MIN_IMAGE_SIZE}");
        }
        if self.batch_size == 0 || self.epochs == 0 || self.hidden_size == 0 {
            bail!("--batch-size, --epochs and --hidden-size must be positive");
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            bail!("--lr must be positive");
        }
        if !(0.0..1.0).contains(&self.val_fraction) {
            bail!("--val-fraction must be in [0, 1)");
        }
        Ok(())
    }
}

/// What a finished run reports back to the CLI.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub labels:     ClassLabels,
    pub num_images: usize,
    pub history:    Vec<EpochMetrics>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Scan the folder of class folders ──────────────────────────
        tracing::info!("Loading training images from '{}'", cfg.data_dir);
        let corpus = TrainingFolder::new(&cfg.data_dir).load_all()?;
        tracing::info!("Decoding {} images", corpus.image_count());
        for (label, count) in corpus.labels.iter().zip(corpus.class_counts()) {
            tracing::info!("  {}: {} images", label, count);
        }

        // ── Step 2: Decode and normalise ──────────────────────────────────────
        let preprocessor = ImagePreprocessor::new(cfg.image_size);
        let samples      = decode_samples(&corpus.images, &preprocessor);
        if samples.is_empty() {
            bail!("None of the images in '{}' could be decoded", cfg.data_dir);
        }

        // ── Step 3: Train / validation split ──────────────────────────────────
        let (train_samples, val_samples) = split_train_val(samples, 1.0 - cfg.val_fraction, cfg.seed);
        if train_samples.is_empty() {
            bail!("Validation split left no images to train on; lower --val-fraction");
        }
        let num_images = train_samples.len();
        tracing::info!("Total images used for training: {}", num_images);
        if !val_samples.is_empty() {
            tracing::info!("Held out {} images for validation", val_samples.len());
        }

        // ── Step 4: Build Burn datasets ───────────────────────────────────────
        let train_dataset = ImageDataset::new(train_samples);
        let val_dataset   = ImageDataset::new(val_samples);

        // ── Step 5: Replace the previous model ────────────────────────────────
        let (ckpt_manager, metrics) = prepare_model_dir(cfg, &corpus.labels, num_images)?;

        // ── Step 6: Train ─────────────────────────────────────────────────────
        let model_cfg = cfg.model_config(corpus.labels.len());
        let history = run_training(
            cfg.device,
            cfg,
            &model_cfg,
            train_dataset,
            val_dataset,
            &ckpt_manager,
            &metrics,
        )?;

        Ok(TrainReport { labels: corpus.labels, num_images, history })
    }
}

/// Clear the old artifacts, then write everything a loadable model
/// needs except the weights. Returns the store and a fresh metrics log.
fn prepare_model_dir(
    cfg:        &TrainConfig,
    labels:     &ClassLabels,
    num_images: usize,
) -> Result<(CheckpointManager, MetricsLogger)> {
    let ckpt_manager = CheckpointManager::new(&cfg.model_dir);
    ckpt_manager.delete()?;

    ckpt_manager.save_labels(labels)?;
    ckpt_manager.save_manifest(&ModelManifest {
        image_size:    cfg.image_size,
        hidden_size:   cfg.hidden_size,
        num_classes:   labels.len(),
        num_images,
        epochs:        cfg.epochs,
        batch_size:    cfg.batch_size,
        learning_rate: cfg.lr,
    })?;

    let metrics = MetricsLogger::create(&cfg.model_dir)?;
    Ok((ckpt_manager, metrics))
}
