// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Mini-batch training of the PlantCnn with Adam and categorical
// cross-entropy, using Burn's DataLoader.
//
// Per epoch:
//   1. Shuffle, batch, forward, backward, Adam step
//   2. Optional validation pass on model.valid() (no autodiff)
//   3. Print "Epoch N: Loss = x, Accuracy = y%"
//   4. Append the epoch to metrics.csv
//   5. Overwrite the stored weights with this epoch's model
//
// Generic over AutodiffBackend so the same loop runs on the
// Wgpu backend in production and on NdArray in tests.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::ImageBatcher, dataset::ImageDataset};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::model::{PlantCnn, PlantCnnConfig};

pub fn train_loop<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    model_cfg:     &PlantCnnConfig,
    train_dataset: ImageDataset,
    val_dataset:   ImageDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
    device:        B::Device,
) -> Result<Vec<EpochMetrics>> {

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: PlantCnn<B> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} classes, {}x{} input, dense width {}",
        model_cfg.num_classes, model_cfg.image_size, model_cfg.image_size, model_cfg.hidden_size,
    );

    let mut optim = AdamConfig::new().with_epsilon(1e-7).init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = ImageBatcher::<B>::new(device.clone(), cfg.image_size);
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend - no autodiff overhead) ──────────
    let val_loader = if val_dataset.is_empty() {
        None
    } else {
        let val_batcher = ImageBatcher::<B::InnerBackend>::new(device.clone(), cfg.image_size);
        Some(
            DataLoaderBuilder::new(val_batcher)
                .batch_size(cfg.batch_size)
                .num_workers(1)
                .build(val_dataset),
        )
    };

    let mut history = Vec::with_capacity(cfg.epochs);

    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;
        let mut correct  = 0usize;
        let mut seen     = 0usize;

        for batch in train_loader.iter() {
            let targets = batch.targets.clone();
            let (loss, logits) = model.forward_loss(batch.images, batch.targets);

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;
            seen     += targets.dims()[0];
            correct  += count_correct(logits, targets);

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let train_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
        let train_acc  = if seen > 0 { correct as f64 / seen as f64 } else { 0.0 };

        // ── Validation phase ──────────────────────────────────────────────────
        let (val_loss, val_acc) = match &val_loader {
            Some(loader) => {
                let model_valid = model.valid();
                let mut loss_sum = 0.0f64;
                let mut batches  = 0usize;
                let mut correct  = 0usize;
                let mut seen     = 0usize;

                for batch in loader.iter() {
                    let targets = batch.targets.clone();
                    let (loss, logits) = model_valid.forward_loss(batch.images, batch.targets);
                    loss_sum += loss.into_scalar().elem::<f64>();
                    batches  += 1;
                    seen     += targets.dims()[0];
                    correct  += count_correct(logits, targets);
                }

                let loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
                let acc  = if seen > 0 { correct as f64 / seen as f64 } else { 0.0 };
                (Some(loss), Some(acc))
            }
            None => (None, None),
        };

        let m = EpochMetrics::new(epoch, train_loss, train_acc, val_loss, val_acc);
        println!("{}", epoch_line(&m));
        metrics.log(&m)?;

        ckpt_manager.save_model(&model)?;
        tracing::info!("Weights saved after epoch {}", epoch);
        history.push(m);
    }

    tracing::info!("Training complete!");
    Ok(history)
}

fn epoch_line(m: &EpochMetrics) -> String {
    format!("Epoch {}: {}", m.epoch, m)
}

/// Number of rows whose arg-max equals the target class.
fn count_correct<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    // argmax(1) returns [batch, 1]; flatten to [batch] before comparing
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    predicted
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::ImageSample;
    use burn::backend::{Autodiff, NdArray};

    type TestBackend = Autodiff<NdArray>;

    fn samples(n: usize, side: usize) -> Vec<ImageSample> {
        (0..n)
            .map(|i| ImageSample {
                // class 1 is bright, class 0 is dark
                pixels: vec![if i % 2 == 0 { 0.0 } else { 1.0 }; 3 * side * side],
                label:  i % 2,
            })
            .collect()
    }

    #[test]
    fn test_training_writes_weights_and_metrics() {
        let tmp  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(tmp.path());
        let log  = MetricsLogger::create(tmp.path()).unwrap();

        let cfg = TrainConfig {
            image_size:  12,
            hidden_size: 8,
            batch_size:  4,
            epochs:      2,
            ..TrainConfig::default()
        };
        let model_cfg = cfg.model_config(2);

        let history = train_loop::<TestBackend>(
            &cfg,
            &model_cfg,
            ImageDataset::new(samples(8, 12)),
            ImageDataset::new(samples(4, 12)),
            &ckpt,
            &log,
            Default::default(),
        )
        .unwrap();

        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|m| m.train_loss.is_finite()));
        assert!(history[0].val_loss.is_some());
        assert!(ckpt.model_path().exists());

        let csv = std::fs::read_to_string(log.csv_path()).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_epoch_line_format() {
        let m = EpochMetrics::new(3, 0.5, 0.75, None, None);
        assert_eq!(epoch_line(&m), "Epoch 3: Loss = 0.5000, Accuracy = 75.00%");
    }

    #[test]
    fn test_count_correct() {
        let device = Default::default();
        let logits = Tensor::<NdArray, 2>::from_floats([[0.9, 0.1], [0.2, 0.8], [0.6, 0.4]], &device);
        let targets = Tensor::<NdArray, 1, Int>::from_ints([0, 1, 1], &device);
        assert_eq!(count_correct(logits, targets), 2);
    }
}
