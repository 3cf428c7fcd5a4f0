// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything between a folder of images on disk and tensor
// batches, plus the image editing utilities.
//
//   training folder
//       │
//       ▼
//   TrainingFolder     → class labels + labelled image paths
//       │
//       ▼
//   ImagePreprocessor  → resize, RGB, [0,1], channel-major
//       │
//       ▼
//   split_train_val    → optional validation hold-out
//       │
//       ▼
//   ImageDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   ImageBatcher       → stacks samples into [N, 3, S, S]
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Scans a folder of class folders
pub mod loader;

/// Decoded image → normalised float buffer
pub mod preprocessor;

/// Implements Burn's Dataset trait for image samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded shuffle and train/validation split
pub mod splitter;

/// Rotate, mirror, save
pub mod editor;
