// ============================================================
// Layer 2 - Model Inspection / Deletion
// ============================================================
// `info` answers "is there a pre-trained model, and what is it?"
// without loading any weights. `delete-model` removes it so the
// next `train` starts from scratch.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::domain::labels::ClassLabels;
use crate::infra::checkpoint::{CheckpointManager, ModelManifest};

#[derive(Debug, Clone)]
pub enum ModelStatus {
    Missing,
    Ready {
        labels:   ClassLabels,
        /// None for models whose manifest was removed by hand
        manifest: Option<ModelManifest>,
    },
}

pub fn inspect(model_dir: impl AsRef<Path>) -> Result<ModelStatus> {
    let ckpt = CheckpointManager::new(model_dir.as_ref());
    if !ckpt.exists() {
        return Ok(ModelStatus::Missing);
    }

    let labels   = ckpt.load_labels()?;
    let manifest = match ckpt.load_manifest() {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::warn!("{:#}", e);
            None
        }
    };
    Ok(ModelStatus::Ready { labels, manifest })
}

/// Returns the files that were removed (empty if there was no model).
pub fn delete_model(model_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let removed = CheckpointManager::new(model_dir.as_ref()).delete()?;
    tracing::info!("Removed {} model files", removed.len());
    Ok(removed)
}
