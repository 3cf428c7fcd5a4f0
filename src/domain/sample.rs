// ============================================================
// Layer 3 - Training Samples
// ============================================================
// A training folder is a directory of sub-folders, one per
// class label. Scanning it yields a TrainingCorpus: the labels
// (sorted folder names) plus every image path tagged with the
// index of its label.

use std::path::PathBuf;

use crate::domain::labels::ClassLabels;

/// One example image on disk and the class it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledImage {
    pub path:        PathBuf,
    pub class_index: usize,
}

impl LabeledImage {
    pub fn new(path: impl Into<PathBuf>, class_index: usize) -> Self {
        Self { path: path.into(), class_index }
    }
}

/// Everything found in a training folder.
#[derive(Debug, Clone)]
pub struct TrainingCorpus {
    pub labels: ClassLabels,
    pub images: Vec<LabeledImage>,
}

impl TrainingCorpus {
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Number of images per class, in label order.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.labels.len()];
        for image in &self.images {
            if let Some(c) = counts.get_mut(image.class_index) {
                *c += 1;
            }
        }
        counts
    }
}
