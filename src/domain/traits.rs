// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits instead
// of concrete loaders and models:
//   - TrainingFolder implements ImageSource
//   - Inferencer<B> implements Classifier for any Burn backend
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use image::DynamicImage;

use crate::domain::{labels::ClassLabels, prediction::Prediction, sample::TrainingCorpus};

// ─── ImageSource ──────────────────────────────────────────────────────────────
/// Anything that can produce a labelled set of training images.
pub trait ImageSource {
    fn load_all(&self) -> Result<TrainingCorpus>;
}

// ─── Classifier ───────────────────────────────────────────────────────────────
/// Anything that can classify a decoded image.
pub trait Classifier {
    fn classify(&self, image: &DynamicImage, invasive_label: &str) -> Result<Prediction>;

    /// The labels this classifier can answer with, in output order.
    fn labels(&self) -> &ClassLabels;
}
