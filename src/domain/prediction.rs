// ============================================================
// Layer 3 - Prediction
// ============================================================
// The outcome of classifying one image: the winning label, its
// confidence, the full probability distribution over all
// classes, and whether the winner is the invasive-species class.
//
// Built from the raw softmax output so the ML layer only has to
// hand over a Vec<f32>.

use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt;

use crate::domain::labels::ClassLabels;

/// Label the classifier treats as "invasive" unless told otherwise.
pub const DEFAULT_INVASIVE_LABEL: &str = "Invasive Species";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassProbability {
    pub label:       String,
    /// Percentage in [0, 100]
    pub probability: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label:         String,
    /// Percentage in [0, 100]
    pub confidence:    f32,
    pub probabilities: Vec<ClassProbability>,
    /// Number of images the model was trained with
    pub trained_with:  usize,
    pub invasive:      bool,
}

impl Prediction {
    /// Turn a softmax distribution into a Prediction.
    ///
    /// The winner is the first index holding the maximum value,
    /// matching numpy's argmax on ties.
    pub fn from_probabilities(
        labels:         &ClassLabels,
        probs:          &[f32],
        trained_with:   usize,
        invasive_label: &str,
    ) -> Result<Self> {
        if probs.len() != labels.len() {
            bail!(
                "Model produced {} probabilities but {} class labels are stored",
                probs.len(),
                labels.len()
            );
        }

        let mut best = 0usize;
        for (i, &p) in probs.iter().enumerate() {
            if p > probs[best] {
                best = i;
            }
        }

        let label = labels.get(best).unwrap_or_default().to_string();
        let probabilities = labels
            .iter()
            .zip(probs)
            .map(|(l, &p)| ClassProbability { label: l.to_string(), probability: p * 100.0 })
            .collect();

        Ok(Self {
            invasive:   is_invasive(&label, invasive_label),
            confidence: probs[best] * 100.0,
            label,
            probabilities,
            trained_with,
        })
    }
}

/// Case-insensitive, whitespace-trimmed label comparison.
pub fn is_invasive(label: &str, invasive_label: &str) -> bool {
    label.trim().eq_ignore_ascii_case(invasive_label.trim())
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Prediction: {} ({:.2}% confidence)", self.label, self.confidence)?;
        writeln!(f, "Trained with: {} images.", self.trained_with)?;
        writeln!(f)?;
        writeln!(f, "Probabilities:")?;
        for p in &self.probabilities {
            writeln!(f, "  {}: {:.2}%", p.label, p.probability)?;
        }
        if self.invasive {
            writeln!(f)?;
            writeln!(f, "Invasive species detected")?;
        }
        Ok(())
    }
}
