// ============================================================
// Layer 6 - Metrics Logger
// ============================================================
// Records training metrics to model/metrics.csv, one row per
// epoch, so a learning curve can be plotted after the run.
//
//   epoch,train_loss,train_acc,val_loss,val_acc
//   1,0.693100,0.500000,,
//   2,0.512300,0.750000,,
//
// The validation columns stay empty when training used every
// image (no hold-out). Each training run starts a fresh file:
// the metrics describe the model currently on disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::infra::checkpoint::METRICS_FILE;

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean cross-entropy over the epoch's training batches
    pub train_loss: f64,

    /// Fraction of training images classified correctly, in [0, 1]
    pub train_acc: f64,

    pub val_loss: Option<f64>,
    pub val_acc:  Option<f64>,
}

impl EpochMetrics {
    pub fn new(
        epoch:      usize,
        train_loss: f64,
        train_acc:  f64,
        val_loss:   Option<f64>,
        val_acc:    Option<f64>,
    ) -> Self {
        Self { epoch, train_loss, train_acc, val_loss, val_acc }
    }
}

impl fmt::Display for EpochMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loss = {:.4}, Accuracy = {:.2}%", self.train_loss, self.train_acc * 100.0)?;
        if let (Some(loss), Some(acc)) = (self.val_loss, self.val_acc) {
            write!(f, " | Val Loss = {:.4}, Val Accuracy = {:.2}%", loss, acc * 100.0)?;
        }
        Ok(())
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create (or truncate) the CSV file and write its header.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join(METRICS_FILE);
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "epoch,train_loss,train_acc,val_loss,val_acc")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{},{}",
            m.epoch,
            m.train_loss,
            m.train_acc,
            optional(m.val_loss),
            optional(m.val_acc),
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: loss={:.4}, acc={:.4}",
            m.epoch,
            m.train_loss,
            m.train_acc,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

fn optional(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.6}")).unwrap_or_default()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_with_and_without_validation() {
        let tmp    = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::create(tmp.path()).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, 0.75, None, None)).unwrap();
        logger.log(&EpochMetrics::new(2, 0.25, 1.0, Some(0.3), Some(0.5))).unwrap();

        let csv: Vec<String> = fs::read_to_string(logger.csv_path())
            .unwrap()
            .lines()
            .map(String::from)
            .collect();
        assert_eq!(csv[0], "epoch,train_loss,train_acc,val_loss,val_acc");
        assert_eq!(csv[1], "1,0.500000,0.750000,,");
        assert_eq!(csv[2], "2,0.250000,1.000000,0.300000,0.500000");
    }

    #[test]
    fn test_create_starts_a_fresh_file() {
        let tmp = tempfile::tempdir().unwrap();
        MetricsLogger::create(tmp.path()).unwrap()
            .log(&EpochMetrics::new(1, 1.0, 0.0, None, None)).unwrap();
        let logger = MetricsLogger::create(tmp.path()).unwrap();
        assert_eq!(fs::read_to_string(logger.csv_path()).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_display_matches_epoch_log_line() {
        let m = EpochMetrics::new(3, 0.12345, 0.9, None, None);
        assert_eq!(m.to_string(), "Loss = 0.1235, Accuracy = 90.00%");
    }
}
