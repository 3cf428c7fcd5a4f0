// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// One subcommand per user action. clap's derive macros generate
// --help text, missing-argument errors and type conversion
// (including EditOp / ComputeDevice via their FromStr impls).

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::train_use_case::TrainConfig;
use crate::domain::{edit::EditOp, prediction::DEFAULT_INVASIVE_LABEL};
use crate::ml::device::ComputeDevice;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a classifier on a folder of class folders
    Train(TrainArgs),

    /// Classify an image with the trained model
    Predict(PredictArgs),

    /// Rotate / mirror an image and save the result
    Edit(EditArgs),

    /// Show whether a trained model is available
    Info(ModelDirArgs),

    /// Delete the trained model and its labels
    DeleteModel(ModelDirArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Folder with one sub-folder of images per class label
    #[arg(long)]
    pub data_dir: String,

    /// Where the model, labels and metrics are written
    #[arg(long, default_value = "model")]
    pub model_dir: String,

    /// Images are resized to SIZE x SIZE before training
    #[arg(long, default_value_t = 150)]
    pub image_size: usize,

    /// Width of the dense layer after the convolutions
    #[arg(long, default_value_t = 128)]
    pub hidden_size: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Number of full passes through the training images
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Fraction of images held out for validation (0 = train on all)
    #[arg(long, default_value_t = 0.0)]
    pub val_fraction: f64,

    /// Seed for shuffling and the validation split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// cpu or gpu (use cpu on machines without a GPU adapter)
    #[arg(long, default_value_t = ComputeDevice::Gpu)]
    pub device: ComputeDevice,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:     a.data_dir,
            model_dir:    a.model_dir,
            image_size:   a.image_size,
            hidden_size:  a.hidden_size,
            batch_size:   a.batch_size,
            epochs:       a.epochs,
            lr:           a.lr,
            val_fraction: a.val_fraction,
            seed:         a.seed,
            device:       a.device,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Image to classify (.png, .jpg, .bmp, ...)
    pub image: PathBuf,

    #[arg(long, default_value = "model")]
    pub model_dir: PathBuf,

    /// Edit applied before classifying; repeat to chain
    /// (rotate-left, rotate-right, mirror)
    #[arg(long = "op")]
    pub ops: Vec<EditOp>,

    /// Class label that counts as an invasive species
    #[arg(long, default_value = DEFAULT_INVASIVE_LABEL)]
    pub invasive_label: String,

    /// cpu or gpu (use cpu on machines without a GPU adapter)
    #[arg(long, default_value_t = ComputeDevice::Gpu)]
    pub device: ComputeDevice,

    /// Print the prediction as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Image to edit
    pub image: PathBuf,

    /// Where to save the result; the extension picks the format
    #[arg(long, short)]
    pub output: PathBuf,

    /// Edit to apply; repeat to chain (rotate-left, rotate-right, mirror)
    #[arg(long = "op")]
    pub ops: Vec<EditOp>,
}

#[derive(Args, Debug)]
pub struct ModelDirArgs {
    #[arg(long, default_value = "model")]
    pub model_dir: PathBuf,
}
