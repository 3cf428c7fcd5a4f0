// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, dispatches to one use case per
// subcommand, and prints results. All work is delegated to
// Layer 2 (application).
//
//   train        - fit the CNN on a folder of class folders
//   predict      - classify an image, flag invasive species
//   edit         - rotate / mirror / save an image
//   info         - is there a trained model?
//   delete-model - remove the trained model

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EditArgs, ModelDirArgs, PredictArgs, TrainArgs};

use crate::application::{
    edit_use_case::EditUseCase,
    model_use_case::{self, ModelStatus},
    predict_use_case::PredictUseCase,
    train_use_case::TrainUseCase,
};

#[derive(Parser, Debug)]
#[command(
    name = "invasive-plant-classifier",
    version,
    about = "Train an image classifier on labelled plant photos, then flag invasive species."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)       => run_train(args),
            Commands::Predict(args)     => run_predict(args),
            Commands::Edit(args)        => run_edit(args),
            Commands::Info(args)        => run_info(args),
            Commands::DeleteModel(args) => run_delete(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    tracing::info!("Starting training on images in: {}", args.data_dir);

    let use_case = TrainUseCase::new(args.into());
    let report   = use_case.execute()?;

    println!(
        "Model trained with {} images! Now run 'predict' on an image.",
        report.num_images
    );
    println!(
        "Classes: {}",
        report.labels.iter().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let use_case   = PredictUseCase::new(&args.model_dir, args.device, args.invasive_label)?;
    let prediction = use_case.predict(&args.image, &args.ops)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
    } else {
        print!("{prediction}");
    }
    Ok(())
}

fn run_edit(args: EditArgs) -> Result<()> {
    let (w, h) = EditUseCase::new(&args.image, &args.output).execute(&args.ops)?;
    println!("Image saved successfully to '{}' ({}x{}).", args.output.display(), w, h);
    Ok(())
}

fn run_info(args: ModelDirArgs) -> Result<()> {
    match model_use_case::inspect(&args.model_dir)? {
        ModelStatus::Missing => {
            println!(
                "No trained model in '{}'. Run 'train' with a folder of labelled images.",
                args.model_dir.display()
            );
        }
        ModelStatus::Ready { labels, manifest } => {
            println!("Pre-trained model found in '{}'.", args.model_dir.display());
            println!("Classes: {}", labels.iter().collect::<Vec<_>>().join(", "));
            if let Some(m) = manifest {
                println!("Trained with: {} images", m.num_images);
                println!("Input size:   {}x{}", m.image_size, m.image_size);
                println!(
                    "Training:     {} epochs, batch {}, lr {}",
                    m.epochs, m.batch_size, m.learning_rate
                );
            }
        }
    }
    Ok(())
}

fn run_delete(args: ModelDirArgs) -> Result<()> {
    let removed = model_use_case::delete_model(&args.model_dir)?;
    if removed.is_empty() {
        println!("No model to delete in '{}'.", args.model_dir.display());
    } else {
        println!("Model and associated files deleted successfully!");
        for path in removed {
            println!("  removed {}", path.display());
        }
    }
    Ok(())
}
