// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line arguments with clap and routes them to
// the use cases in Layer 2.
//
//   1. `train`   — extracts the data, trains, saves the model
//   2. `predict` — loads the model and prints a steering angle

pub mod commands;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "behavioral-cloning",
    version,
    about = "Train a CNN that predicts steering angles from front camera images."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Training on data in: {}", args.data_dir);

    let report = TrainUseCase::new(args.into()).execute()?;

    println!("Training complete. Model saved to {}", report.weights_path.display());
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::new(&args.model_dir, &args.model_name, args.device.into())?;
    let angle    = use_case.predict_image(Path::new(&args.image))?;
    println!("Steering angle: {angle:.6}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use crate::ml::{device::ComputeDevice, trainer::EpochSizing};

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::parse_from(["behavioral-cloning", "train"]);
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        let def = TrainConfig::default();

        assert_eq!(cfg.batch_size, def.batch_size);
        assert_eq!(cfg.epochs, 30);
        assert_eq!(cfg.archive, "data_augmented.zip");
        assert_eq!(cfg.model_name, "model");
        assert_eq!(cfg.epoch_sizing, EpochSizing::Batches);
        assert_eq!(cfg.device, ComputeDevice::Wgpu);
    }

    #[test]
    fn test_predict_requires_image() {
        assert!(Cli::try_parse_from(["behavioral-cloning", "predict"]).is_err());
        let cli = Cli::parse_from(["behavioral-cloning", "predict", "--image", "f.png", "--device", "cpu"]);
        assert!(matches!(cli.command, Commands::Predict(PredictArgs { ref image, .. }) if image == "f.png"));
    }
}
