// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `predict`
// and all their configurable flags. Defaults describe
// the standard run: data_augmented.zip in the current
// directory, batch 128, 30 epochs, model saved as ./model.mpk.

use clap::{Args, Subcommand, ValueEnum};

use crate::application::train_use_case::TrainConfig;
use crate::ml::{device::ComputeDevice, trainer::EpochSizing};

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the steering model on the recorded driving data
    Train(TrainArgs),

    /// Predict the steering angle for one camera image
    Predict(PredictArgs),
}

/// Backend to run the numeric kernels on
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DeviceArg {
    /// GPU through WGPU
    Wgpu,
    /// CPU through NdArray
    Cpu,
}

impl From<DeviceArg> for ComputeDevice {
    fn from(d: DeviceArg) -> Self {
        match d {
            DeviceArg::Wgpu => ComputeDevice::Wgpu,
            DeviceArg::Cpu  => ComputeDevice::Cpu,
        }
    }
}

/// How many batches make up one epoch
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum EpochSizingArg {
    /// ceil(samples / batch_size) batches
    Batches,
    /// one batch per sample
    Samples,
}

impl From<EpochSizingArg> for EpochSizing {
    fn from(s: EpochSizingArg) -> Self {
        match s {
            EpochSizingArg::Batches => EpochSizing::Batches,
            EpochSizingArg::Samples => EpochSizing::Samples,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory containing the archive and the extracted data
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    /// Zip archive with the recorded images and driving log
    #[arg(long, default_value = "data_augmented.zip")]
    pub archive: String,

    /// Directory the archive extracts the images into
    #[arg(long, default_value = "data_augmented")]
    pub extracted_dir: String,

    /// Driving log CSV produced by the archive
    #[arg(long, default_value = "data_augmented.csv")]
    pub csv_file: String,

    /// CSV column holding the centre camera image path
    #[arg(long, default_value = "CENTER_IMAGE")]
    pub image_column: String,

    /// CSV column holding the steering angle
    #[arg(long, default_value = "STEERING_ANGLE")]
    pub angle_column: String,

    /// Directory to save the model artifact and metrics into
    #[arg(long, default_value = ".")]
    pub output_dir: String,

    /// File name (without extension) of the saved model
    #[arg(long, default_value = "model")]
    pub model_name: String,

    /// Number of frames processed together in one step
    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Number of epochs to train for
    #[arg(long, default_value_t = 30)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Fraction of rows held out for validation
    #[arg(long, default_value_t = 0.2)]
    pub validation_fraction: f64,

    /// Steps per epoch: whole batches, or one step per sample
    #[arg(long, value_enum, default_value_t = EpochSizingArg::Batches)]
    pub epoch_sizing: EpochSizingArg,

    #[arg(long, value_enum, default_value_t = DeviceArg::Wgpu)]
    pub device: DeviceArg,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:            a.data_dir,
            archive:             a.archive,
            extracted_dir:       a.extracted_dir,
            csv_file:            a.csv_file,
            image_column:        a.image_column,
            angle_column:        a.angle_column,
            output_dir:          a.output_dir,
            model_name:          a.model_name,
            batch_size:          a.batch_size,
            epochs:              a.epochs,
            lr:                  a.lr,
            validation_fraction: a.validation_fraction,
            epoch_sizing:        a.epoch_sizing.into(),
            device:              a.device.into(),
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Camera image to predict a steering angle for
    #[arg(long)]
    pub image: String,

    /// Directory the model was saved into
    #[arg(long, default_value = ".")]
    pub model_dir: String,

    /// File name (without extension) of the saved model
    #[arg(long, default_value = "model")]
    pub model_name: String,

    #[arg(long, value_enum, default_value_t = DeviceArg::Wgpu)]
    pub device: DeviceArg,
}
