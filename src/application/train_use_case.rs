// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Extract the archive once       (Layer 4 - data)
//   Step 2: Load the driving log CSV       (Layer 4 - data)
//   Step 3: Resolve typed rows             (Layer 4 - data)
//   Step 4: Split train/validation 80/20   (Layer 4 - data)
//   Step 5: Save config                    (Layer 6 - infra)
//   Step 6: Build model + generators       (Layer 5 / 4)
//   Step 7: Run training loop              (Layer 5 - ml)
//   Step 8: Save the model artifact        (Layer 6 - infra)

use std::{path::PathBuf, sync::Arc};

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use burn::tensor::backend::AutodiffBackend;

use crate::data::{
    archive::{ArchiveOutcome, ArchivePreparer},
    dataset::{DrivingDataset, DEFAULT_ANGLE_COLUMN, DEFAULT_IMAGE_COLUMN},
    generator::{BatchGenerator, DEFAULT_BATCH_SIZE},
    loader::load_driving_log,
    splitter::split_indices,
};
use crate::infra::{
    metrics::{EpochMetrics, MetricsLogger},
    model_store::ModelStore,
};
use crate::ml::{
    device::{ComputeDevice, CpuTrainBackend, GpuTrainBackend},
    model::PilotNetConfig,
    trainer::{run_training, EpochSizing},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a run. Serialisable so it is stored next to the
// model it produced. Defaults match the simulator recording
// layout and hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Directory holding the archive; extraction and relative
    /// image paths resolve against it
    pub data_dir:            String,
    pub archive:             String,
    pub extracted_dir:       String,
    pub csv_file:            String,
    pub image_column:        String,
    pub angle_column:        String,
    /// Where the model artifact and metrics are written
    pub output_dir:          String,
    pub model_name:          String,
    pub batch_size:          usize,
    pub epochs:              usize,
    pub lr:                  f64,
    pub validation_fraction: f64,
    pub epoch_sizing:        EpochSizing,
    pub device:              ComputeDevice,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:            ".".to_string(),
            archive:             "data_augmented.zip".to_string(),
            extracted_dir:       "data_augmented".to_string(),
            csv_file:            "data_augmented.csv".to_string(),
            image_column:        DEFAULT_IMAGE_COLUMN.to_string(),
            angle_column:        DEFAULT_ANGLE_COLUMN.to_string(),
            output_dir:          ".".to_string(),
            model_name:          "model".to_string(),
            batch_size:          DEFAULT_BATCH_SIZE,
            epochs:              30,
            lr:                  1e-3,
            validation_fraction: 0.2,
            epoch_sizing:        EpochSizing::Batches,
            device:              ComputeDevice::Wgpu,
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub weights_path:       PathBuf,
    pub train_samples:      usize,
    pub validation_samples: usize,
    pub history:            Vec<EpochMetrics>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        match self.config.device {
            ComputeDevice::Wgpu => self.execute_on::<GpuTrainBackend>(ComputeDevice::wgpu_device()),
            ComputeDevice::Cpu  => self.execute_on::<CpuTrainBackend>(ComputeDevice::cpu_device()),
        }
    }

    fn execute_on<B: AutodiffBackend>(&self, device: B::Device) -> Result<TrainReport> {
        let cfg      = &self.config;
        let data_dir = PathBuf::from(&cfg.data_dir);
        tracing::info!("Using device: {:?}", device);

        // ── Step 1: Make sure the images are on disk ──────────────────────────
        let prepared = ArchivePreparer::new(&data_dir, &cfg.archive, &cfg.extracted_dir, &cfg.csv_file)
            .prepare()?;
        if let ArchiveOutcome::Extracted { entries } = prepared {
            tracing::debug!("Archive provided {} entries", entries);
        }

        // ── Step 2 + 3: Driving log → typed rows ──────────────────────────────
        let log     = load_driving_log(data_dir.join(&cfg.csv_file))?;
        let dataset = DrivingDataset::from_log(&log, &cfg.image_column, &cfg.angle_column, &data_dir)?;
        let n_records = dataset.record_count();
        ensure!(n_records > 0, "driving log '{}' has no rows", cfg.csv_file);

        // ── Step 4: Train / validation split ──────────────────────────────────
        let (train_idx, val_idx) = split_indices(n_records, cfg.validation_fraction);
        tracing::info!("Split: {} train, {} validation", train_idx.len(), val_idx.len());
        let (train_samples, validation_samples) = (train_idx.len(), val_idx.len());

        // ── Step 5: Output directory and per-epoch metrics ────────────────────
        let store   = ModelStore::new(&cfg.output_dir, &cfg.model_name)?;
        let metrics = MetricsLogger::new(store.dir())?;

        // ── Step 6: Model and the two generators over one shared table ────────
        let model_cfg = PilotNetConfig::new();
        let model     = model_cfg.init::<B>(&device)?;

        let dataset = Arc::new(dataset);
        let frame_size = (model_cfg.input_height, model_cfg.input_width);
        let mut train_gen = BatchGenerator::new(Arc::clone(&dataset), train_idx, cfg.batch_size)
            .with_frame_size(frame_size.0, frame_size.1);
        let mut val_gen = BatchGenerator::new(dataset, val_idx, cfg.batch_size)
            .with_frame_size(frame_size.0, frame_size.1);

        // ── Step 7: Training loop (Layer 5) ───────────────────────────────────
        let outcome = run_training(cfg, model, &mut train_gen, &mut val_gen, &metrics, &device)?;

        // ── Step 8: Persist the model, then the config that produced it ───────
        let weights_path = store.save_model(&outcome.model, &model_cfg)?;
        store.save_train_config(cfg)?;

        Ok(TrainReport {
            weights_path,
            train_samples,
            validation_samples,
            history: outcome.history,
        })
    }
}
