// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Epoch loop over two infinite batch generators with Adam and
// mean squared error.
//
//   for epoch in 1..=epochs:
//     train_steps batches → forward, MSE, backward, Adam step
//     val_steps   batches → forward on model.valid(), MSE only
//
// The generators never end, so the number of steps per epoch
// is decided here (see EpochSizing). Validation runs on the
// inner backend returned by model.valid(), without autodiff.
//
// Any batch error (an unreadable frame) aborts the run.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{ensure, Context, Result};
use burn::{
    data::{dataloader::batcher::Batcher, dataset::Dataset},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::DrivingBatcher, generator::BatchGenerator};
use crate::domain::{frame::DrivingSample, record::DrivingRecord};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::PilotNet;

/// How many generator steps make up one epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpochSizing {
    /// ceil(samples / batch_size) steps: every sample about once
    #[default]
    Batches,
    /// One step per sample, i.e. batch_size passes per epoch
    Samples,
}

impl EpochSizing {
    pub fn steps(self, samples: usize, batch_size: usize) -> usize {
        match self {
            EpochSizing::Batches => samples.div_ceil(batch_size.max(1)),
            EpochSizing::Samples => samples,
        }
    }
}

/// The trained model and the loss history that produced it.
pub struct TrainingOutcome<B: AutodiffBackend> {
    pub model:   PilotNet<B>,
    pub history: Vec<EpochMetrics>,
}

fn next_batch<D: Dataset<DrivingRecord>>(
    generator: &mut BatchGenerator<D>,
) -> Result<Vec<DrivingSample>> {
    let batch = generator
        .next()
        .context("batch generator has no samples to draw from")?
        .context("failed to produce a batch")?;
    Ok(batch)
}

pub fn run_training<B, D>(
    cfg:       &TrainConfig,
    model:     PilotNet<B>,
    train_gen: &mut BatchGenerator<D>,
    val_gen:   &mut BatchGenerator<D>,
    metrics:   &MetricsLogger,
    device:    &B::Device,
) -> Result<TrainingOutcome<B>>
where
    B: AutodiffBackend,
    D: Dataset<DrivingRecord>,
{
    let train_steps = cfg.epoch_sizing.steps(train_gen.num_samples(), train_gen.batch_size());
    let val_steps   = cfg.epoch_sizing.steps(val_gen.num_samples(), val_gen.batch_size());
    ensure!(train_steps > 0, "training set is empty");

    tracing::info!(
        "{} training / {} validation steps per epoch ({:?} sizing, {} batches cover the training set)",
        train_steps, val_steps, cfg.epoch_sizing, train_gen.batches_per_pass()
    );

    let mut model = model;
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

    // Training batches carry autodiff, validation batches don't
    let train_batcher = DrivingBatcher::<B>::new(device.clone());
    let val_batcher   = DrivingBatcher::<B::InnerBackend>::new(device.clone());

    let mut history = Vec::with_capacity(cfg.epochs);

    tracing::info!("starting training");
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        for _ in 0..train_steps {
            let batch = train_batcher.batch(next_batch(train_gen)?);
            let (loss, _) = model.forward_regression(batch.images, batch.angles);

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }
        let train_loss = train_loss_sum / train_steps as f64;

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();
        let mut val_loss_sum = 0.0f64;
        for _ in 0..val_steps {
            let batch = val_batcher.batch(next_batch(val_gen)?);
            let (loss, _) = model_valid.forward_regression(batch.images, batch.angles);
            val_loss_sum += loss.into_scalar().elem::<f64>();
        }
        let val_loss = if val_steps > 0 { val_loss_sum / val_steps as f64 } else { f64::NAN };

        println!(
            "Epoch {:>3}/{} | train_loss={:.6} | val_loss={:.6}",
            epoch, cfg.epochs, train_loss, val_loss,
        );

        let m = EpochMetrics::new(epoch, train_loss, val_loss);
        metrics.log(&m)?;
        history.push(m);
    }

    tracing::info!("Training complete! Metrics in '{}'", metrics.csv_path().display());
    Ok(TrainingOutcome { model, history })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use image::{Rgb, RgbImage};

    use crate::data::dataset::DrivingDataset;
    use crate::ml::{device::CpuTrainBackend, model::PilotNetConfig};

    /// Trains one epoch on four frames (batch 2) and one validation
    /// frame, returning the passes consumed by each generator.
    fn passes_for(sizing: EpochSizing) -> (usize, usize) {
        let dir = tempfile::tempdir().unwrap();
        let records = (0..5)
            .map(|i| {
                let path = dir.path().join(format!("{i}.png"));
                RgbImage::from_pixel(1, 1, Rgb([i * 40, 80, 120])).save(&path).unwrap();
                DrivingRecord::new(path, f32::from(i) / 10.0)
            })
            .collect();
        let dataset = Arc::new(DrivingDataset::new(records));

        let mut train_gen = BatchGenerator::new(Arc::clone(&dataset), vec![0, 1, 2, 3], 2);
        let mut val_gen   = BatchGenerator::new(dataset, vec![4], 2);

        let cfg = TrainConfig { epochs: 1, batch_size: 2, epoch_sizing: sizing, ..TrainConfig::default() };
        let device  = Default::default();
        let model   = PilotNetConfig::new().init::<CpuTrainBackend>(&device).unwrap();
        let metrics = MetricsLogger::new(dir.path()).unwrap();

        let outcome = run_training(&cfg, model, &mut train_gen, &mut val_gen, &metrics, &device).unwrap();
        assert_eq!(outcome.history.len(), 1);
        assert!(outcome.history[0].train_loss.is_finite());
        assert!(outcome.history[0].val_loss.is_finite());

        (train_gen.passes(), val_gen.passes())
    }

    #[test]
    fn test_batch_sizing_consumes_one_pass_per_epoch() {
        assert_eq!(passes_for(EpochSizing::Batches), (1, 1));
    }

    #[test]
    fn test_sample_sizing_consumes_batch_size_passes_per_epoch() {
        // 4 steps over 2 batches per pass
        assert_eq!(passes_for(EpochSizing::Samples), (2, 1));
    }

    #[test]
    fn test_batch_sizing_rounds_up() {
        assert_eq!(EpochSizing::Batches.steps(8, 4), 2);
        assert_eq!(EpochSizing::Batches.steps(9, 4), 3);
        assert_eq!(EpochSizing::Batches.steps(0, 4), 0);
        assert_eq!(EpochSizing::Batches.steps(1, 128), 1);
    }

    #[test]
    fn test_sample_sizing_uses_raw_count() {
        assert_eq!(EpochSizing::Samples.steps(8, 4), 8);
        assert_eq!(EpochSizing::Samples.steps(2, 128), 2);
    }
}
