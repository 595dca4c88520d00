// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Loads the saved model artifact and predicts the steering
// angle for one camera image. The image is decoded and resized
// to the model's input size the same way the training
// generator does it.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use burn::prelude::Backend;

use crate::data::frames::load_frame;
use crate::infra::model_store::ModelStore;
use crate::ml::{
    device::{ComputeDevice, CpuBackend, GpuBackend},
    inferencer::SteeringPredictor,
};

pub struct PredictUseCase {
    store:  ModelStore,
    device: ComputeDevice,
}

impl PredictUseCase {
    pub fn new(model_dir: impl Into<PathBuf>, model_name: &str, device: ComputeDevice) -> Result<Self> {
        Ok(Self { store: ModelStore::new(model_dir, model_name)?, device })
    }

    pub fn predict_image(&self, image: &Path) -> Result<f32> {
        match self.device {
            ComputeDevice::Wgpu => self.predict_on::<GpuBackend>(image, &ComputeDevice::wgpu_device()),
            ComputeDevice::Cpu  => self.predict_on::<CpuBackend>(image, &ComputeDevice::cpu_device()),
        }
    }

    fn predict_on<B: Backend>(&self, image: &Path, device: &B::Device) -> Result<f32> {
        ensure!(
            self.store.exists(),
            "no trained model in '{}'. Have you run 'train' first?",
            self.store.dir().display()
        );
        if let Ok(run) = self.store.load_train_config() {
            tracing::debug!("Model was trained for {} epochs on '{}'", run.epochs, run.csv_file);
        }

        let predictor       = SteeringPredictor::<B>::from_store(&self.store, device)?;
        let [height, width] = predictor.input_size();
        let frame           = load_frame(image, height, width)?;
        let angle           = predictor.predict(&frame)?;
        tracing::info!("'{}' → steering angle {:.4}", image.display(), angle);
        Ok(angle)
    }
}
