// ============================================================
// Layer 5 — Steering Predictor
// ============================================================
use anyhow::{ensure, Result};
use burn::prelude::*;

use crate::data::batcher::frames_to_tensor;
use crate::domain::frame::Frame;
use crate::infra::model_store::ModelStore;
use crate::ml::model::{PilotNet, PilotNetConfig};

/// A reloaded model that maps camera frames to steering angles.
pub struct SteeringPredictor<B: Backend> {
    model:     PilotNet<B>,
    model_cfg: PilotNetConfig,
    device:    B::Device,
}

impl<B: Backend> SteeringPredictor<B> {
    pub fn new(model: PilotNet<B>, model_cfg: PilotNetConfig, device: B::Device) -> Self {
        Self { model, model_cfg, device }
    }

    pub fn from_store(store: &ModelStore, device: &B::Device) -> Result<Self> {
        let (model, model_cfg) = store.load_model::<B>(device)?;
        Ok(Self::new(model, model_cfg, device.clone()))
    }

    /// [height, width] the frames passed to predict() must have.
    pub fn input_size(&self) -> [usize; 2] {
        [self.model_cfg.input_height, self.model_cfg.input_width]
    }

    pub fn predict(&self, frame: &Frame) -> Result<f32> {
        let angles = self.predict_batch(&[frame])?;
        Ok(angles[0])
    }

    /// Predict one angle per frame, in input order.
    pub fn predict_batch(&self, frames: &[&Frame]) -> Result<Vec<f32>> {
        ensure!(!frames.is_empty(), "no frames to predict");
        let [height, width] = self.input_size();
        for f in frames {
            ensure!(
                f.shape() == [height, width, Frame::CHANNELS],
                "frame is {:?}, model expects {:?}",
                f.shape(),
                [height, width, Frame::CHANNELS]
            );
        }

        let images = frames_to_tensor::<B>(frames, &self.device);
        let angles = self
            .model
            .forward(images)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read predictions: {e:?}"))?;

        tracing::debug!("Predicted {} steering angles", angles.len());
        Ok(angles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn predictor() -> SteeringPredictor<TestBackend> {
        let device = Default::default();
        let cfg    = PilotNetConfig::new();
        let model  = cfg.init::<TestBackend>(&device).unwrap();
        SteeringPredictor::new(model, cfg, device)
    }

    #[test]
    fn test_predicts_single_float() {
        let angle = predictor().predict(&Frame::filled(160, 320, [128, 64, 32])).unwrap();
        assert!(angle.is_finite());
    }

    #[test]
    fn test_batch_keeps_order() {
        let p = predictor();
        let a = Frame::filled(160, 320, [0, 0, 0]);
        let b = Frame::filled(160, 320, [255, 255, 255]);
        let both = p.predict_batch(&[&a, &b]).unwrap();
        assert_eq!(both.len(), 2);
        assert!((both[1] - p.predict(&b).unwrap()).abs() < 1e-5);
    }

    #[test]
    fn test_rejects_wrong_shape() {
        assert!(predictor().predict(&Frame::filled(1, 1, [0, 0, 0])).is_err());
    }
}
