// ============================================================
// Layer 4 — Driving Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<DrivingSample>
// from the generator into tensors.
//
//   Input:  N samples, each a H×W×3 frame + one angle
//   Output: images [N, H, W, 3] (raw 0..255 floats)
//           angles [N, 1]
//
// Pixels are flattened sample by sample, so the i-th image row
// in the tensor always lines up with the i-th angle.
// Cropping and normalisation happen inside the model.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::domain::frame::{DrivingSample, Frame};

/// A batch of frames ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct DrivingBatch<B: Backend> {
    /// Camera frames — shape: [batch_size, height, width, 3]
    pub images: Tensor<B, 4>,

    /// Recorded steering angles — shape: [batch_size, 1]
    pub angles: Tensor<B, 2>,
}

/// Holds the target device so tensors land on the right GPU/CPU.
#[derive(Clone, Debug)]
pub struct DrivingBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> DrivingBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

/// Stack frames into one [N, H, W, 3] float tensor.
pub fn frames_to_tensor<B: Backend>(frames: &[&Frame], device: &B::Device) -> Tensor<B, 4> {
    let (height, width) = frames
        .first()
        .map(|f| (f.height, f.width))
        .unwrap_or((0, 0));

    let pixels: Vec<f32> = frames
        .iter()
        .flat_map(|f| f.pixels.iter().map(|&p| p as f32))
        .collect();

    Tensor::from_data(
        TensorData::new(pixels, [frames.len(), height, width, Frame::CHANNELS]),
        device,
    )
}

impl<B: Backend> Batcher<DrivingSample, DrivingBatch<B>> for DrivingBatcher<B> {
    fn batch(&self, items: Vec<DrivingSample>) -> DrivingBatch<B> {
        let frames: Vec<&Frame> = items.iter().map(|s| &s.frame).collect();
        let images = frames_to_tensor(&frames, &self.device);

        let angles: Vec<f32> = items.iter().map(|s| s.steering_angle).collect();
        let angles = Tensor::from_data(TensorData::new(angles, [items.len(), 1]), &self.device);

        DrivingBatch { images, angles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_batch_shapes_and_order() {
        let items = vec![
            DrivingSample { frame: Frame::filled(2, 3, [1, 1, 1]), steering_angle: 0.1 },
            DrivingSample { frame: Frame::filled(2, 3, [9, 9, 9]), steering_angle: -0.3 },
        ];
        let batch = DrivingBatcher::<TestBackend>::new(Default::default()).batch(items);

        assert_eq!(batch.images.dims(), [2, 2, 3, 3]);
        assert_eq!(batch.angles.dims(), [2, 1]);

        let pixels = batch.images.into_data().to_vec::<f32>().unwrap();
        assert_eq!(pixels[0], 1.0);
        assert_eq!(pixels[18], 9.0);

        let angles = batch.angles.into_data().to_vec::<f32>().unwrap();
        assert_eq!(angles, vec![0.1, -0.3]);
    }
}
