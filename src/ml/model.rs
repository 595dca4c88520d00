// ============================================================
// Layer 5 — PilotNet Steering Model
// ============================================================
// The end-to-end network from NVIDIA's "End to End Learning for
// Self-Driving Cars", used here as a fixed regression graph:
//
//   [N,160,320,3] raw frame
//     crop rows 70..135        → [N, 65, 320, 3]
//     x / 255 - 0.5
//     permute to channels-first → [N, 3, 65, 320]
//     conv 24 5×5 /2 + ReLU    → [N, 24, 31, 158]
//     conv 36 5×5 /2 + ReLU    → [N, 36, 14,  77]
//     conv 48 5×5 /2 + ReLU    → [N, 48,  5,  37]
//     conv 64 3×3    + ReLU    → [N, 64,  3,  35]
//     conv 64 3×3    + ReLU    → [N, 64,  1,  33]
//     flatten                  → [N, 2112]
//     dense 100 → 50 → 10 → 1  → [N, 1] steering angle
//
// All convolutions use valid padding; the dense layers are
// linear.

use anyhow::{ensure, Result};
use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        loss::{MseLoss, Reduction},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::relu,
};

/// (out_channels, kernel, stride) for each convolution.
const CONV_LAYERS: [(usize, usize, usize); 5] = [
    (24, 5, 2),
    (36, 5, 2),
    (48, 5, 2),
    (64, 3, 1),
    (64, 3, 1),
];

const DENSE_LAYERS: [usize; 4] = [100, 50, 10, 1];

#[derive(Config, Debug)]
pub struct PilotNetConfig {
    #[config(default = 160)]
    pub input_height: usize,
    #[config(default = 320)]
    pub input_width:  usize,
    /// Rows removed from the top (sky, trees)
    #[config(default = 70)]
    pub crop_top:     usize,
    /// Rows removed from the bottom (car hood)
    #[config(default = 25)]
    pub crop_bottom:  usize,
}

fn conv_out(len: usize, kernel: usize, stride: usize) -> Option<usize> {
    len.checked_sub(kernel).map(|l| l / stride + 1)
}

impl PilotNetConfig {
    /// Height of the image after cropping.
    pub fn cropped_height(&self) -> usize {
        self.input_height.saturating_sub(self.crop_top + self.crop_bottom)
    }

    /// Spatial size [height, width] after the last convolution,
    /// or None if the input is too small for the kernels.
    pub fn feature_map(&self) -> Option<[usize; 2]> {
        CONV_LAYERS.iter().try_fold(
            [self.cropped_height(), self.input_width],
            |[h, w], &(_, k, s)| Some([conv_out(h, k, s)?, conv_out(w, k, s)?]),
        )
    }

    /// Length of the flattened convolution output.
    pub fn flattened_features(&self) -> Option<usize> {
        let [h, w] = self.feature_map()?;
        let channels = CONV_LAYERS[CONV_LAYERS.len() - 1].0;
        (h > 0 && w > 0).then_some(channels * h * w)
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<PilotNet<B>> {
        ensure!(
            self.cropped_height() > 0,
            "cropping {}+{} rows leaves nothing of a {}-row input",
            self.crop_top, self.crop_bottom, self.input_height
        );
        let Some(features) = self.flattened_features() else {
            anyhow::bail!(
                "input {}x{} (cropped to {} rows) is too small for the convolution stack",
                self.input_height, self.input_width, self.cropped_height()
            );
        };

        let mut in_channels = 3;
        let convs = CONV_LAYERS
            .iter()
            .map(|&(out, k, s)| {
                let conv = Conv2dConfig::new([in_channels, out], [k, k])
                    .with_stride([s, s])
                    .init(device);
                in_channels = out;
                conv
            })
            .collect();

        let mut in_features = features;
        let dense = DENSE_LAYERS
            .iter()
            .map(|&out| {
                let linear = LinearConfig::new(in_features, out).init(device);
                in_features = out;
                linear
            })
            .collect();

        tracing::debug!("PilotNet flattened features: {}", features);
        Ok(PilotNet {
            convs,
            dense,
            crop_top:    self.crop_top,
            crop_bottom: self.crop_bottom,
        })
    }
}

#[derive(Module, Debug)]
pub struct PilotNet<B: Backend> {
    pub convs:       Vec<Conv2d<B>>,
    pub dense:       Vec<Linear<B>>,
    pub crop_top:    usize,
    pub crop_bottom: usize,
}

impl<B: Backend> PilotNet<B> {
    /// images: [batch, height, width, 3] with raw 0..255 values
    /// → predicted steering angles [batch, 1]
    /// Crop the sky and bonnet rows, scale pixels to [-0.5, 0.5]
    /// and move channels first: `[N,H,W,3]` → `[N,3,H',W]`.
    pub fn preprocess(&self, images: Tensor<B, 4>) -> Tensor<B, 4> {
        let [batch, height, width, channels] = images.dims();
        let bottom = height.saturating_sub(self.crop_bottom);

        images
            .slice([0..batch, self.crop_top..bottom, 0..width, 0..channels])
            .div_scalar(255.0)
            .sub_scalar(0.5)
            .permute([0, 3, 1, 2])
    }

    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.preprocess(images);
        let x = self.convs.iter().fold(x, |x, conv| relu(conv.forward(x)));
        let x = x.flatten::<2>(1, 3);

        self.dense.iter().fold(x, |x, linear| linear.forward(x))
    }

    /// Mean squared error against the recorded angles [batch, 1].
    pub fn forward_regression(
        &self,
        images: Tensor<B, 4>,
        angles: Tensor<B, 2>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let predictions = self.forward(images);
        let loss = MseLoss::new().forward(predictions.clone(), angles, Reduction::Mean);
        (loss, predictions)
    }
}
