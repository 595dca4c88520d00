use serde::{Deserialize, Serialize};

/// GPU training with autodiff over WGPU
pub type GpuTrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;
/// CPU training with autodiff over NdArray
pub type CpuTrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

pub type GpuBackend = burn::backend::Wgpu;
pub type CpuBackend = burn::backend::NdArray;

/// Where the numeric kernels run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeDevice {
    #[default]
    Wgpu,
    Cpu,
}

impl ComputeDevice {
    pub fn wgpu_device() -> burn::backend::wgpu::WgpuDevice {
        burn::backend::wgpu::WgpuDevice::default()
    }

    pub fn cpu_device() -> burn::backend::ndarray::NdArrayDevice {
        burn::backend::ndarray::NdArrayDevice::Cpu
    }
}
