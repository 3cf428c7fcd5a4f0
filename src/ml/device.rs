use anyhow::{anyhow, Result};
use burn::backend::{
    ndarray::NdArrayDevice,
    wgpu::WgpuDevice,
    Autodiff, NdArray, Wgpu,
};
use std::{
    fmt,
    panic::{catch_unwind, AssertUnwindSafe},
    str::FromStr,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::dataset::ImageDataset;
use crate::domain::traits::Classifier;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::{inferencer::Inferencer, model::PlantCnnConfig, trainer::train_loop};

/// Where tensors live. The stored weights do not depend on it, so a
/// model trained on the GPU can be used on the CPU and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComputeDevice {
    /// Burn NdArray backend
    Cpu,
    /// Burn Wgpu backend (Vulkan / Metal / DX12)
    #[default]
    Gpu,
}

impl fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComputeDevice::Cpu => "cpu",
            ComputeDevice::Gpu => "gpu",
        })
    }
}

impl FromStr for ComputeDevice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" | "ndarray" => Ok(ComputeDevice::Cpu),
            "gpu" | "wgpu"    => Ok(ComputeDevice::Gpu),
            other => Err(format!("unknown device '{other}' (expected cpu or gpu)")),
        }
    }
}

/// Run the training loop on the chosen device.
pub fn run_training(
    device:        ComputeDevice,
    cfg:           &TrainConfig,
    model_cfg:     &PlantCnnConfig,
    train_dataset: ImageDataset,
    val_dataset:   ImageDataset,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
) -> Result<Vec<EpochMetrics>> {
    match device {
        ComputeDevice::Cpu => {
            let device = NdArrayDevice::default();
            tracing::info!("Using CPU device: {:?}", device);
            train_loop::<Autodiff<NdArray>>(
                cfg, model_cfg, train_dataset, val_dataset, ckpt_manager, metrics, device,
            )
        }
        ComputeDevice::Gpu => on_gpu(|| {
            let device = WgpuDevice::default();
            tracing::info!("Using WGPU device: {:?}", device);
            train_loop::<Autodiff<Wgpu>>(
                cfg, model_cfg, train_dataset, val_dataset, ckpt_manager, metrics, device,
            )
        }),
    }
}

/// Load the stored model onto the chosen device.
pub fn load_classifier(
    device:       ComputeDevice,
    ckpt_manager: &CheckpointManager,
) -> Result<Box<dyn Classifier>> {
    Ok(match device {
        ComputeDevice::Cpu => Box::new(Inferencer::<NdArray>::from_checkpoint(
            ckpt_manager,
            NdArrayDevice::default(),
        )?),
        ComputeDevice::Gpu => Box::new(on_gpu(|| {
            Inferencer::<Wgpu>::from_checkpoint(ckpt_manager, WgpuDevice::default())
        })?),
    })
}

/// burn-wgpu panics when no adapter is available; turn that into an
/// error that points at the CPU backend.
fn on_gpu<T>(run: impl FnOnce() -> Result<T>) -> Result<T> {
    catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|_| {
        Err(anyhow!("The GPU backend failed to start. Re-run with --device cpu."))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device() {
        assert_eq!("CPU".parse::<ComputeDevice>(), Ok(ComputeDevice::Cpu));
        assert_eq!("wgpu".parse::<ComputeDevice>(), Ok(ComputeDevice::Gpu));
        assert!("tpu".parse::<ComputeDevice>().is_err());
        assert_eq!(ComputeDevice::default().to_string(), "gpu");
    }

    #[test]
    fn test_gpu_panic_becomes_error() {
        let err = on_gpu::<()>(|| panic!("no adapter")).unwrap_err();
        assert!(err.to_string().contains("--device cpu"));

        assert_eq!(on_gpu(|| Ok(7)).unwrap(), 7);
    }
}
