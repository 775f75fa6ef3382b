//! Compute device detection and default-device selection
//!
//! [`set_gpu_default_device`] pins computation to the first accelerator for
//! the configured backend. Detection goes through an [`AcceleratorDetector`] so
//! callers (and tests) decide how availability is checked.

use crate::config::RuntimeConfig;
use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;

/// Compute device for training
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeDevice {
    /// CPU-only execution
    Cpu,
    /// CUDA GPU with device ID
    Cuda { device_id: usize },
}

impl ComputeDevice {
    /// First accelerator if the detector finds one, otherwise the CPU
    #[must_use]
    pub fn detect(detector: &dyn AcceleratorDetector) -> Self {
        if detector.accelerator_available() {
            Self::Cuda { device_id: 0 }
        } else {
            Self::Cpu
        }
    }

    /// Check if this device is CUDA
    #[must_use]
    pub const fn is_cuda(&self) -> bool {
        matches!(self, Self::Cuda { .. })
    }

    /// Check if this device is CPU
    #[must_use]
    pub const fn is_cpu(&self) -> bool {
        matches!(self, Self::Cpu)
    }

    /// Get device ID for CUDA devices
    #[must_use]
    pub const fn device_id(&self) -> Option<usize> {
        match self {
            Self::Cuda { device_id } => Some(*device_id),
            Self::Cpu => None,
        }
    }
}

impl fmt::Display for ComputeDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "CPU"),
            Self::Cuda { device_id } => write!(f, "CUDA:{device_id}"),
        }
    }
}

/// Device information
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    /// Device name
    pub name: String,
    /// Total memory in GB
    pub memory_gb: f64,
    /// Driver version
    pub driver_version: Option<String>,
}

impl DeviceInfo {
    /// Get CPU info
    #[must_use]
    pub fn cpu_info() -> Self {
        let num_cores = std::thread::available_parallelism()
            .map(std::num::NonZero::get)
            .unwrap_or(1);

        Self {
            name: format!("CPU ({num_cores} cores)"),
            memory_gb: Self::system_memory_gb(),
            driver_version: None,
        }
    }

    /// Get CUDA device info from `nvidia-smi`
    #[must_use]
    pub fn cuda_info(device_id: usize) -> Option<Self> {
        let output = std::process::Command::new("nvidia-smi")
            .args([
                "--query-gpu=name,memory.total,driver_version",
                "--format=csv,noheader,nounits",
                &format!("--id={device_id}"),
            ])
            .output()
            .ok()?;

        if !output.status.success() {
            return None;
        }

        Self::parse_smi_line(&String::from_utf8_lossy(&output.stdout))
    }

    /// Parse one `name, memory_mb, driver` line
    fn parse_smi_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.trim().split(", ").collect();
        if parts.len() < 3 {
            return None;
        }

        let memory_mb: f64 = parts[1].parse().unwrap_or(0.0);
        Some(Self {
            name: parts[0].to_string(),
            memory_gb: memory_mb / 1024.0,
            driver_version: Some(parts[2].to_string()),
        })
    }

    /// Info for `device`, falling back to CPU info when the GPU cannot be queried
    #[must_use]
    pub fn for_device(device: ComputeDevice) -> Self {
        match device {
            ComputeDevice::Cuda { device_id } => {
                Self::cuda_info(device_id).unwrap_or_else(Self::cpu_info)
            }
            ComputeDevice::Cpu => Self::cpu_info(),
        }
    }

    /// Get system RAM in GB
    fn system_memory_gb() -> f64 {
        if let Ok(content) = std::fs::read_to_string("/proc/meminfo") {
            for line in content.lines() {
                if let Some(rest) = line.strip_prefix("MemTotal:") {
                    let kb = rest.split_whitespace().next().map(str::parse::<f64>);
                    if let Some(Ok(kb)) = kb {
                        return kb / 1024.0 / 1024.0;
                    }
                }
            }
        }
        0.0
    }
}

/// Reports whether an accelerator is present.
pub trait AcceleratorDetector {
    /// True when at least one accelerator can be used
    fn accelerator_available(&self) -> bool;
}

/// Detector that inspects the running system.
///
/// `CUDA_VISIBLE_DEVICES` set to an empty string or `-1` hides every device.
/// Otherwise a device is available if the NVIDIA driver lists one under
/// `/proc/driver/nvidia/gpus` or `nvidia-smi` runs successfully.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDetector;

impl SystemDetector {
    fn devices_hidden(visible: Option<&str>) -> bool {
        matches!(visible.map(str::trim), Some("" | "-1"))
    }

    fn driver_lists_gpus() -> bool {
        std::fs::read_dir(Path::new("/proc/driver/nvidia/gpus"))
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    fn nvidia_smi_succeeds() -> bool {
        std::process::Command::new("nvidia-smi")
            .arg("--query-gpu=name")
            .arg("--format=csv,noheader")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl AcceleratorDetector for SystemDetector {
    fn accelerator_available(&self) -> bool {
        let visible = std::env::var("CUDA_VISIBLE_DEVICES").ok();
        if Self::devices_hidden(visible.as_deref()) {
            return false;
        }
        Self::driver_lists_gpus() || Self::nvidia_smi_succeeds()
    }
}

/// Detector with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDetector(pub bool);

impl AcceleratorDetector for FixedDetector {
    fn accelerator_available(&self) -> bool {
        self.0
    }
}

/// Default devices for the backend and the numeric layer.
///
/// Empty until [`set_gpu_default_device`] succeeds; an empty context means
/// computation stays on the CPU.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceContext {
    backend_device: Option<String>,
    numeric_device: Option<String>,
}

impl DeviceContext {
    /// Empty context (CPU)
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend default device, e.g. `"cuda"`
    pub fn backend_device(&self) -> Option<&str> {
        self.backend_device.as_deref()
    }

    /// Numeric-layer default device, e.g. `"cuda:0"`
    pub fn numeric_device(&self) -> Option<&str> {
        self.numeric_device.as_deref()
    }

    /// Device computation runs on
    pub fn compute_device(&self) -> ComputeDevice {
        if self.backend_device.is_some() {
            ComputeDevice::Cuda { device_id: 0 }
        } else {
            ComputeDevice::Cpu
        }
    }
}

/// Make the first accelerator the default device for the configured backend.
///
/// # Errors
///
/// - [`Error::NotImplemented`] if the backend is not supported; checked
///   before probing.
/// - [`Error::NoAccelerator`] if the detector finds no device. `ctx` is left
///   unchanged.
pub fn set_gpu_default_device(
    runtime: &RuntimeConfig,
    detector: &dyn AcceleratorDetector,
    ctx: &mut DeviceContext,
) -> Result<()> {
    let kind = runtime.backend_kind()?;

    if !detector.accelerator_available() {
        return Err(Error::NoAccelerator {
            backend: kind.to_string(),
            detail: "no accelerator device detected".to_string(),
        });
    }

    ctx.backend_device = Some(kind.accelerator_device().to_string());
    ctx.numeric_device = Some(kind.numeric_device().to_string());
    tracing::info!(
        backend = %kind,
        backend_device = kind.accelerator_device(),
        numeric_device = kind.numeric_device(),
        "default device set"
    );
    Ok(())
}
