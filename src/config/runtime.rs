//! Runtime selection: which backend to train with and device requirements

use super::schema::deserialize_bool_lenient;
use crate::backend::BackendKind;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Backend and device settings passed to every entry point.
///
/// The backend is kept as a string so an unsupported name survives loading
/// and is reported as [`Error::NotImplemented`](crate::Error::NotImplemented)
/// where it is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Backend name: "torch" | "tf"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Device requirements
    #[serde(default)]
    pub device: DeviceSettings,
}

/// Device requirements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Fail unless an accelerator is available
    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    pub require_gpu: bool,
}

fn default_backend() -> String {
    BackendKind::Torch.name().to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            device: DeviceSettings::default(),
        }
    }
}

impl RuntimeConfig {
    /// Runtime for the named backend, without device requirements
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            device: DeviceSettings::default(),
        }
    }

    /// Require an accelerator
    pub fn with_require_gpu(mut self, require_gpu: bool) -> Self {
        self.device.require_gpu = require_gpu;
        self
    }

    /// Parsed backend, or [`Error::NotImplemented`](crate::Error::NotImplemented)
    pub fn backend_kind(&self) -> Result<BackendKind> {
        self.backend.parse()
    }
}
