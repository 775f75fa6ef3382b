//! Backend names

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported training backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Imperative autodiff: gradients accumulate on parameters (`"torch"`)
    Torch,
    /// Tape-based autodiff: gradients are returned by a tape (`"tf"`)
    Tf,
}

impl BackendKind {
    /// Every supported backend.
    pub const ALL: [BackendKind; 2] = [BackendKind::Torch, BackendKind::Tf];

    /// Configuration name
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Torch => "torch",
            BackendKind::Tf => "tf",
        }
    }

    /// Device string the backend uses for its first accelerator
    pub fn accelerator_device(&self) -> &'static str {
        match self {
            BackendKind::Torch => "cuda",
            BackendKind::Tf => "GPU",
        }
    }

    /// Device string the numeric layer uses for the same accelerator
    pub fn numeric_device(&self) -> &'static str {
        match self {
            BackendKind::Torch => "cuda:0",
            BackendKind::Tf => "GPU:0",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "torch" => Ok(BackendKind::Torch),
            "tf" => Ok(BackendKind::Tf),
            other => Err(Error::NotImplemented {
                backend: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported() {
        assert_eq!("torch".parse::<BackendKind>().unwrap(), BackendKind::Torch);
        assert_eq!("tf".parse::<BackendKind>().unwrap(), BackendKind::Tf);
    }

    #[test]
    fn test_parse_unsupported_is_not_implemented() {
        for name in ["jax", "", "Torch", "tensorflow"] {
            match name.parse::<BackendKind>() {
                Err(Error::NotImplemented { backend }) => assert_eq!(backend, name),
                other => panic!("expected NotImplemented for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_display_roundtrip() {
        for kind in BackendKind::ALL {
            assert_eq!(kind.to_string().parse::<BackendKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_device_strings() {
        assert_eq!(BackendKind::Torch.accelerator_device(), "cuda");
        assert_eq!(BackendKind::Torch.numeric_device(), "cuda:0");
        assert_eq!(BackendKind::Tf.numeric_device(), "GPU:0");
    }
}
