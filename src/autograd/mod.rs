//! Reverse-mode autograd engine
//!
//! Provides the framework layer both training backends are built on:
//! - [`Tensor`]: shared-storage tensor whose ops record a computational graph
//! - [`Tensor::backward`]: imperative back-propagation that accumulates
//!   gradients on leaf tensors
//! - [`GradientTape`]: functional gradients for watched tensors
//! - [`precision`]: autocast regions and loss scaling

mod backward;
pub mod ops;
pub mod precision;
mod tape;
mod tensor;

pub use backward::BackwardOp;
pub use precision::{autocast, GradScaler, MixedPrecisionConfig, Precision};
pub use tape::GradientTape;
pub use tensor::Tensor;
