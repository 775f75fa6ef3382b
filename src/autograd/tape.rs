//! Gradient tape: functional gradients for a fixed set of watched tensors

use crate::autograd::{backward, Tensor};
use crate::error::{Error, Result};
use ndarray::Array1;

/// Computes gradients of a scalar with respect to watched tensors.
///
/// Unlike [`Tensor::backward`], the tape never writes into the tensors'
/// stored gradients. Gradients are returned to the caller, who hands them to
/// [`Optimizer::apply_gradients`](crate::optim::Optimizer::apply_gradients).
///
/// ```
/// use convnp_trainer::autograd::{ops, GradientTape, Tensor};
///
/// let w = Tensor::from_vec(vec![3.0], true);
/// let tape = GradientTape::watch(&[w.clone()]);
/// let loss = ops::sum(&ops::square(&w));
/// let grads = tape.gradient(&loss).unwrap();
/// assert_eq!(grads[0][0], 6.0);
/// assert!(w.grad().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct GradientTape {
    sources: Vec<Tensor>,
}

impl GradientTape {
    /// Watch the given tensors.
    pub fn watch(sources: &[Tensor]) -> Self {
        Self {
            sources: sources.to_vec(),
        }
    }

    /// Watched tensors, in order.
    pub fn sources(&self) -> &[Tensor] {
        &self.sources
    }

    /// Gradient of `target` with respect to each watched tensor.
    ///
    /// Sources that `target` does not depend on get zero gradients.
    pub fn gradient(&self, target: &Tensor) -> Result<Vec<Array1<f32>>> {
        if !target.is_scalar() {
            return Err(Error::ShapeMismatch {
                expected: vec![1],
                actual: target.shape(),
            });
        }

        let grads = backward::propagate(target, Array1::ones(1));
        Ok(self
            .sources
            .iter()
            .map(|source| {
                grads
                    .get(&source.id())
                    .cloned()
                    .unwrap_or_else(|| Array1::zeros(source.len()))
            })
            .collect())
    }
}
