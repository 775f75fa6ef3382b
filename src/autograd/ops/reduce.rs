//! Reductions and reshaping: sum, mean, select, broadcast, stack, concat

use crate::autograd::precision::round_in_place;
use crate::autograd::{BackwardOp, Tensor};
use crate::error::{Error, Result};
use ndarray::{s, Array1};
use std::rc::Rc;

/// Sum all elements
pub fn sum(a: &Tensor) -> Tensor {
    let data = Array1::from(vec![a.data().sum()]);
    let op = SumBackward {
        inputs: [a.clone()],
        scale: 1.0,
    };
    Tensor::from_op(data, Rc::new(op))
}

/// Mean of all elements
///
/// Under an active autocast the result is rounded to the autocast precision.
pub fn mean(a: &Tensor) -> Tensor {
    let n = a.len().max(1) as f32;
    let mut data = Array1::from(vec![a.data().sum() / n]);
    round_in_place(&mut data);
    let op = SumBackward {
        inputs: [a.clone()],
        scale: 1.0 / n,
    };
    Tensor::from_op(data, Rc::new(op))
}

struct SumBackward {
    inputs: [Tensor; 1],
    scale: f32,
}

impl BackwardOp for SumBackward {
    fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    fn backward(&self, grad: &Array1<f32>) -> Vec<Option<Array1<f32>>> {
        // ∂L/∂a_i = ∂L/∂sum * scale (broadcast)
        let len = self.inputs[0].len();
        vec![Some(Array1::from_elem(len, grad[0] * self.scale))]
    }

    fn name(&self) -> &'static str {
        "sum"
    }
}

/// Pick one element as a scalar tensor
///
/// # Panics
///
/// Panics if `index` is out of bounds.
pub fn select(a: &Tensor, index: usize) -> Tensor {
    let data = Array1::from(vec![a.data()[index]]);
    let op = SelectBackward {
        inputs: [a.clone()],
        index,
    };
    Tensor::from_op(data, Rc::new(op))
}

struct SelectBackward {
    inputs: [Tensor; 1],
    index: usize,
}

impl BackwardOp for SelectBackward {
    fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    fn backward(&self, grad: &Array1<f32>) -> Vec<Option<Array1<f32>>> {
        let mut out = Array1::zeros(self.inputs[0].len());
        out[self.index] = grad[0];
        vec![Some(out)]
    }

    fn name(&self) -> &'static str {
        "select"
    }
}

/// Repeat a scalar tensor `len` times
///
/// # Panics
///
/// Panics if `a` is not a scalar.
pub fn broadcast(a: &Tensor, len: usize) -> Tensor {
    assert!(
        a.is_scalar(),
        "broadcast: expected a scalar, got shape {:?}",
        a.shape()
    );
    let data = Array1::from_elem(len, a.item());
    let op = BroadcastBackward {
        inputs: [a.clone()],
    };
    Tensor::from_op(data, Rc::new(op))
}

struct BroadcastBackward {
    inputs: [Tensor; 1],
}

impl BackwardOp for BroadcastBackward {
    fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    fn backward(&self, grad: &Array1<f32>) -> Vec<Option<Array1<f32>>> {
        vec![Some(Array1::from(vec![grad.sum()]))]
    }

    fn name(&self) -> &'static str {
        "broadcast"
    }
}

/// Stack equal-shaped tensors into one flat tensor
///
/// Used to combine per-task losses into a batch. Fails when the list is
/// empty or the shapes differ. Under an active autocast the result is
/// rounded to the autocast precision.
pub fn stack(tensors: &[Tensor]) -> Result<Tensor> {
    let shapes: Vec<Vec<usize>> = tensors.iter().map(Tensor::shape).collect();
    let Some(first) = tensors.first() else {
        return Err(Error::Stack {
            shapes,
            message: "need at least one tensor to stack".into(),
        });
    };
    let len = first.len();
    if tensors.iter().any(|t| t.len() != len) {
        return Err(Error::Stack {
            shapes,
            message: "all stacked tensors must have the same shape".into(),
        });
    }

    let mut data = join(tensors);
    round_in_place(&mut data);
    let op = SplitBackward {
        inputs: tensors.to_vec(),
    };
    Ok(Tensor::from_op(data, Rc::new(op)))
}

/// Concatenate tensors of any lengths end to end
pub fn concat(tensors: &[Tensor]) -> Tensor {
    let op = SplitBackward {
        inputs: tensors.to_vec(),
    };
    Tensor::from_op(join(tensors), Rc::new(op))
}

fn join(tensors: &[Tensor]) -> Array1<f32> {
    let mut data = Vec::with_capacity(tensors.iter().map(Tensor::len).sum());
    for t in tensors {
        data.extend(t.data().iter().copied());
    }
    Array1::from(data)
}

struct SplitBackward {
    inputs: Vec<Tensor>,
}

impl BackwardOp for SplitBackward {
    fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    fn backward(&self, grad: &Array1<f32>) -> Vec<Option<Array1<f32>>> {
        let mut offset = 0;
        self.inputs
            .iter()
            .map(|t| {
                let end = offset + t.len();
                let piece = grad.slice(s![offset..end]).to_owned();
                offset = end;
                Some(piece)
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "stack"
    }
}
