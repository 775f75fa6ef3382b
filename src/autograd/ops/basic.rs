//! Element-wise autograd operations: add, sub, mul, scale, shift, square and exp

use crate::autograd::{BackwardOp, Tensor};
use ndarray::Array1;
use std::rc::Rc;

fn assert_same_len(op: &str, a: &Tensor, b: &Tensor) {
    assert_eq!(
        a.len(),
        b.len(),
        "{op}: operands must have the same length ({} vs {})",
        a.len(),
        b.len()
    );
}

/// Add two tensors element-wise
pub fn add(a: &Tensor, b: &Tensor) -> Tensor {
    assert_same_len("add", a, b);
    let data = &*a.data() + &*b.data();
    let op = AddBackward {
        inputs: [a.clone(), b.clone()],
    };
    Tensor::from_op(data, Rc::new(op))
}

struct AddBackward {
    inputs: [Tensor; 2],
}

impl BackwardOp for AddBackward {
    fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    fn backward(&self, grad: &Array1<f32>) -> Vec<Option<Array1<f32>>> {
        vec![Some(grad.clone()), Some(grad.clone())]
    }

    fn name(&self) -> &'static str {
        "add"
    }
}

/// Subtract `b` from `a` element-wise
pub fn sub(a: &Tensor, b: &Tensor) -> Tensor {
    assert_same_len("sub", a, b);
    let data = &*a.data() - &*b.data();
    let op = SubBackward {
        inputs: [a.clone(), b.clone()],
    };
    Tensor::from_op(data, Rc::new(op))
}

struct SubBackward {
    inputs: [Tensor; 2],
}

impl BackwardOp for SubBackward {
    fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    fn backward(&self, grad: &Array1<f32>) -> Vec<Option<Array1<f32>>> {
        vec![Some(grad.clone()), Some(-grad)]
    }

    fn name(&self) -> &'static str {
        "sub"
    }
}

/// Multiply two tensors element-wise
pub fn mul(a: &Tensor, b: &Tensor) -> Tensor {
    assert_same_len("mul", a, b);
    let data = &*a.data() * &*b.data();
    let op = MulBackward {
        inputs: [a.clone(), b.clone()],
    };
    Tensor::from_op(data, Rc::new(op))
}

struct MulBackward {
    inputs: [Tensor; 2],
}

impl BackwardOp for MulBackward {
    fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    fn backward(&self, grad: &Array1<f32>) -> Vec<Option<Array1<f32>>> {
        let [a, b] = &self.inputs;
        // ∂L/∂a = ∂L/∂out * b, ∂L/∂b = ∂L/∂out * a
        vec![Some(grad * &*b.data()), Some(grad * &*a.data())]
    }

    fn name(&self) -> &'static str {
        "mul"
    }
}

/// Scale tensor by a scalar
pub fn scale(a: &Tensor, factor: f32) -> Tensor {
    let data = &*a.data() * factor;
    let op = ScaleBackward {
        inputs: [a.clone()],
        factor,
    };
    Tensor::from_op(data, Rc::new(op))
}

struct ScaleBackward {
    inputs: [Tensor; 1],
    factor: f32,
}

impl BackwardOp for ScaleBackward {
    fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    fn backward(&self, grad: &Array1<f32>) -> Vec<Option<Array1<f32>>> {
        vec![Some(grad * self.factor)]
    }

    fn name(&self) -> &'static str {
        "scale"
    }
}

/// Add a constant to every element
pub fn shift(a: &Tensor, offset: f32) -> Tensor {
    let data = &*a.data() + offset;
    let op = ShiftBackward {
        inputs: [a.clone()],
    };
    Tensor::from_op(data, Rc::new(op))
}

struct ShiftBackward {
    inputs: [Tensor; 1],
}

impl BackwardOp for ShiftBackward {
    fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    fn backward(&self, grad: &Array1<f32>) -> Vec<Option<Array1<f32>>> {
        vec![Some(grad.clone())]
    }

    fn name(&self) -> &'static str {
        "shift"
    }
}

/// Square every element
pub fn square(a: &Tensor) -> Tensor {
    let data = a.data().mapv(|x| x * x);
    let op = SquareBackward {
        inputs: [a.clone()],
    };
    Tensor::from_op(data, Rc::new(op))
}

struct SquareBackward {
    inputs: [Tensor; 1],
}

impl BackwardOp for SquareBackward {
    fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    fn backward(&self, grad: &Array1<f32>) -> Vec<Option<Array1<f32>>> {
        vec![Some(grad * &(&*self.inputs[0].data() * 2.0))]
    }

    fn name(&self) -> &'static str {
        "square"
    }
}

/// Exponentiate every element
pub fn exp(a: &Tensor) -> Tensor {
    let data = a.data().mapv(f32::exp);
    let output = data.clone();
    let op = ExpBackward {
        inputs: [a.clone()],
        output,
    };
    Tensor::from_op(data, Rc::new(op))
}

struct ExpBackward {
    inputs: [Tensor; 1],
    output: Array1<f32>,
}

impl BackwardOp for ExpBackward {
    fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    fn backward(&self, grad: &Array1<f32>) -> Vec<Option<Array1<f32>>> {
        vec![Some(grad * &self.output)]
    }

    fn name(&self) -> &'static str {
        "exp"
    }
}
