//! Tensor type with shared storage and gradient tracking

use crate::autograd::backward::{self, BackwardOp};
use ndarray::Array1;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// One-dimensional `f32` tensor participating in reverse-mode autodiff.
///
/// Cloning a `Tensor` produces another handle to the same storage, gradient
/// and graph node. This is how a model hands its parameters to an optimizer:
/// the optimizer updates the handle and the model sees the new values.
#[derive(Clone)]
pub struct Tensor {
    data: Rc<RefCell<Array1<f32>>>,
    grad: Rc<RefCell<Option<Array1<f32>>>>,
    backward_op: Option<Rc<dyn BackwardOp>>,
    requires_grad: bool,
}

impl Tensor {
    /// Create a leaf tensor from an array.
    pub fn new(data: Array1<f32>, requires_grad: bool) -> Self {
        Self {
            data: Rc::new(RefCell::new(data)),
            grad: Rc::new(RefCell::new(None)),
            backward_op: None,
            requires_grad,
        }
    }

    /// Create a leaf tensor from a vector.
    pub fn from_vec(values: Vec<f32>, requires_grad: bool) -> Self {
        Self::new(Array1::from(values), requires_grad)
    }

    /// Create a zero-filled leaf tensor.
    pub fn zeros(len: usize, requires_grad: bool) -> Self {
        Self::new(Array1::zeros(len), requires_grad)
    }

    /// Create a single-element tensor.
    pub fn scalar(value: f32, requires_grad: bool) -> Self {
        Self::from_vec(vec![value], requires_grad)
    }

    /// Create the output of a differentiable operation.
    ///
    /// The result tracks gradients only if one of the op's inputs does.
    pub(crate) fn from_op(data: Array1<f32>, op: Rc<dyn BackwardOp>) -> Self {
        let requires_grad = op.inputs().iter().any(Tensor::requires_grad);
        let mut result = Self::new(data, requires_grad);
        if requires_grad {
            result.backward_op = Some(op);
        }
        result
    }

    /// Borrow the tensor's values.
    pub fn data(&self) -> Ref<'_, Array1<f32>> {
        self.data.borrow()
    }

    /// Mutably borrow the tensor's values.
    pub fn data_mut(&self) -> RefMut<'_, Array1<f32>> {
        self.data.borrow_mut()
    }

    /// Copy the values out into a `Vec`.
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.borrow().to_vec()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    /// Whether the tensor holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape as a vector of dimensions. Always one-dimensional.
    pub fn shape(&self) -> Vec<usize> {
        vec![self.len()]
    }

    /// Whether this tensor is a single value.
    pub fn is_scalar(&self) -> bool {
        self.len() == 1
    }

    /// First element, or `NaN` when empty.
    pub fn item(&self) -> f32 {
        self.data.borrow().first().copied().unwrap_or(f32::NAN)
    }

    /// Whether gradients flow into this tensor.
    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// Whether this tensor was created directly rather than by an op.
    pub fn is_leaf(&self) -> bool {
        self.backward_op.is_none()
    }

    /// Current accumulated gradient.
    pub fn grad(&self) -> Option<Array1<f32>> {
        self.grad.borrow().clone()
    }

    /// Overwrite the gradient.
    pub fn set_grad(&self, grad: Array1<f32>) {
        *self.grad.borrow_mut() = Some(grad);
    }

    /// Add to the gradient, initialising it when absent.
    pub fn accumulate_grad(&self, grad: Array1<f32>) {
        let mut slot = self.grad.borrow_mut();
        match slot.as_mut() {
            Some(existing) => *existing += &grad,
            None => *slot = Some(grad),
        }
    }

    /// Reset the gradient to zeros, keeping the buffer allocated.
    pub fn zero_grad(&self) {
        if let Some(grad) = self.grad.borrow_mut().as_mut() {
            grad.fill(0.0);
        }
    }

    /// Graph node that produced this tensor, if any.
    pub(crate) fn backward_op(&self) -> Option<&Rc<dyn BackwardOp>> {
        self.backward_op.as_ref()
    }

    /// Copy of the values cut off from the graph.
    pub fn detach(&self) -> Tensor {
        Tensor::new(self.data.borrow().clone(), false)
    }

    /// Identity of the underlying storage, shared by all clones.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.data) as *const () as usize
    }

    /// Back-propagate from this tensor.
    ///
    /// The output gradient is seeded with ones. Gradients are accumulated on
    /// every leaf that requires them, so callers zero them between steps.
    pub fn backward(&self) {
        let seed = Array1::ones(self.len());
        let grads = backward::propagate(self, seed);
        for node in backward::topological_order(self) {
            if node.is_leaf() && node.requires_grad() {
                if let Some(grad) = grads.get(&node.id()) {
                    node.accumulate_grad(grad.clone());
                }
            }
        }
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("data", &*self.data.borrow())
            .field("requires_grad", &self.requires_grad)
            .field("op", &self.backward_op.as_ref().map(|op| op.name()))
            .finish()
    }
}
