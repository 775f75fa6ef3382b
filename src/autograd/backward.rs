//! Graph traversal and gradient propagation

use crate::autograd::Tensor;
use ndarray::Array1;
use std::collections::{HashMap, HashSet};

/// A node in the computational graph.
///
/// Implementors hold the op's inputs and map the gradient of the op's
/// output to one gradient per input (vector-Jacobian product).
pub trait BackwardOp {
    /// Tensors the op consumed, in order.
    fn inputs(&self) -> &[Tensor];

    /// Gradient for each input given the output gradient.
    ///
    /// `None` means the input receives no contribution.
    fn backward(&self, grad_output: &Array1<f32>) -> Vec<Option<Array1<f32>>>;

    /// Short op name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Nodes reachable from `root` that require gradients, root first.
///
/// Every node appears after all nodes that consume it.
pub(crate) fn topological_order(root: &Tensor) -> Vec<Tensor> {
    let mut visited = HashSet::new();
    let mut post_order = Vec::new();
    // (node, children expanded)
    let mut stack = vec![(root.clone(), false)];

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            post_order.push(node);
            continue;
        }
        if !node.requires_grad() || !visited.insert(node.id()) {
            continue;
        }
        stack.push((node.clone(), true));
        if let Some(op) = node.backward_op() {
            for input in op.inputs() {
                if input.requires_grad() && !visited.contains(&input.id()) {
                    stack.push((input.clone(), false));
                }
            }
        }
    }

    post_order.reverse();
    post_order
}

/// Gradient of `root` with respect to every reachable node, keyed by id.
///
/// Pure: no tensor's stored gradient is touched.
pub(crate) fn propagate(root: &Tensor, seed: Array1<f32>) -> HashMap<usize, Array1<f32>> {
    let mut grads: HashMap<usize, Array1<f32>> = HashMap::new();
    if !root.requires_grad() {
        return grads;
    }
    grads.insert(root.id(), seed);

    for node in topological_order(root) {
        let Some(op) = node.backward_op() else {
            continue;
        };
        let Some(grad_output) = grads.get(&node.id()).cloned() else {
            continue;
        };
        let input_grads = op.backward(&grad_output);
        for (input, grad) in op.inputs().iter().zip(input_grads) {
            let Some(grad) = grad else { continue };
            if !input.requires_grad() {
                continue;
            }
            grads
                .entry(input.id())
                .and_modify(|acc| *acc += &grad)
                .or_insert(grad);
        }
    }

    grads
}
