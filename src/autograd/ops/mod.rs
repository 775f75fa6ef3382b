//! Autograd operations with backward passes
//!
//! This module provides differentiable operations for automatic differentiation.

mod basic;
mod reduce;

// Re-export all public operations
pub use basic::{add, exp, mul, scale, shift, square, sub};
pub use reduce::{broadcast, concat, mean, select, stack, sum};
