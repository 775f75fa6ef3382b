//! Scoped reduced-precision arithmetic.
//!
//! ```
//! use convnp_trainer::autograd::precision::{autocast, Precision};
//!
//! {
//!     let _guard = autocast(Precision::Fp16);
//!     assert_eq!(convnp_trainer::autograd::precision::active_precision(), Precision::Fp16);
//! }
//! assert_eq!(convnp_trainer::autograd::precision::active_precision(), Precision::Fp32);
//! ```

use super::Precision;
use ndarray::Array1;
use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static AUTOCAST: Cell<Precision> = const { Cell::new(Precision::Fp32) };
}

/// Restores the previous autocast precision when dropped.
///
/// Not `Send`: autocast state is per thread.
#[must_use = "autocast ends as soon as the guard is dropped"]
pub struct AutocastGuard {
    previous: Precision,
    _not_send: PhantomData<*const ()>,
}

impl Drop for AutocastGuard {
    fn drop(&mut self) {
        AUTOCAST.with(|cell| cell.set(self.previous));
    }
}

/// Enter an autocast region at `precision` on the current thread.
pub fn autocast(precision: Precision) -> AutocastGuard {
    let previous = AUTOCAST.with(|cell| cell.replace(precision));
    AutocastGuard {
        previous,
        _not_send: PhantomData,
    }
}

/// Precision of the innermost active autocast region.
pub fn active_precision() -> Precision {
    AUTOCAST.with(Cell::get)
}

/// Round values to the active autocast precision.
pub(crate) fn round_in_place(values: &mut Array1<f32>) {
    let precision = active_precision();
    if precision.is_reduced() {
        values.mapv_inplace(|v| precision.round(v));
    }
}
