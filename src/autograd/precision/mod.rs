//! Mixed-precision training utilities
//!
//! Two pieces cooperate during a mixed-precision step:
//! - [`autocast`] opens a region in which loss reductions are rounded to a
//!   reduced precision (fp16/bf16).
//! - [`GradScaler`] multiplies the loss before back-propagation so small
//!   gradients do not underflow, then unscales them, skips the step on
//!   overflow and adapts the scale.
//!
//! ## Example
//!
//! ```ignore
//! let _guard = autocast(scaler.precision());
//! let loss = ops::mean(&ops::stack(&task_losses)?);
//! drop(_guard);
//! scaler.scale(&loss).backward();
//! let stepped = scaler.step(&mut optimizer, &mut params);
//! scaler.update(stepped);
//! ```

mod autocast;
mod config;
mod conversions;
mod precision_types;
mod scaler;


pub use autocast::{active_precision, autocast, AutocastGuard};
pub(crate) use autocast::round_in_place;
pub use config::MixedPrecisionConfig;
pub use conversions::{bf16_to_f32, f32_to_bf16, f32_to_fp16, fp16_to_f32};
pub use precision_types::Precision;
pub use scaler::GradScaler;
